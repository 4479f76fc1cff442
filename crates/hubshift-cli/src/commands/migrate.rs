//! Usage: hubshift migrate [--status]
//!
//! Exits non-zero when a migration fails or an applied migration's checksum
//! no longer matches the embedded SQL.

use anyhow::Context;
use clap::Args;
use hubshift_core::logging_facility::init;
use hubshift_server::Settings;
use hubshift_store::db;
use hubshift_store::migrations::{applied_migrations, apply_migrations};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// List applied migrations after migrating
    #[arg(long)]
    pub status: bool,
}

pub async fn execute(args: MigrateArgs) -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init(settings.profile()?);

    let pool = db::connect(&settings.database_url)
        .await
        .context("connecting to DATABASE_URL")?;
    let applied = apply_migrations(&pool).await.context("applying migrations")?;
    tracing::info!(count = applied.len(), "migrations applied");

    if applied.is_empty() {
        println!("Schema up to date");
    }
    for id in &applied {
        println!("✓ Applied {}", id);
    }

    if args.status {
        for migration in applied_migrations(&pool).await? {
            println!(
                "{}  {}  {}",
                migration.migration_id,
                &migration.checksum[..12.min(migration.checksum.len())],
                migration.applied_at.to_rfc3339()
            );
        }
    }

    pool.close().await;
    Ok(())
}
