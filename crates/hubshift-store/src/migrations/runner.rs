//! Migration runner
//!
//! Applies migrations with checksums and idempotency

use crate::errors::{checksum_mismatch, from_sqlx, migration_error, Result};
use crate::migrations::checksums::compute_checksum;
use crate::migrations::embedded::{get_migrations, Migration};
use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool};

/// Serializes concurrent runners (e.g. several server replicas starting)
const MIGRATION_LOCK_KEY: i64 = 0x4855_4253_4849_4654;

/// A row of `schema_version`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppliedMigration {
    pub migration_id: String,
    pub checksum: String,
    pub applied_at: DateTime<Utc>,
}

/// Apply all pending migrations to the database
///
/// Returns the ids applied by this call; an empty list means the schema was
/// already current.
pub async fn apply_migrations(pool: &PgPool) -> Result<Vec<&'static str>> {
    create_schema_version_table(pool).await?;

    let mut applied = Vec::new();
    for migration in get_migrations() {
        if apply_migration(pool, migration).await? {
            applied.push(migration.id);
        }
    }

    tracing::debug!(count = applied.len(), "migrations applied");
    Ok(applied)
}

/// Migrations recorded in `schema_version`, oldest first
pub async fn applied_migrations(pool: &PgPool) -> Result<Vec<AppliedMigration>> {
    create_schema_version_table(pool).await?;
    sqlx::query_as::<_, AppliedMigration>(
        "SELECT migration_id, checksum, applied_at FROM schema_version ORDER BY migration_id",
    )
    .fetch_all(pool)
    .await
    .map_err(from_sqlx)
}

/// Create the schema_version table if it doesn't exist
async fn create_schema_version_table(pool: &PgPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS schema_version (
            migration_id TEXT PRIMARY KEY,
            checksum TEXT NOT NULL,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .map_err(from_sqlx)?;

    Ok(())
}

/// Apply a single migration if not already applied
///
/// Returns whether the migration ran. An applied migration whose embedded
/// SQL no longer matches the recorded checksum is an error.
async fn apply_migration(pool: &PgPool, migration: Migration) -> Result<bool> {
    let checksum = compute_checksum(migration.sql);

    let mut tx = pool.begin().await.map_err(from_sqlx)?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *tx)
        .await
        .map_err(from_sqlx)?;

    let recorded: Option<String> =
        sqlx::query_scalar("SELECT checksum FROM schema_version WHERE migration_id = $1")
            .bind(migration.id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(from_sqlx)?;

    if let Some(recorded) = recorded {
        if recorded != checksum {
            return Err(checksum_mismatch(migration.id, &recorded, &checksum));
        }
        return Ok(false);
    }

    // Simple query protocol: migration files hold several statements
    (&mut *tx)
        .execute(migration.sql)
        .await
        .map_err(|e| migration_error(migration.id, &e.to_string()))?;

    sqlx::query("INSERT INTO schema_version (migration_id, checksum) VALUES ($1, $2)")
        .bind(migration.id)
        .bind(&checksum)
        .execute(&mut *tx)
        .await
        .map_err(from_sqlx)?;

    tx.commit().await.map_err(from_sqlx)?;

    tracing::debug!(migration_id = migration.id, "migration applied");
    Ok(true)
}
