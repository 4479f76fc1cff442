//! Usage: hubshift serve [--host <HOST>] [--port <PORT>]

use anyhow::Context;
use clap::Args;
use hubshift_core::logging_facility::init;
use hubshift_server::Settings;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override HOST
    #[arg(long)]
    pub host: Option<String>,

    /// Override PORT
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs) -> anyhow::Result<()> {
    let mut settings = Settings::load().context("loading settings")?;
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }

    init(settings.profile()?);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting hubshift");
    hubshift_server::serve(settings).await?;
    Ok(())
}
