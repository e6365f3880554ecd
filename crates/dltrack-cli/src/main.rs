//! Main entry point for dltrack.

use anyhow::{Context, Result};
use clap::Parser;
use dltrack_cli::{App, Cli, LogFormat};
use dltrack_common::logging::{init_logging, LoggingConfig};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging =
        LoggingConfig::with_level(&cli.log_level).with_json(cli.log_format == LogFormat::Json);
    init_logging(&logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    info!("Starting dltrack {}", env!("CARGO_PKG_VERSION"));

    let app = match App::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            error!("{}", e);
            return Err(e).context("Failed to load configuration");
        }
    };

    if let Err(e) = app.execute(cli.command).await {
        error!("{}", e);
        return Err(e).with_context(|| format!("dltrack {:?} failed", cli.command));
    }

    Ok(())
}
