use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use shorthands_config::{Cli, LogFormat};
use shorthands_core::logging;
use shorthands_storage::Backend;
use shorthands_types::IdGenerator;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config;

    config.validate()?;

    // Initialize structured logging
    let log_config = logging::LogConfig {
        format: match config.log_format {
            LogFormat::Json => logging::LogFormat::Json,
            LogFormat::Text => logging::LogFormat::Full,
            LogFormat::Auto => {
                if std::io::IsTerminal::is_terminal(&std::io::stdout()) {
                    logging::LogFormat::Full
                } else {
                    logging::LogFormat::Json
                }
            },
        },
        filter: Some(config.log_level.clone()),
        ..Default::default()
    };

    if let Err(e) = logging::init_logging(log_config) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Shorthands");

    // Initialize the ID generator before any entity can be created
    IdGenerator::init(config.worker_id)
        .map_err(|e| anyhow::anyhow!("Failed to initialize ID generator: {e}"))?;

    let storage = Arc::new(Backend::memory());
    tracing::info!(worker_id = config.worker_id, "Storage and ID generator initialized");

    shorthands_api::serve(storage, Arc::new(config)).await?;

    tracing::info!("Shutting down gracefully");
    Ok(())
}
