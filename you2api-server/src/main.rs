//! you2api Server - Headless Daemon
//!
//! Serves OpenAI-compatible chat completions on `/v1/*`, translated onto the
//! YouChat streaming search API, plus an optional `/proxy/*` passthrough.
//!
//! Access via: http://localhost:8080

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod cli;
mod server_utils;

use cli::{Cli, Commands};
use you2api_core::modules::config::{load_config_with, CONFIG_PATH_ENV};
use you2api_core::modules::logger::init_logger;
use you2api_core::proxy::prometheus::init_metrics;
use you2api_core::proxy::AxumServer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.as_ref().map(|p| p.display().to_string());
    let mut config = load_config_with(|key| {
        if key == CONFIG_PATH_ENV {
            return config_path.clone();
        }
        std::env::var(key).ok()
    })?;
    cli.apply_overrides(&mut config);

    if cli.command == Some(Commands::Config) {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    init_logger(&config.log_level);
    info!("🚀 you2api v{} starting...", env!("CARGO_PKG_VERSION"));

    if init_metrics().is_none() {
        tracing::warn!("⚠️ Metrics disabled, /metrics will report an empty registry");
    }

    let listener = server_utils::create_listener(&config).await?;
    AxumServer::new(config).serve(listener, server_utils::shutdown_signal()).await?;

    info!("👋 Server stopped");
    Ok(())
}
