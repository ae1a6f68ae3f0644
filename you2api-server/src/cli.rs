use clap::{Parser, Subcommand};
use std::path::PathBuf;
use you2api_types::models::AppConfig;

#[derive(Parser)]
#[command(
    name = "you2api",
    about = "you2api - OpenAI-compatible chat completions backed by YouChat",
    version = env!("CARGO_PKG_VERSION"),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// JSON config file merged under environment overrides
    #[arg(short, long, env = "YOU2API_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,

    /// Overrides PORT
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Overrides LOG_LEVEL (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Start the server (default if no command specified)")]
    Serve,

    #[command(about = "Print the effective configuration as JSON and exit")]
    Config,
}

impl Cli {
    /// Flags win over file and environment values.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(level) = &self.log_level {
            config.log_level.clone_from(level);
        }
    }
}
