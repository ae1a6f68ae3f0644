//! Application-level configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::bridge::BridgeConfig;
use super::passthrough::PassthroughConfig;

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct AppConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[validate(range(min = 1_u16))]
    #[serde(default = "default_port")]
    pub port: u16,
    /// Log level (debug, info, warn, error, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Reverse-proxy passthrough under `/proxy/*`
    #[serde(default)]
    #[validate(nested)]
    pub proxy: PassthroughConfig,
    /// Translation pipeline settings
    #[serde(default)]
    #[validate(nested)]
    pub bridge: BridgeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            proxy: PassthroughConfig::default(),
            bridge: BridgeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Get the full bind socket address.
    pub fn get_socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}
