//! Reverse-proxy passthrough configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Plain HTTP forwarding of `/proxy/*` to a fixed target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct PassthroughConfig {
    /// Mount the passthrough route
    #[serde(default)]
    pub enable_proxy: bool,
    /// Target base URL (scheme + host, optional path prefix)
    #[serde(default)]
    pub proxy_url: String,
    /// Upper bound for the forwarded call, in milliseconds
    #[validate(range(min = 1_u64))]
    #[serde(default = "default_proxy_timeout_ms")]
    pub proxy_timeout_ms: u64,
}

impl Default for PassthroughConfig {
    fn default() -> Self {
        Self {
            enable_proxy: false,
            proxy_url: String::new(),
            proxy_timeout_ms: default_proxy_timeout_ms(),
        }
    }
}

impl PassthroughConfig {
    /// Passthrough is mounted only when enabled with a non-empty target.
    pub fn is_active(&self) -> bool {
        self.enable_proxy && !self.proxy_url.trim().is_empty()
    }
}

const fn default_proxy_timeout_ms() -> u64 {
    5000
}
