//! Translation pipeline configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Per-character weights used by the token estimator.
///
/// Defaults are empirical: 0.3 per ASCII char, 1.0 per non-ASCII char,
/// plus 2 tokens per message for the role marker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Validate)]
pub struct TokenWeights {
    #[validate(range(min = 0.0))]
    #[serde(default = "default_ascii_weight")]
    pub ascii: f64,
    #[validate(range(min = 0.0))]
    #[serde(default = "default_non_ascii_weight")]
    pub non_ascii: f64,
    #[serde(default = "default_per_message_overhead")]
    pub per_message_overhead: u32,
}

impl Default for TokenWeights {
    fn default() -> Self {
        Self {
            ascii: default_ascii_weight(),
            non_ascii: default_non_ascii_weight(),
            per_message_overhead: default_per_message_overhead(),
        }
    }
}

/// Settings for the chat-completion → upstream translation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct BridgeConfig {
    /// Upstream origin, without trailing slash
    #[validate(length(min = 1_u64))]
    #[serde(default = "default_upstream_base_url")]
    pub upstream_base_url: String,
    /// Optional outbound HTTP/SOCKS proxy for upstream calls
    #[serde(default)]
    pub upstream_proxy_url: Option<String>,
    /// Market/locale flag sent as `mkt`
    #[serde(default = "default_market")]
    pub market: String,
    /// Model ids passed through as a chat mode instead of an AI model
    #[serde(default)]
    pub agent_model_ids: Vec<String>,
    /// History fields at or above this estimate are uploaded as files
    #[serde(default = "default_history_inline_token_limit")]
    pub history_inline_token_limit: u32,
    /// Current turn at or above this estimate is uploaded as a file
    #[serde(default = "default_current_turn_inline_token_limit")]
    pub current_turn_inline_token_limit: u32,
    #[serde(default)]
    #[validate(nested)]
    pub token_weights: TokenWeights,
    /// Upload oversized history fields (off = only the current turn)
    #[serde(default = "default_true")]
    pub externalize_history: bool,
    /// Upper bound for the non-streaming upstream call
    #[validate(range(min = 1_u64))]
    #[serde(default = "default_non_stream_timeout_secs")]
    pub non_stream_timeout_secs: u64,
    /// Where upload artifacts are staged (system temp dir when unset)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            upstream_base_url: default_upstream_base_url(),
            upstream_proxy_url: None,
            market: default_market(),
            agent_model_ids: Vec::new(),
            history_inline_token_limit: default_history_inline_token_limit(),
            current_turn_inline_token_limit: default_current_turn_inline_token_limit(),
            token_weights: TokenWeights::default(),
            externalize_history: true,
            non_stream_timeout_secs: default_non_stream_timeout_secs(),
            temp_dir: None,
        }
    }
}

const fn default_ascii_weight() -> f64 {
    0.3
}

const fn default_non_ascii_weight() -> f64 {
    1.0
}

const fn default_per_message_overhead() -> u32 {
    2
}

fn default_upstream_base_url() -> String {
    "https://you.com".to_string()
}

fn default_market() -> String {
    "zh-HK".to_string()
}

const fn default_history_inline_token_limit() -> u32 {
    30
}

const fn default_current_turn_inline_token_limit() -> u32 {
    2000
}

const fn default_true() -> bool {
    true
}

const fn default_non_stream_timeout_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = BridgeConfig::default();
        assert_eq!(config.history_inline_token_limit, 30);
        assert_eq!(config.current_turn_inline_token_limit, 2000);
        assert_eq!(config.non_stream_timeout_secs, 60);
        assert!(config.externalize_history);
        assert!(config.agent_model_ids.is_empty());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = BridgeConfig {
            token_weights: TokenWeights { ascii: -1.0, ..TokenWeights::default() },
            ..BridgeConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
