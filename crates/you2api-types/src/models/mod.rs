//! Configuration models for you2api.

pub mod config;

pub use config::{AppConfig, BridgeConfig, PassthroughConfig, TokenWeights};
