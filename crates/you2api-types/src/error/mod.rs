//! Typed error definitions shared across crates.

mod config;

pub use config::ConfigError;

/// Standard Result type for configuration handling.
pub type Result<T> = std::result::Result<T, ConfigError>;
