//! Process-level setup: configuration loading and logger initialization.

pub mod config;
pub mod logger;
