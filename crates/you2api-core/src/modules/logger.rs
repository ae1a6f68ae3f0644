//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Map a configured level name onto a filter directive; unknown names fall back to `info`.
pub fn normalize_level(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// Install the global fmt subscriber. `RUST_LOG` wins over the configured level.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logger(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(normalize_level(level)));

    if tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init().is_err() {
        tracing::debug!("Logger already initialized, keeping existing subscriber");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("debug"), "debug");
        assert_eq!(normalize_level("WARN"), "warn");
        assert_eq!(normalize_level("verbose"), "info");
        assert_eq!(normalize_level(""), "info");
    }
}
