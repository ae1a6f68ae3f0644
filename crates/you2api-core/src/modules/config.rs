use std::fs;
use std::path::Path;
use std::str::FromStr;

use validator::Validate;
use you2api_types::models::AppConfig;
use you2api_types::ConfigError;

/// Optional JSON file merged over the defaults before env overrides.
pub const CONFIG_PATH_ENV: &str = "YOU2API_CONFIG";

/// Load configuration from defaults, `YOU2API_CONFIG`, and the process environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_with(|key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an injectable environment lookup.
pub fn load_config_with<F>(env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match env(CONFIG_PATH_ENV) {
        Some(path) if !path.trim().is_empty() => load_config_file(Path::new(path.trim()))?,
        _ => AppConfig::default(),
    };

    apply_env_overrides(&mut config, &env)?;
    validate_config(&config)?;
    Ok(config)
}

/// Read a JSON config file; missing keys fall back to defaults.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound { path: path.display().to_string() });
    }
    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError { message: format!("{}: {}", path.display(), e) })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))
}

fn apply_env_overrides<F>(config: &mut AppConfig, env: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = parse_env(env, "PORT")? {
        config.port = port;
    }
    if let Some(level) = env("LOG_LEVEL") {
        config.log_level = level;
    }

    // Only the literal "true" enables the passthrough.
    if let Some(raw) = env("ENABLE_PROXY") {
        config.proxy.enable_proxy = raw.trim() == "true";
    }
    if let Some(url) = env("PROXY_URL") {
        config.proxy.proxy_url = url.trim().to_string();
    }
    if let Some(timeout) = parse_env(env, "PROXY_TIMEOUT_MS")? {
        config.proxy.proxy_timeout_ms = timeout;
    }

    let bridge = &mut config.bridge;
    if let Some(raw) = env("AGENT_MODEL_IDS") {
        bridge.agent_model_ids = parse_agent_ids(&raw);
    }
    if let Some(url) = env("YOUCHAT_BASE_URL") {
        bridge.upstream_base_url = url.trim().trim_end_matches('/').to_string();
    }
    if let Some(url) = env("UPSTREAM_PROXY_URL") {
        let url = url.trim();
        bridge.upstream_proxy_url = (!url.is_empty()).then(|| url.to_string());
    }
    if let Some(market) = env("YOUCHAT_MARKET") {
        bridge.market = market.trim().to_string();
    }
    if let Some(limit) = parse_env(env, "HISTORY_INLINE_TOKEN_LIMIT")? {
        bridge.history_inline_token_limit = limit;
    }
    if let Some(limit) = parse_env(env, "CURRENT_TURN_INLINE_TOKEN_LIMIT")? {
        bridge.current_turn_inline_token_limit = limit;
    }
    if let Some(weight) = parse_env(env, "ASCII_TOKEN_WEIGHT")? {
        bridge.token_weights.ascii = weight;
    }
    if let Some(weight) = parse_env(env, "NON_ASCII_TOKEN_WEIGHT")? {
        bridge.token_weights.non_ascii = weight;
    }
    if let Some(enabled) = parse_env(env, "EXTERNALIZE_HISTORY")? {
        bridge.externalize_history = enabled;
    }

    Ok(())
}

fn parse_env<F, T>(env: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match env(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key: key.to_string(), value: raw }),
    }
}

/// Split a comma-separated agent list, trimming whitespace and dropping empties.
pub fn parse_agent_ids(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    config.validate().map_err(|e| ConfigError::from_validation_errors(&e))?;

    url::Url::parse(&config.bridge.upstream_base_url).map_err(|e| {
        ConfigError::ValidationError {
            field: "upstream_base_url".to_string(),
            message: e.to_string(),
        }
    })?;

    if config.proxy.is_active() {
        url::Url::parse(&config.proxy.proxy_url).map_err(|e| ConfigError::ValidationError {
            field: "proxy_url".to_string(),
            message: e.to_string(),
        })?;
    }

    for (field, weight) in [
        ("ascii_token_weight", config.bridge.token_weights.ascii),
        ("non_ascii_token_weight", config.bridge.token_weights.non_ascii),
    ] {
        if !weight.is_finite() {
            return Err(ConfigError::ValidationError {
                field: field.to_string(),
                message: "must be a finite number".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = load_config_with(env_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
        assert!(!config.proxy.enable_proxy);
        assert_eq!(config.proxy.proxy_timeout_ms, 5000);
        assert_eq!(config.bridge.upstream_base_url, "https://you.com");
    }

    #[test]
    fn test_env_overrides() {
        let config = load_config_with(env_from(&[
            ("PORT", "9090"),
            ("ENABLE_PROXY", "true"),
            ("PROXY_URL", "http://127.0.0.1:3128"),
            ("PROXY_TIMEOUT_MS", "1500"),
            ("AGENT_MODEL_IDS", " research_agent , ,coder "),
            ("HISTORY_INLINE_TOKEN_LIMIT", "100"),
            ("EXTERNALIZE_HISTORY", "false"),
            ("YOUCHAT_BASE_URL", "http://localhost:9999/"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert!(config.proxy.is_active());
        assert_eq!(config.proxy.proxy_timeout_ms, 1500);
        assert_eq!(config.bridge.agent_model_ids, vec!["research_agent", "coder"]);
        assert_eq!(config.bridge.history_inline_token_limit, 100);
        assert!(!config.bridge.externalize_history);
        assert_eq!(config.bridge.upstream_base_url, "http://localhost:9999");
    }

    #[test]
    fn test_enable_proxy_requires_literal_true() {
        let config = load_config_with(env_from(&[("ENABLE_PROXY", "yes")])).unwrap();
        assert!(!config.proxy.enable_proxy);
    }

    #[test]
    fn test_invalid_number_rejected() {
        let err = load_config_with(env_from(&[("PROXY_TIMEOUT_MS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv { key: "PROXY_TIMEOUT_MS".to_string(), value: "soon".to_string() }
        );
    }

    #[test]
    fn test_invalid_proxy_url_rejected() {
        let err = load_config_with(env_from(&[("ENABLE_PROXY", "true"), ("PROXY_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "proxy_url"));
    }

    #[test]
    fn test_config_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("you2api.json");
        fs::write(&path, r#"{"port": 7000, "bridge": {"market": "en-US"}}"#).unwrap();
        let path_str = path.display().to_string();

        let config =
            load_config_with(env_from(&[(CONFIG_PATH_ENV, path_str.as_str()), ("PORT", "7001")])).unwrap();
        assert_eq!(config.port, 7001);
        assert_eq!(config.bridge.market, "en-US");
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_config_with(env_from(&[(CONFIG_PATH_ENV, "/nonexistent/you2api.json")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_parse_agent_ids() {
        assert!(parse_agent_ids("").is_empty());
        assert_eq!(parse_agent_ids("a,b , c"), vec!["a", "b", "c"]);
    }
}
