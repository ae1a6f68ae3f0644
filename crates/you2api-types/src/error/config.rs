//! Configuration-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// Config file not found at expected path
    #[error("Config not found: {path}")]
    NotFound {
        /// Filesystem path where config was expected
        path: String,
    },

    /// Config file parse error (JSON)
    #[error("Config parse error: {message}")]
    ParseError {
        /// Description of the parse failure
        message: String,
    },

    /// Environment variable holds a value that cannot be parsed
    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv {
        /// Environment variable name
        key: String,
        /// Raw value found in the environment
        value: String,
    },

    /// Config validation error (invalid values)
    #[error("Config validation error for {field}: {message}")]
    ValidationError {
        /// Name of the field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },
}

impl ConfigError {
    /// Create a parse error from a serde_json error.
    pub fn from_json_error(e: &serde_json::Error) -> Self {
        Self::ParseError { message: e.to_string() }
    }

    /// Flatten `validator` output into the first failing field.
    pub fn from_validation_errors(errors: &validator::ValidationErrors) -> Self {
        let field = errors
            .errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "config".to_string());
        Self::ValidationError { field, message: errors.to_string() }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = ConfigError::InvalidEnv { key: "PORT".to_string(), value: "abc".to_string() };

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("InvalidEnv"));
        assert!(json.contains("PORT"));

        let deserialized: ConfigError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidEnv { key: "PORT".to_string(), value: "abc".to_string() };
        let msg = format!("{}", err);
        assert!(msg.contains("PORT"));
        assert!(msg.contains("abc"));
    }
}
