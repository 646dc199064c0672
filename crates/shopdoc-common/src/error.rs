//! Configuration error types

use thiserror::Error;

/// Result type alias for configuration loading
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors raised while reading configuration, before any connection is attempted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required variables are unset or empty
    #[error("Missing required configuration: {}", .0.join(", "))]
    Missing(Vec<String>),

    /// A variable is set but its value cannot be used
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
