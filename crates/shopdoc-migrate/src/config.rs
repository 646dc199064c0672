//! Connection configuration for both stores
//!
//! Everything is read from the environment (after `.env` is loaded by the binary).
//! Required keys are checked together so one run reports every missing key.

use serde::Serialize;
use shopdoc_common::{env::EnvReader, ConfigError, ConfigResult};
use std::time::Duration;

pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_DATABASE_NAME: &str = "shopping_db";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Relational source connection settings
#[derive(Debug, Clone, Serialize)]
pub struct SourceConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub database: String,
    pub connect_timeout_secs: u64,
}

impl SourceConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Document store connection settings
#[derive(Debug, Clone, Serialize)]
pub struct DestinationConfig {
    #[serde(skip_serializing)]
    pub uri: String,
    pub database: String,
}

impl DestinationConfig {
    /// The endpoint without credentials, for log lines
    pub fn redacted_uri(&self) -> &str {
        match self.uri.rsplit_once('@') {
            Some((_, host)) => host,
            None => &self.uri,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationConfig {
    pub source: SourceConfig,
    pub destination: DestinationConfig,
}

impl MigrationConfig {
    /// Load configuration from the process environment
    ///
    /// Environment variables:
    /// - `MYSQL_HOST`, `MYSQL_USER`, `MYSQL_PASSWORD`, `MONGODB_URI` (required)
    /// - `MYSQL_PORT` (default 3306)
    /// - `MYSQL_DATABASE`, `MONGODB_DATABASE` (default `shopping_db`)
    /// - `MYSQL_CONNECT_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_reader(EnvReader::from_process())
    }

    pub fn from_reader<F>(mut env: EnvReader<F>) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = env.required("MYSQL_HOST");
        let user = env.required("MYSQL_USER");
        let password = env.required("MYSQL_PASSWORD");
        let uri = env.required("MONGODB_URI");

        let port = env.parsed("MYSQL_PORT", DEFAULT_MYSQL_PORT);
        let connect_timeout_secs =
            env.parsed("MYSQL_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS);
        let source_database = env.optional("MYSQL_DATABASE", DEFAULT_DATABASE_NAME);
        let destination_database = env.optional("MONGODB_DATABASE", DEFAULT_DATABASE_NAME);

        // Missing keys outrank a malformed optional value
        env.finish()?;
        let port = port?;
        let connect_timeout_secs = connect_timeout_secs?;

        let config = Self {
            source: SourceConfig {
                host,
                port,
                user,
                password,
                database: source_database,
                connect_timeout_secs,
            },
            destination: DestinationConfig {
                uri,
                database: destination_database,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.source.port == 0 {
            return Err(ConfigError::invalid("MYSQL_PORT", "0", "port must be greater than 0"));
        }

        if self.source.connect_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "MYSQL_CONNECT_TIMEOUT_SECS",
                "0",
                "timeout must be greater than 0",
            ));
        }

        if !self.destination.uri.starts_with("mongodb://")
            && !self.destination.uri.starts_with("mongodb+srv://")
        {
            return Err(ConfigError::invalid(
                "MONGODB_URI",
                self.destination.redacted_uri(),
                "expected a mongodb:// or mongodb+srv:// connection string",
            ));
        }

        Ok(())
    }
}
