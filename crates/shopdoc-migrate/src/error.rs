//! Migration error types

use shopdoc_common::ConfigError;
use thiserror::Error;

/// Result type alias for migration operations
pub type Result<T> = std::result::Result<T, MigrateError>;

/// Everything that can stop a migration run.
///
/// Index build and validation failures never surface here: the pipeline downgrades
/// them into its report.
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The invocation request names something the migration does not know
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Source database error: {0}")]
    Source(#[from] sqlx::Error),

    #[error("Document store error: {0}")]
    Destination(#[from] mongodb::error::Error),

    #[error("Document encoding error: {0}")]
    Encoding(#[from] bson::ser::Error),

    /// A relational value cannot be represented in the document type system
    #[error("Cannot convert {field} value '{value}' for {record}")]
    Conversion {
        record: String,
        field: &'static str,
        value: String,
    },

    /// The document store accepted the call but not the outcome we asked for
    #[error("Document store rejected {operation} on {collection}: {message}")]
    Rejected {
        collection: String,
        operation: &'static str,
        message: String,
    },
}

impl MigrateError {
    /// Stable classification used as `error_type` in the result envelope
    pub fn kind(&self) -> &'static str {
        match self {
            MigrateError::Config(ConfigError::Missing(_)) => "missing_configuration",
            MigrateError::Config(ConfigError::Invalid { .. }) => "configuration",
            MigrateError::InvalidRequest(_) => "invalid_request",
            MigrateError::Source(_) => "source",
            MigrateError::Destination(_) | MigrateError::Rejected { .. } => "destination",
            MigrateError::Encoding(_) => "encoding",
            MigrateError::Conversion { .. } => "conversion",
        }
    }

    pub fn rejected(collection: &str, operation: &'static str, message: impl Into<String>) -> Self {
        Self::Rejected {
            collection: collection.to_string(),
            operation,
            message: message.into(),
        }
    }
}
