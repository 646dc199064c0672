//! Invocation request and result envelope
//!
//! A request is a small JSON object:
//!
//! ```json
//! { "collections": ["Products", "Orders"], "create_indexes": true, "validate": true }
//! ```
//!
//! Every field is optional. Whatever happens, the caller gets back an [`Envelope`]
//! carrying either the run report or a classified error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::collection::Collection;
use crate::config::MigrationConfig;
use crate::error::{MigrateError, Result};
use crate::pipeline::{MigrationPipeline, MigrationPlan, MigrationReport};
use crate::source::{MySqlSource, RelationalSource};
use crate::store::{DocumentStore, MongoStore};
use shopdoc_common::ConfigResult;

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MigrationRequest {
    /// Collection names; all four when absent
    #[serde(default)]
    pub collections: Option<Vec<String>>,
    #[serde(default = "enabled")]
    pub create_indexes: bool,
    #[serde(default = "enabled")]
    pub validate: bool,
}

impl Default for MigrationRequest {
    fn default() -> Self {
        Self {
            collections: None,
            create_indexes: true,
            validate: true,
        }
    }
}

impl MigrationRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| MigrateError::InvalidRequest(format!("malformed request: {}", e)))
    }

    /// Resolve collection names and fix the run order
    pub fn plan(&self) -> Result<MigrationPlan> {
        let collections: BTreeSet<Collection> = match &self.collections {
            None => Collection::ALL.into_iter().collect(),
            Some(names) => names
                .iter()
                .map(|name| name.parse::<Collection>())
                .collect::<std::result::Result<_, _>>()
                .map_err(MigrateError::InvalidRequest)?,
        };

        if collections.is_empty() {
            return Err(MigrateError::InvalidRequest("no collections requested".to_string()));
        }

        Ok(MigrationPlan {
            collections,
            create_indexes: self.create_indexes,
            validate: self.validate,
        })
    }
}

/// Structured result of one invocation
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<MigrationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl Envelope {
    pub fn completed(request_id: Uuid, report: MigrationReport) -> Self {
        let success = report.succeeded();
        let message = if success {
            "Migration completed successfully"
        } else {
            "Migration completed but validation failed"
        };

        Self {
            success,
            message: Some(message.to_string()),
            results: Some(report),
            error: None,
            error_type: None,
            request_id,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(request_id: Uuid, err: &MigrateError) -> Self {
        Self {
            success: false,
            message: None,
            results: None,
            error: Some(err.to_string()),
            error_type: Some(err.kind().to_string()),
            request_id,
            timestamp: Utc::now(),
        }
    }
}

/// Run the plan against already-open stores, then close both whatever the outcome
pub async fn migrate_with(
    source: &dyn RelationalSource,
    store: &dyn DocumentStore,
    plan: &MigrationPlan,
) -> Result<MigrationReport> {
    let result = MigrationPipeline::new(source, store).run(plan).await;
    source.close().await;
    store.close().await;
    result
}

/// Connect to both stores and run the plan
pub async fn run_migration(config: &MigrationConfig, plan: &MigrationPlan) -> Result<MigrationReport> {
    let source = MySqlSource::connect(&config.source).await?;

    let store = match MongoStore::connect(&config.destination).await {
        Ok(store) => store,
        Err(e) => {
            source.close().await;
            return Err(e);
        },
    };

    migrate_with(&source, &store, plan).await
}

async fn checked_run(
    request: &MigrationRequest,
    config: ConfigResult<MigrationConfig>,
) -> Result<MigrationReport> {
    let plan = request.plan()?;
    let config = config?;
    run_migration(&config, &plan).await
}

/// Full invocation: check the request and configuration, run, and wrap the outcome.
///
/// Request and configuration problems are reported before any connection is opened.
#[instrument(skip_all, fields(request_id = tracing::field::Empty))]
pub async fn handle(request: &MigrationRequest, config: ConfigResult<MigrationConfig>) -> Envelope {
    let request_id = Uuid::new_v4();
    tracing::Span::current().record("request_id", tracing::field::display(request_id));

    match checked_run(request, config).await {
        Ok(report) => {
            info!(succeeded = report.succeeded(), "Invocation finished");
            Envelope::completed(request_id, report)
        },
        Err(e) => {
            error!(error = %e, error_type = e.kind(), "Migration failed");
            Envelope::failed(request_id, &e)
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_means_everything() {
        let request = MigrationRequest::from_json("{}").unwrap();
        let plan = request.plan().unwrap();
        assert_eq!(plan, MigrationPlan::default());
    }

    #[test]
    fn test_flags_are_read() {
        let request =
            MigrationRequest::from_json(r#"{"create_indexes": false, "validate": false}"#).unwrap();
        let plan = request.plan().unwrap();
        assert!(!plan.create_indexes);
        assert!(!plan.validate);
    }

    #[test]
    fn test_malformed_request() {
        let err = MigrationRequest::from_json(r#"{"collections": "Products"}"#).unwrap_err();
        assert_eq!(err.kind(), "invalid_request");
    }

    #[test]
    fn test_empty_collection_list_rejected() {
        let request = MigrationRequest {
            collections: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(request.plan().unwrap_err().kind(), "invalid_request");
    }
}
