//! Shopdoc Migrate Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Moves the relational shop schema into a document store as denormalized,
//! embedded-document collections.
//!
//! # Collections
//!
//! - **Products**: one document per product, long description nested under `detail`
//! - **Customers**: one document per customer with the whole cart embedded
//! - **Orders**: one document per order with its lines embedded, each line enriched with
//!   the product name and whether it has been reviewed
//! - **Reviews**: one document per review with author name and order number resolved
//!
//! Every run drops and rewrites the collections it migrates, then optionally declares
//! read indexes and compares source and destination counts.
//!
//! # Example
//!
//! ```no_run
//! use shopdoc_migrate::{run_migration, MigrationConfig, MigrationRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MigrationConfig::from_env()?;
//!     let plan = MigrationRequest::default().plan()?;
//!     let report = run_migration(&config, &plan).await?;
//!     println!("{} documents loaded", report.documents_loaded());
//!     Ok(())
//! }
//! ```

pub mod assemble;
pub mod collection;
pub mod config;
pub mod documents;
pub mod envelope;
pub mod error;
pub mod indexes;
pub mod loader;
pub mod pipeline;
pub mod rows;
pub mod source;
pub mod store;
pub mod validate;

pub use collection::{Collection, SourceTable};
pub use config::MigrationConfig;
pub use envelope::{handle, migrate_with, run_migration, Envelope, MigrationRequest};
pub use error::{MigrateError, Result};
pub use pipeline::{CollectionReport, MigrationPipeline, MigrationPlan, MigrationReport};
pub use source::{MySqlSource, RelationalSource};
pub use store::{DocumentStore, MongoStore};
