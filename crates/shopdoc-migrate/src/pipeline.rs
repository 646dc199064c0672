//! Migration orchestrator
//!
//! Runs the requested collections in fixed order (Products, Customers, Orders,
//! Reviews), then the optional index and validation stages. Each collection is fully
//! assembled and loaded before the next one starts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::assemble::{
    assemble_customers, assemble_orders, assemble_products, assemble_reviews, ReviewIndex,
};
use crate::collection::{Collection, SourceTable};
use crate::documents::encode_all;
use crate::error::Result;
use crate::indexes::{build_indexes, IndexReport};
use crate::loader::load_collection;
use crate::source::RelationalSource;
use crate::store::DocumentStore;
use crate::validate::{validate, ValidationReport};

/// What a run should do, already checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    /// Iterates in migration order whatever order the caller listed them in
    pub collections: BTreeSet<Collection>,
    pub create_indexes: bool,
    pub validate: bool,
}

impl Default for MigrationPlan {
    fn default() -> Self {
        Self {
            collections: Collection::ALL.into_iter().collect(),
            create_indexes: true,
            validate: true,
        }
    }
}

/// Outcome of migrating one collection
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub collection_name: Collection,
    /// Documents inserted
    pub count: usize,
    /// Parent rows read from the source
    pub source_records: usize,
    /// Documents assembled
    pub documents: usize,
    pub duration_seconds: f64,
    /// Cart items embedded across all customer documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cart_items: Option<usize>,
    /// Order lines embedded across all order documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_order_items: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub migrated_at: DateTime<Utc>,
    pub collections: Vec<CollectionReport>,
    pub indexes: Option<IndexReport>,
    pub validation: Option<ValidationReport>,
    pub total_duration_seconds: f64,
}

impl MigrationReport {
    /// Validation verdict, or true when validation was skipped
    pub fn succeeded(&self) -> bool {
        self.validation.as_ref().map_or(true, |v| v.overall_success)
    }

    pub fn collection(&self, collection: Collection) -> Option<&CollectionReport> {
        self.collections.iter().find(|c| c.collection_name == collection)
    }

    /// Total documents inserted across collections
    pub fn documents_loaded(&self) -> usize {
        self.collections.iter().map(|c| c.count).sum()
    }
}

#[derive(Default)]
struct Assembled {
    source_records: usize,
    documents: Vec<bson::Document>,
    total_cart_items: Option<usize>,
    total_order_items: Option<usize>,
    warnings: Vec<String>,
}

/// Warning text when a join or grouping kept fewer rows than the source table holds
fn dropped_rows(table: SourceTable, raw: u64, kept: usize, reason: &str) -> Option<String> {
    let kept = kept as u64;
    if kept >= raw {
        return None;
    }
    let dropped = raw - kept;
    warn!(table = table.table_name(), dropped, raw, kept, reason, "Source rows not migrated");
    Some(format!(
        "{} of {} {} rows {} and were not migrated",
        dropped,
        raw,
        table.table_name(),
        reason
    ))
}

pub struct MigrationPipeline<'a> {
    source: &'a dyn RelationalSource,
    store: &'a dyn DocumentStore,
    migrated_at: DateTime<Utc>,
}

impl<'a> MigrationPipeline<'a> {
    pub fn new(source: &'a dyn RelationalSource, store: &'a dyn DocumentStore) -> Self {
        Self {
            source,
            store,
            migrated_at: Utc::now(),
        }
    }

    /// Use a fixed migration timestamp instead of the current time
    pub fn with_timestamp(mut self, migrated_at: DateTime<Utc>) -> Self {
        self.migrated_at = migrated_at;
        self
    }

    #[instrument(skip_all, fields(collections = plan.collections.len()))]
    pub async fn run(&self, plan: &MigrationPlan) -> Result<MigrationReport> {
        let started = Instant::now();
        info!(
            migrated_at = %self.migrated_at,
            create_indexes = plan.create_indexes,
            validate = plan.validate,
            "Starting migration"
        );

        let mut collections = Vec::with_capacity(plan.collections.len());
        for collection in &plan.collections {
            collections.push(self.migrate_collection(*collection).await?);
        }

        let indexes = if plan.create_indexes {
            Some(build_indexes(self.store).await)
        } else {
            info!("Index creation skipped");
            None
        };

        let validation = if plan.validate {
            Some(validate(self.source, self.store).await)
        } else {
            info!("Validation skipped");
            None
        };

        let report = MigrationReport {
            migrated_at: self.migrated_at,
            collections,
            indexes,
            validation,
            total_duration_seconds: started.elapsed().as_secs_f64(),
        };

        info!(
            documents = report.documents_loaded(),
            succeeded = report.succeeded(),
            total_duration_seconds = report.total_duration_seconds,
            "Migration finished"
        );
        Ok(report)
    }

    #[instrument(skip_all, fields(collection = %collection))]
    async fn migrate_collection(&self, collection: Collection) -> Result<CollectionReport> {
        let started = Instant::now();

        let assembled = match collection {
            Collection::Products => self.assemble_products().await?,
            Collection::Customers => self.assemble_customers().await?,
            Collection::Orders => self.assemble_orders().await?,
            Collection::Reviews => self.assemble_reviews().await?,
        };

        let documents = assembled.documents.len();
        let count = load_collection(self.store, collection, assembled.documents).await?;
        let duration_seconds = started.elapsed().as_secs_f64();

        info!(
            source_records = assembled.source_records,
            documents,
            duration_seconds,
            "Collection migrated"
        );

        Ok(CollectionReport {
            collection_name: collection,
            count,
            source_records: assembled.source_records,
            documents,
            duration_seconds,
            total_cart_items: assembled.total_cart_items,
            total_order_items: assembled.total_order_items,
            warnings: assembled.warnings,
        })
    }

    async fn assemble_products(&self) -> Result<Assembled> {
        let rows = self.source.products().await?;
        let source_records = rows.len();
        let documents = encode_all(&assemble_products(rows)?)?;
        Ok(Assembled {
            source_records,
            documents,
            ..Default::default()
        })
    }

    async fn assemble_customers(&self) -> Result<Assembled> {
        let customers = self.source.customers().await?;
        let cart_items = self.source.cart_items().await?;
        let raw_cart_items = self.source.count(SourceTable::Carts).await?;

        let source_records = customers.len();
        let assembled = assemble_customers(customers, cart_items, self.migrated_at);
        let total_cart_items: usize = assembled.iter().map(|c| c.cart.len()).sum();
        let warnings = dropped_rows(
            SourceTable::Carts,
            raw_cart_items,
            total_cart_items,
            "belong to no existing customer",
        )
        .into_iter()
        .collect();

        Ok(Assembled {
            source_records,
            documents: encode_all(&assembled)?,
            total_cart_items: Some(total_cart_items),
            warnings,
            ..Default::default()
        })
    }

    async fn assemble_orders(&self) -> Result<Assembled> {
        let orders = self.source.orders().await?;
        let lines = self.source.order_lines().await?;
        let reviews = ReviewIndex::from_tallies(self.source.review_tallies().await?);
        let raw_lines = self.source.count(SourceTable::OrderItems).await?;

        let source_records = orders.len();
        let assembled = assemble_orders(orders, lines, &reviews)?;
        let total_order_items: usize = assembled.iter().map(|o| o.items.len()).sum();
        let warnings = dropped_rows(
            SourceTable::OrderItems,
            raw_lines,
            total_order_items,
            "have no matching product or order",
        )
        .into_iter()
        .collect();

        Ok(Assembled {
            source_records,
            documents: encode_all(&assembled)?,
            total_order_items: Some(total_order_items),
            warnings,
            ..Default::default()
        })
    }

    async fn assemble_reviews(&self) -> Result<Assembled> {
        let rows = self.source.reviews().await?;
        let raw_reviews = self.source.count(SourceTable::Reviews).await?;
        let warnings = dropped_rows(
            SourceTable::Reviews,
            raw_reviews,
            rows.len(),
            "reference a missing customer or order line",
        )
        .into_iter()
        .collect();

        let documents = encode_all(&assemble_reviews(rows, self.migrated_at))?;
        Ok(Assembled {
            source_records: usize::try_from(raw_reviews).unwrap_or(usize::MAX),
            documents,
            warnings,
            ..Default::default()
        })
    }
}
