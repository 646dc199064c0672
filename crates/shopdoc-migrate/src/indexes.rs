//! Read-side indexes declared after all collections are loaded
//!
//! Indexes only make reads faster: a failed index is a warning in the run report,
//! never a reason to stop.

use bson::{Bson, Document};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::collection::Collection;
use crate::store::DocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKey {
    Ascending,
    Descending,
    Text,
}

impl IndexKey {
    fn to_bson(self) -> Bson {
        match self {
            IndexKey::Ascending => Bson::Int32(1),
            IndexKey::Descending => Bson::Int32(-1),
            IndexKey::Text => Bson::String("text".to_string()),
        }
    }
}

/// One index declaration on a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub collection: Collection,
    pub keys: Vec<(&'static str, IndexKey)>,
}

impl IndexSpec {
    fn new(collection: Collection, keys: &[(&'static str, IndexKey)]) -> Self {
        Self {
            collection,
            keys: keys.to_vec(),
        }
    }

    /// Key document in declaration order, e.g. `{ cust_id: 1, ord_date: -1 }`
    pub fn keys_document(&self) -> Document {
        self.keys
            .iter()
            .map(|(field, key)| (field.to_string(), key.to_bson()))
            .collect()
    }

    /// Human-readable label such as `Orders(cust_id_1_ord_date_-1)`
    pub fn label(&self) -> String {
        let keys: Vec<String> = self
            .keys
            .iter()
            .map(|(field, key)| match key {
                IndexKey::Ascending => format!("{}_1", field),
                IndexKey::Descending => format!("{}_-1", field),
                IndexKey::Text => format!("{}_text", field),
            })
            .collect();
        format!("{}({})", self.collection, keys.join("_"))
    }
}

/// The fixed index set
pub fn index_plan() -> Vec<IndexSpec> {
    use IndexKey::{Ascending, Descending, Text};

    vec![
        // Category listing sorted by price
        IndexSpec::new(Collection::Products, &[("prod_type", Ascending), ("price", Ascending)]),
        // Product name search
        IndexSpec::new(Collection::Products, &[("prod_name", Text)]),
        // A customer's order history, newest first
        IndexSpec::new(Collection::Orders, &[("cust_id", Ascending), ("ord_date", Descending)]),
        // Lines still waiting for a review
        IndexSpec::new(
            Collection::Orders,
            &[("items.review_written", Ascending), ("cust_id", Ascending)],
        ),
        // A product's reviews, newest first
        IndexSpec::new(Collection::Reviews, &[("prod_cd", Ascending), ("eval_date", Descending)]),
        IndexSpec::new(Collection::Reviews, &[("cust_id", Ascending)]),
    ]
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexReport {
    pub declared: usize,
    pub failed: usize,
    pub warnings: Vec<String>,
    pub duration_seconds: f64,
}

impl IndexReport {
    pub fn all_created(&self) -> bool {
        self.failed == 0
    }
}

/// Declare every index in the plan, continuing past failures
#[instrument(skip_all)]
pub async fn build_indexes(store: &dyn DocumentStore) -> IndexReport {
    let started = Instant::now();
    let plan = index_plan();
    let mut report = IndexReport::default();

    info!(indexes = plan.len(), "Creating indexes");

    for spec in &plan {
        match store.create_index(spec).await {
            Ok(()) => report.declared += 1,
            Err(e) => {
                let message = format!("{}: {}", spec.label(), e);
                warn!(index = %spec.label(), error = %e, "Index creation failed");
                report.failed += 1;
                report.warnings.push(message);
            },
        }
    }

    report.duration_seconds = started.elapsed().as_secs_f64();
    info!(
        declared = report.declared,
        failed = report.failed,
        duration_seconds = report.duration_seconds,
        "Index creation finished"
    );
    report
}
