//! Post-load consistency checks
//!
//! Compares source row counts with destination document counts and inspects one
//! customer and one order as a smoke test of the embedded shapes. Validation never
//! fails the run on its own: any error is captured in [`ValidationReport::error`].

use bson::Document;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::collection::Collection;
use crate::error::Result;
use crate::source::RelationalSource;
use crate::store::DocumentStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountCheck {
    pub collection: Collection,
    pub source_count: u64,
    pub document_count: u64,
    pub matches: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerSample {
    pub id: String,
    pub cart_items: usize,
    /// Cart items not yet ordered (`ord_yn == "N"`)
    pub active_cart_items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSample {
    pub ord_no: i64,
    pub items: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub checks: Vec<CountCheck>,
    pub sample_customer: Option<CustomerSample>,
    pub sample_order: Option<OrderSample>,
    pub warnings: Vec<String>,
    pub overall_success: bool,
    pub error: Option<String>,
    pub duration_seconds: f64,
}

impl ValidationReport {
    pub fn check(&self, collection: Collection) -> Option<&CountCheck> {
        self.checks.iter().find(|c| c.collection == collection)
    }
}

/// Run all checks against both stores
#[instrument(skip_all)]
pub async fn validate(source: &dyn RelationalSource, store: &dyn DocumentStore) -> ValidationReport {
    let started = Instant::now();
    let mut report = ValidationReport::default();

    match run_checks(source, store, &mut report).await {
        Ok(()) => {
            report.overall_success =
                report.checks.len() == Collection::ALL.len() && report.checks.iter().all(|c| c.matches);
        },
        Err(e) => {
            warn!(error = %e, "Validation aborted");
            report.error = Some(e.to_string());
            report.overall_success = false;
        },
    }

    report.duration_seconds = started.elapsed().as_secs_f64();
    info!(
        overall_success = report.overall_success,
        duration_seconds = report.duration_seconds,
        "Validation finished"
    );
    report
}

async fn run_checks(
    source: &dyn RelationalSource,
    store: &dyn DocumentStore,
    report: &mut ValidationReport,
) -> Result<()> {
    for collection in Collection::ALL {
        let source_count = source.count(collection.source_table()).await?;
        let document_count = store.count_documents(collection.name()).await?;
        let matches = source_count == document_count;

        if matches {
            info!(%collection, source_count, document_count, "Counts match");
        } else {
            warn!(%collection, source_count, document_count, "Count mismatch");
        }

        report.checks.push(CountCheck {
            collection,
            source_count,
            document_count,
            matches,
        });
    }

    if let Some(customer) = store.find_one(Collection::Customers.name()).await? {
        match sample_customer(&customer) {
            Some(sample) => report.sample_customer = Some(sample),
            None => report.warnings.push("sample customer document has no readable cart".to_string()),
        }
    }

    if let Some(order) = store.find_one(Collection::Orders.name()).await? {
        match sample_order(&order) {
            Some(sample) => report.sample_order = Some(sample),
            None => report.warnings.push("sample order document has no readable items".to_string()),
        }
    }

    for warning in &report.warnings {
        warn!(warning = %warning, "Sample check");
    }

    Ok(())
}

fn sample_customer(doc: &Document) -> Option<CustomerSample> {
    let id = doc.get_str("_id").ok()?.to_string();
    let cart = doc.get_array("cart").ok()?;
    let active_cart_items = cart
        .iter()
        .filter_map(|item| item.as_document())
        .filter(|item| item.get_str("ord_yn").map(|yn| yn == "N").unwrap_or(false))
        .count();

    Some(CustomerSample {
        id,
        cart_items: cart.len(),
        active_cart_items,
    })
}

fn sample_order(doc: &Document) -> Option<OrderSample> {
    let ord_no = doc.get_i64("ord_no").ok()?;
    let items = doc.get_array("items").ok()?;
    Some(OrderSample {
        ord_no,
        items: items.len(),
    })
}
