//! Document assemblers
//!
//! Each assembler is a pure function from fetched rows to documents. Child rows arrive
//! as flat bulk result sets and are grouped here by their parent key.

pub mod customer;
pub mod order;
pub mod product;
pub mod review;

use bigdecimal::{BigDecimal, ToPrimitive};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

use crate::error::{MigrateError, Result};
use crate::rows::ReviewTally;

pub use customer::assemble_customers;
pub use order::assemble_orders;
pub use product::assemble_products;
pub use review::assemble_reviews;

/// Group child rows under their parent key, preserving fetch order within each group
pub(crate) fn group_by<K, T, F>(rows: Vec<T>, key: F) -> HashMap<K, Vec<T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut groups: HashMap<K, Vec<T>> = HashMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(row);
    }
    groups
}

/// Truncate a decimal amount toward zero into whole currency units
pub(crate) fn to_whole_units(amount: &BigDecimal, record: &str, field: &'static str) -> Result<i64> {
    amount
        .with_scale(0)
        .to_i64()
        .ok_or_else(|| MigrateError::Conversion {
            record: record.to_string(),
            field,
            value: amount.to_string(),
        })
}

/// Order lines that have at least one review
#[derive(Debug, Clone, Default)]
pub struct ReviewIndex {
    counts: HashMap<i64, i64>,
}

impl ReviewIndex {
    pub fn from_tallies(tallies: Vec<ReviewTally>) -> Self {
        let mut counts = HashMap::with_capacity(tallies.len());
        for tally in tallies {
            if tally.reviews > 1 {
                debug!(ord_item_no = tally.ord_item_no, reviews = tally.reviews, "Order line has several reviews");
            }
            *counts.entry(tally.ord_item_no).or_insert(0) += tally.reviews;
        }
        Self { counts }
    }

    pub fn is_reviewed(&self, ord_item_no: i64) -> bool {
        self.counts.get(&ord_item_no).is_some_and(|count| *count > 0)
    }

    pub fn reviewed_lines(&self) -> usize {
        self.counts.values().filter(|count| **count > 0).count()
    }
}
