//! Destination collections and the source tables behind them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A destination collection.
///
/// Variant order is migration order: orders and reviews are assembled from joins
/// that assume products and customers were handled first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Collection {
    Products,
    Customers,
    Orders,
    Reviews,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Products,
        Collection::Customers,
        Collection::Orders,
        Collection::Reviews,
    ];

    /// Collection name in the document store
    pub fn name(self) -> &'static str {
        match self {
            Collection::Products => "Products",
            Collection::Customers => "Customers",
            Collection::Orders => "Orders",
            Collection::Reviews => "Reviews",
        }
    }

    /// Table whose row count must equal this collection's document count
    pub fn source_table(self) -> SourceTable {
        match self {
            Collection::Products => SourceTable::Products,
            Collection::Customers => SourceTable::Customers,
            Collection::Orders => SourceTable::Orders,
            Collection::Reviews => SourceTable::Reviews,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown collection '{}' (expected one of Products, Customers, Orders, Reviews)",
                    s
                )
            })
    }
}

/// Relational tables read by the migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceTable {
    Customers,
    Products,
    Carts,
    Orders,
    OrderItems,
    Reviews,
}

impl SourceTable {
    pub fn table_name(self) -> &'static str {
        match self {
            SourceTable::Customers => "Customers",
            SourceTable::Products => "Products",
            SourceTable::Carts => "Carts",
            SourceTable::Orders => "Orders",
            SourceTable::OrderItems => "Ord_items",
            SourceTable::Reviews => "Prod_evals",
        }
    }
}

impl fmt::Display for SourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}
