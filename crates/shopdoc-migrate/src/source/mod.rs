//! Relational source access
//!
//! The pipeline reads every table through [`RelationalSource`]. Child rows (cart items,
//! order lines, review tallies) come back in one bulk fetch each and are grouped in
//! memory by the assemblers, so the number of queries per run is fixed regardless of
//! how many customers or orders exist.

pub mod mysql;

use async_trait::async_trait;

use crate::collection::SourceTable;
use crate::error::Result;
use crate::rows::{
    CartItemRow, CustomerRow, OrderLineRow, OrderRow, ProductRow, ReviewRow, ReviewTally,
};

pub use mysql::MySqlSource;

/// Read-only view of the relational shop schema
#[async_trait]
pub trait RelationalSource: Send + Sync {
    async fn products(&self) -> Result<Vec<ProductRow>>;

    async fn customers(&self) -> Result<Vec<CustomerRow>>;

    /// Every cart row, ordered by customer then sequence number
    async fn cart_items(&self) -> Result<Vec<CartItemRow>>;

    async fn orders(&self) -> Result<Vec<OrderRow>>;

    /// Every order line that joins to a product, ordered by order then line number
    async fn order_lines(&self) -> Result<Vec<OrderLineRow>>;

    /// Review count per reviewed order line
    async fn review_tallies(&self) -> Result<Vec<ReviewTally>>;

    /// Reviews joined with author name and order number
    async fn reviews(&self) -> Result<Vec<ReviewRow>>;

    async fn count(&self, table: SourceTable) -> Result<u64>;

    /// Release the connection. Safe to call on every exit path.
    async fn close(&self);
}
