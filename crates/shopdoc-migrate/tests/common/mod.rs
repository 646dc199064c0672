//! Shared fixtures for shopdoc-migrate integration tests
//!
//! - [`FakeSource`]: in-memory relational source with optional failure injection
//! - [`MemoryStore`]: in-memory document store that records drops and indexes
//! - [`shop_fixture`]: a small shop with carts, orders, lines and reviews

#![allow(dead_code)]

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use bson::Document;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use shopdoc_migrate::indexes::IndexSpec;
use shopdoc_migrate::rows::{
    CartItemRow, CustomerRow, OrderDate, OrderLineRow, OrderRow, ProductRow, ReviewRow,
    ReviewTally,
};
use shopdoc_migrate::{DocumentStore, MigrateError, RelationalSource, Result, SourceTable};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub fn init_test_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,shopdoc_migrate=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Fixed migration time with whole-millisecond precision, as BSON stores it
pub fn migration_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap()
}

fn decimal(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

// ============================================================================
// Relational source
// ============================================================================

#[derive(Default)]
pub struct FakeSource {
    pub products: Vec<ProductRow>,
    pub customers: Vec<CustomerRow>,
    pub cart_items: Vec<CartItemRow>,
    pub orders: Vec<OrderRow>,
    pub order_lines: Vec<OrderLineRow>,
    pub review_tallies: Vec<ReviewTally>,
    pub reviews: Vec<ReviewRow>,
    /// Raw `Ord_items` rows, including lines that do not join to a product
    pub raw_order_items: Option<u64>,
    /// Raw `Prod_evals` rows, including reviews the join drops
    pub raw_reviews: Option<u64>,
    /// Name of the fetch that should fail
    pub fail_on: Option<&'static str>,
    pub closed: AtomicBool,
}

impl FakeSource {
    fn fetch<T: Clone>(&self, name: &'static str, rows: &[T]) -> Result<Vec<T>> {
        if self.fail_on == Some(name) {
            return Err(MigrateError::Source(sqlx::Error::Protocol(format!(
                "simulated failure in {}",
                name
            ))));
        }
        Ok(rows.to_vec())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelationalSource for FakeSource {
    async fn products(&self) -> Result<Vec<ProductRow>> {
        self.fetch("products", &self.products)
    }

    async fn customers(&self) -> Result<Vec<CustomerRow>> {
        self.fetch("customers", &self.customers)
    }

    async fn cart_items(&self) -> Result<Vec<CartItemRow>> {
        self.fetch("cart_items", &self.cart_items)
    }

    async fn orders(&self) -> Result<Vec<OrderRow>> {
        self.fetch("orders", &self.orders)
    }

    async fn order_lines(&self) -> Result<Vec<OrderLineRow>> {
        self.fetch("order_lines", &self.order_lines)
    }

    async fn review_tallies(&self) -> Result<Vec<ReviewTally>> {
        self.fetch("review_tallies", &self.review_tallies)
    }

    async fn reviews(&self) -> Result<Vec<ReviewRow>> {
        self.fetch("reviews", &self.reviews)
    }

    async fn count(&self, table: SourceTable) -> Result<u64> {
        let count = match table {
            SourceTable::Customers => self.customers.len() as u64,
            SourceTable::Products => self.products.len() as u64,
            SourceTable::Carts => self.cart_items.len() as u64,
            SourceTable::Orders => self.orders.len() as u64,
            SourceTable::OrderItems => {
                self.raw_order_items.unwrap_or(self.order_lines.len() as u64)
            },
            SourceTable::Reviews => self.raw_reviews.unwrap_or(self.reviews.len() as u64),
        };
        Ok(count)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

// ============================================================================
// Document store
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<BTreeMap<String, Vec<Document>>>,
    drops: Mutex<Vec<String>>,
    indexes: Mutex<Vec<IndexSpec>>,
    deny_indexes: bool,
    fail_counts: bool,
    fail_inserts: Option<String>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every index declaration, like a user without `createIndex`
    pub fn denying_indexes() -> Self {
        Self {
            deny_indexes: true,
            ..Self::default()
        }
    }

    /// Fail every count, to exercise validation error capture
    pub fn failing_counts() -> Self {
        Self {
            fail_counts: true,
            ..Self::default()
        }
    }

    /// Acknowledge none of the documents written to `collection`
    pub fn failing_inserts(collection: &str) -> Self {
        Self {
            fail_inserts: Some(collection.to_string()),
            ..Self::default()
        }
    }

    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn seed(&self, collection: &str, documents: Vec<Document>) {
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
    }

    pub fn drops(&self) -> Vec<String> {
        self.drops.lock().unwrap().clone()
    }

    pub fn indexes(&self) -> Vec<IndexSpec> {
        self.indexes.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn drop_collection(&self, collection: &str) -> Result<()> {
        self.collections.lock().unwrap().remove(collection);
        self.drops.lock().unwrap().push(collection.to_string());
        Ok(())
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<usize> {
        if self.fail_inserts.as_deref() == Some(collection) {
            return Err(MigrateError::rejected(
                collection,
                "insert_many",
                format!("acknowledged 0 of {} documents", documents.len()),
            ));
        }
        let inserted = documents.len();
        self.seed(collection, documents);
        Ok(inserted)
    }

    async fn create_index(&self, index: &IndexSpec) -> Result<()> {
        if self.deny_indexes {
            return Err(MigrateError::rejected(
                index.collection.name(),
                "create_index",
                "not authorized to create indexes",
            ));
        }
        let mut indexes = self.indexes.lock().unwrap();
        if !indexes.contains(index) {
            indexes.push(index.clone());
        }
        Ok(())
    }

    async fn count_documents(&self, collection: &str) -> Result<u64> {
        if self.fail_counts {
            return Err(MigrateError::rejected(collection, "count_documents", "connection reset"));
        }
        Ok(self.documents(collection).len() as u64)
    }

    async fn find_one(&self, collection: &str) -> Result<Option<Document>> {
        Ok(self.documents(collection).into_iter().next())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

// ============================================================================
// Fixture rows
// ============================================================================

pub fn product(code: &str, price: &str, intro: Option<&str>) -> ProductRow {
    ProductRow {
        prod_cd: code.to_string(),
        prod_name: format!("Product {}", code),
        price: decimal(price),
        prod_type: Some("TOP".to_string()),
        material: Some("linen".to_string()),
        prod_img: Some(format!("{}.jpg", code)),
        prod_intro: intro.map(str::to_string),
    }
}

pub fn customer(id: &str, name: &str) -> CustomerRow {
    CustomerRow {
        cust_id: id.to_string(),
        passwd: "5f4dcc3b5aa765d61d8327deb882cf99".to_string(),
        cust_name: name.to_string(),
        m_phone: Some("010-0000-0000".to_string()),
        agree_terms: Some("Y".to_string()),
        agree_privacy: Some("Y".to_string()),
        agree_marketing: Some("N".to_string()),
    }
}

pub fn cart_item(cust_id: &str, seq: i64, prod_cd: &str, ord_yn: &str) -> CartItemRow {
    CartItemRow {
        cust_id: cust_id.to_string(),
        cart_seq_no: seq,
        prod_cd: prod_cd.to_string(),
        prod_size: Some("M".to_string()),
        ord_qty: 1,
        ord_yn: ord_yn.to_string(),
    }
}

pub fn order(ord_no: i64, ord_date: OrderDate, amount: Option<&str>, cust_id: &str) -> OrderRow {
    OrderRow {
        ord_no,
        ord_date,
        ord_amount: amount.map(decimal),
        cust_id: cust_id.to_string(),
    }
}

pub fn order_line(ord_no: i64, ord_item_no: i64, product: &ProductRow) -> OrderLineRow {
    OrderLineRow {
        ord_no,
        ord_item_no,
        cart_seq_no: Some(ord_item_no),
        prod_cd: product.prod_cd.clone(),
        prod_size: Some("M".to_string()),
        ord_qty: 1,
        prod_name: product.prod_name.clone(),
        price: product.price.clone(),
    }
}

pub fn review(seq: i64, ord_no: i64, ord_item_no: i64, comment: Option<&str>) -> ReviewRow {
    ReviewRow {
        eval_seq_no: seq,
        eval_score: 5,
        eval_comment: comment.map(str::to_string),
        cust_id: "kim@example.com".to_string(),
        prod_cd: "P001".to_string(),
        ord_item_no,
        cust_name: "Kim Minji".to_string(),
        ord_no,
    }
}

/// Two customers (one with a three-item cart, one with none), three products,
/// two orders with three lines, one reviewed line.
pub fn shop_fixture() -> FakeSource {
    let products = vec![
        product("P001", "19.99", Some("Breathable summer shirt")),
        product("P002", "45000.00", None),
        product("P003", "12500.50", None),
    ];

    let calendar_day = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
    let placed_at = NaiveDate::from_ymd_opt(2024, 7, 2)
        .unwrap()
        .and_hms_opt(15, 20, 0)
        .unwrap();

    FakeSource {
        customers: vec![
            customer("kim@example.com", "Kim Minji"),
            customer("lee@example.com", "Lee Jun"),
        ],
        cart_items: vec![
            cart_item("kim@example.com", 3, "P003", "N"),
            cart_item("kim@example.com", 1, "P001", "Y"),
            cart_item("kim@example.com", 2, "P002", "N"),
        ],
        orders: vec![
            order(1001, OrderDate::Date(calendar_day), Some("64999.99"), "kim@example.com"),
            order(1002, OrderDate::DateTime(placed_at), None, "lee@example.com"),
        ],
        order_lines: vec![
            order_line(1001, 12, &products[1]),
            order_line(1001, 11, &products[0]),
            order_line(1002, 21, &products[2]),
        ],
        review_tallies: vec![ReviewTally {
            ord_item_no: 11,
            reviews: 1,
        }],
        reviews: vec![review(1, 1001, 11, None)],
        products,
        ..Default::default()
    }
}
