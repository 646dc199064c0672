//! MySQL source on a single-connection sqlx pool

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::FromRow;
use tracing::{debug, info, instrument};

use super::RelationalSource;
use crate::collection::SourceTable;
use crate::config::SourceConfig;
use crate::error::Result;
use crate::rows::{
    CartItemRow, CustomerRow, OrderLineRow, OrderRow, ProductRow, ReviewRow, ReviewTally,
};

const PRODUCTS_QUERY: &str = "SELECT * FROM Products";

const CUSTOMERS_QUERY: &str = "SELECT * FROM Customers";

const CART_ITEMS_QUERY: &str = r#"
    SELECT cust_id, cart_seq_no, prod_cd, prod_size, ord_qty, ord_yn
    FROM Carts
    ORDER BY cust_id, cart_seq_no
"#;

const ORDERS_QUERY: &str = "SELECT * FROM Orders";

const ORDER_LINES_QUERY: &str = r#"
    SELECT oi.ord_no, oi.ord_item_no, oi.cart_seq_no, oi.prod_cd, oi.prod_size, oi.ord_qty,
           p.prod_name, p.price
    FROM Ord_items oi
    JOIN Products p ON oi.prod_cd = p.prod_cd
    ORDER BY oi.ord_no, oi.ord_item_no
"#;

const REVIEW_TALLIES_QUERY: &str = r#"
    SELECT ord_item_no, COUNT(*) AS review_count
    FROM Prod_evals
    GROUP BY ord_item_no
"#;

const REVIEWS_QUERY: &str = r#"
    SELECT pe.eval_seq_no, pe.eval_score, pe.eval_comment, pe.cust_id,
           pe.prod_cd, pe.ord_item_no, c.cust_name, oi.ord_no
    FROM Prod_evals pe
    JOIN Customers c ON pe.cust_id = c.cust_id
    JOIN Ord_items oi ON pe.ord_item_no = oi.ord_item_no
    ORDER BY pe.eval_seq_no
"#;

/// Relational source backed by MySQL
pub struct MySqlSource {
    pool: MySqlPool,
}

impl MySqlSource {
    /// Open the run's single connection
    pub async fn connect(config: &SourceConfig) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(config.connect_timeout())
            .connect_with(options)
            .await?;

        info!(host = %config.host, database = %config.database, "MySQL connection established");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Run a read-only query and return every row, decoded positionally
    pub async fn fetch_all<T>(&self, sql: &str) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let rows = sqlx::query_as::<_, T>(sql).fetch_all(&self.pool).await?;
        debug!(rows = rows.len(), "Fetched result set");
        Ok(rows)
    }
}

#[async_trait]
impl RelationalSource for MySqlSource {
    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<ProductRow>> {
        self.fetch_all(PRODUCTS_QUERY).await
    }

    #[instrument(skip(self))]
    async fn customers(&self) -> Result<Vec<CustomerRow>> {
        self.fetch_all(CUSTOMERS_QUERY).await
    }

    #[instrument(skip(self))]
    async fn cart_items(&self) -> Result<Vec<CartItemRow>> {
        self.fetch_all(CART_ITEMS_QUERY).await
    }

    #[instrument(skip(self))]
    async fn orders(&self) -> Result<Vec<OrderRow>> {
        self.fetch_all(ORDERS_QUERY).await
    }

    #[instrument(skip(self))]
    async fn order_lines(&self) -> Result<Vec<OrderLineRow>> {
        self.fetch_all(ORDER_LINES_QUERY).await
    }

    #[instrument(skip(self))]
    async fn review_tallies(&self) -> Result<Vec<ReviewTally>> {
        self.fetch_all(REVIEW_TALLIES_QUERY).await
    }

    #[instrument(skip(self))]
    async fn reviews(&self) -> Result<Vec<ReviewRow>> {
        self.fetch_all(REVIEWS_QUERY).await
    }

    async fn count(&self, table: SourceTable) -> Result<u64> {
        // Table names come from a closed enum, never from input
        let sql = format!("SELECT COUNT(*) FROM {}", table.table_name());
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            info!("MySQL connection closed");
        }
    }
}
