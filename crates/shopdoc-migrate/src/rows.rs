//! Relational source rows
//!
//! Rows are decoded by column position, matching the `SELECT` lists in
//! [`crate::source::mysql`]. Nullable columns are `Option`s here; the assemblers
//! decide what a null becomes in the document.

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, Row};

// ============================================================================
// Customers / Carts
// ============================================================================

/// `Customers` row
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRow {
    /// Email address, unique
    pub cust_id: String,
    pub passwd: String,
    pub cust_name: String,
    pub m_phone: Option<String>,
    pub agree_terms: Option<String>,
    pub agree_privacy: Option<String>,
    pub agree_marketing: Option<String>,
}

impl<'r> FromRow<'r, MySqlRow> for CustomerRow {
    fn from_row(row: &'r MySqlRow) -> sqlx::Result<Self> {
        Ok(Self {
            cust_id: row.try_get(0)?,
            passwd: row.try_get(1)?,
            cust_name: row.try_get(2)?,
            m_phone: row.try_get(3)?,
            agree_terms: row.try_get(4)?,
            agree_privacy: row.try_get(5)?,
            agree_marketing: row.try_get(6)?,
        })
    }
}

/// `Carts` row, ordered or still in the cart
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemRow {
    pub cust_id: String,
    pub cart_seq_no: i64,
    pub prod_cd: String,
    pub prod_size: Option<String>,
    pub ord_qty: i32,
    /// `Y` once ordered, `N` while still in the cart
    pub ord_yn: String,
}

impl<'r> FromRow<'r, MySqlRow> for CartItemRow {
    fn from_row(row: &'r MySqlRow) -> sqlx::Result<Self> {
        Ok(Self {
            cust_id: row.try_get(0)?,
            cart_seq_no: row.try_get(1)?,
            prod_cd: row.try_get(2)?,
            prod_size: row.try_get(3)?,
            ord_qty: row.try_get(4)?,
            ord_yn: row.try_get(5)?,
        })
    }
}

// ============================================================================
// Products
// ============================================================================

/// `Products` row
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub prod_cd: String,
    pub prod_name: String,
    pub price: BigDecimal,
    pub prod_type: Option<String>,
    pub material: Option<String>,
    pub prod_img: Option<String>,
    /// MEDIUMTEXT, often null
    pub prod_intro: Option<String>,
}

impl<'r> FromRow<'r, MySqlRow> for ProductRow {
    fn from_row(row: &'r MySqlRow) -> sqlx::Result<Self> {
        Ok(Self {
            prod_cd: row.try_get(0)?,
            prod_name: row.try_get(1)?,
            price: row.try_get(2)?,
            prod_type: row.try_get(3)?,
            material: row.try_get(4)?,
            prod_img: row.try_get(5)?,
            prod_intro: row.try_get(6)?,
        })
    }
}

// ============================================================================
// Orders / order lines
// ============================================================================

/// Order date as stored in the source: the column may be `DATE` or `DATETIME`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDate {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl OrderDate {
    /// Full date-time in UTC; a bare calendar date becomes midnight of that day
    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            OrderDate::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
            OrderDate::DateTime(datetime) => datetime.and_utc(),
        }
    }

    fn decode(row: &MySqlRow, index: usize) -> sqlx::Result<Self> {
        match row.try_get::<NaiveDate, _>(index) {
            Ok(date) => Ok(OrderDate::Date(date)),
            Err(e) if is_type_mismatch(&e) => {
                row.try_get::<NaiveDateTime, _>(index).map(OrderDate::DateTime)
            },
            Err(e) => Err(e),
        }
    }
}

/// A column that decoded as the wrong type, as opposed to a NULL or a missing column
fn is_type_mismatch(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::ColumnDecode { source, .. } => {
            !source.is::<sqlx::error::UnexpectedNullError>()
        },
        _ => false,
    }
}

/// `Orders` row
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub ord_no: i64,
    pub ord_date: OrderDate,
    pub ord_amount: Option<BigDecimal>,
    pub cust_id: String,
}

impl<'r> FromRow<'r, MySqlRow> for OrderRow {
    fn from_row(row: &'r MySqlRow) -> sqlx::Result<Self> {
        Ok(Self {
            ord_no: row.try_get(0)?,
            ord_date: OrderDate::decode(row, 1)?,
            ord_amount: row.try_get(2)?,
            cust_id: row.try_get(3)?,
        })
    }
}

/// `Ord_items` row joined with the product's name and price at migration time
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineRow {
    pub ord_no: i64,
    pub ord_item_no: i64,
    pub cart_seq_no: Option<i64>,
    pub prod_cd: String,
    pub prod_size: Option<String>,
    pub ord_qty: i32,
    pub prod_name: String,
    pub price: BigDecimal,
}

impl<'r> FromRow<'r, MySqlRow> for OrderLineRow {
    fn from_row(row: &'r MySqlRow) -> sqlx::Result<Self> {
        Ok(Self {
            ord_no: row.try_get(0)?,
            ord_item_no: row.try_get(1)?,
            cart_seq_no: row.try_get(2)?,
            prod_cd: row.try_get(3)?,
            prod_size: row.try_get(4)?,
            ord_qty: row.try_get(5)?,
            prod_name: row.try_get(6)?,
            price: row.try_get(7)?,
        })
    }
}

/// Number of reviews written against one order line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewTally {
    pub ord_item_no: i64,
    pub reviews: i64,
}

impl<'r> FromRow<'r, MySqlRow> for ReviewTally {
    fn from_row(row: &'r MySqlRow) -> sqlx::Result<Self> {
        Ok(Self {
            ord_item_no: row.try_get(0)?,
            reviews: row.try_get(1)?,
        })
    }
}

// ============================================================================
// Reviews
// ============================================================================

/// `Prod_evals` row joined with the author's name and the reviewed line's order number
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRow {
    pub eval_seq_no: i64,
    pub eval_score: i32,
    pub eval_comment: Option<String>,
    pub cust_id: String,
    pub prod_cd: String,
    pub ord_item_no: i64,
    pub cust_name: String,
    pub ord_no: i64,
}

impl<'r> FromRow<'r, MySqlRow> for ReviewRow {
    fn from_row(row: &'r MySqlRow) -> sqlx::Result<Self> {
        Ok(Self {
            eval_seq_no: row.try_get(0)?,
            eval_score: row.try_get(1)?,
            eval_comment: row.try_get(2)?,
            cust_id: row.try_get(3)?,
            prod_cd: row.try_get(4)?,
            ord_item_no: row.try_get(5)?,
            cust_name: row.try_get(6)?,
            ord_no: row.try_get(7)?,
        })
    }
}
