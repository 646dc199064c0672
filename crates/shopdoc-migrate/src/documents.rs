//! Destination document shapes
//!
//! Field names are the document schema read by the storefront, so they keep the
//! source column names. Date-times serialize as BSON dates, not strings.

use bson::Document;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;

// ============================================================================
// Products
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDocument {
    /// Product code
    #[serde(rename = "_id")]
    pub id: String,
    pub prod_name: String,
    /// Whole currency units; the decimal fraction is truncated
    pub price: i64,
    pub prod_type: Option<String>,
    pub material: Option<String>,
    pub prod_img: Option<String>,
    pub detail: ProductDetail,
}

/// Rarely read long-form text, kept out of the top-level fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetail {
    /// Never null: an absent description is stored as ""
    pub prod_intro: String,
}

// ============================================================================
// Customers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerDocument {
    /// Email address
    #[serde(rename = "_id")]
    pub id: String,
    pub passwd: String,
    pub cust_name: String,
    pub m_phone: Option<String>,
    pub agreements: Agreements,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    /// Ordered and unordered cart items, ascending by `cart_seq_no`
    pub cart: Vec<CartItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Agreements {
    pub terms: Option<String>,
    pub privacy: Option<String>,
    pub marketing: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    pub cart_seq_no: i64,
    pub prod_cd: String,
    pub prod_size: Option<String>,
    pub ord_qty: i32,
    pub ord_yn: String,
    /// Migration time; the source does not keep when the item was added
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub added_date: DateTime<Utc>,
}

// ============================================================================
// Orders
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDocument {
    pub ord_no: i64,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub ord_date: DateTime<Utc>,
    pub ord_amount: i64,
    pub cust_id: String,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub ord_item_no: i64,
    pub prod_cd: String,
    /// Copied from the product at migration time
    pub prod_name: String,
    pub prod_size: Option<String>,
    pub unit_price: i64,
    pub ord_qty: i32,
    /// Cart line the order was placed from
    pub cart_seq_no: Option<i64>,
    pub review_written: bool,
}

// ============================================================================
// Reviews
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewDocument {
    pub prod_cd: String,
    pub cust_id: String,
    /// Full name; masking is a presentation concern
    pub cust_name: String,
    pub ord_no: i64,
    pub ord_item_no: i64,
    pub eval_score: i32,
    pub eval_comment: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub eval_date: DateTime<Utc>,
}

/// Encode a batch of typed documents for the store
pub fn encode_all<T: Serialize>(documents: &[T]) -> Result<Vec<Document>> {
    documents
        .iter()
        .map(|doc| bson::to_document(doc).map_err(Into::into))
        .collect()
}
