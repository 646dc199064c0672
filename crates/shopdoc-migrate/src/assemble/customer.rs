//! Customers with their cart embedded

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::warn;

use crate::documents::{Agreements, CartItem, CustomerDocument};
use crate::rows::{CartItemRow, CustomerRow};

use super::group_by;

/// One document per customer. Cart rows for unknown customers are dropped with a warning.
pub fn assemble_customers(
    customers: Vec<CustomerRow>,
    cart_items: Vec<CartItemRow>,
    migrated_at: DateTime<Utc>,
) -> Vec<CustomerDocument> {
    let known: HashSet<&str> = customers.iter().map(|c| c.cust_id.as_str()).collect();
    let orphans: Vec<&CartItemRow> = cart_items
        .iter()
        .filter(|item| !known.contains(item.cust_id.as_str()))
        .collect();
    if !orphans.is_empty() {
        warn!(
            rows = orphans.len(),
            first_customer = %orphans[0].cust_id,
            "Cart rows reference customers that do not exist; dropping them"
        );
    }

    let mut carts = group_by(cart_items, |item| item.cust_id.clone());

    customers
        .into_iter()
        .map(|customer| {
            let mut rows = carts.remove(&customer.cust_id).unwrap_or_default();
            rows.sort_by_key(|item| item.cart_seq_no);

            let cart = rows
                .into_iter()
                .map(|item| CartItem {
                    cart_seq_no: item.cart_seq_no,
                    prod_cd: item.prod_cd,
                    prod_size: item.prod_size,
                    ord_qty: item.ord_qty,
                    ord_yn: item.ord_yn,
                    added_date: migrated_at,
                })
                .collect();

            CustomerDocument {
                id: customer.cust_id,
                passwd: customer.passwd,
                cust_name: customer.cust_name,
                m_phone: customer.m_phone,
                agreements: Agreements {
                    terms: customer.agree_terms,
                    privacy: customer.agree_privacy,
                    marketing: customer.agree_marketing,
                },
                created_at: migrated_at,
                cart,
            }
        })
        .collect()
}
