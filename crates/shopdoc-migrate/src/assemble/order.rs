//! Orders with their lines embedded and enriched

use tracing::debug;

use crate::documents::{OrderDocument, OrderItem};
use crate::error::Result;
use crate::rows::{OrderLineRow, OrderRow};

use super::{group_by, to_whole_units, ReviewIndex};

/// One document per order. `lines` are the order lines that joined to a product.
pub fn assemble_orders(
    orders: Vec<OrderRow>,
    lines: Vec<OrderLineRow>,
    reviews: &ReviewIndex,
) -> Result<Vec<OrderDocument>> {
    let mut lines_by_order = group_by(lines, |line| line.ord_no);

    let documents = orders
        .into_iter()
        .map(|order| {
            let record = format!("order {}", order.ord_no);
            let ord_amount = match &order.ord_amount {
                Some(amount) => to_whole_units(amount, &record, "ord_amount")?,
                None => 0,
            };

            let mut rows = lines_by_order.remove(&order.ord_no).unwrap_or_default();
            rows.sort_by_key(|line| line.ord_item_no);

            let items = rows
                .into_iter()
                .map(|line| {
                    let unit_price = to_whole_units(
                        &line.price,
                        &format!("order line {}", line.ord_item_no),
                        "unit_price",
                    )?;
                    Ok(OrderItem {
                        review_written: reviews.is_reviewed(line.ord_item_no),
                        ord_item_no: line.ord_item_no,
                        prod_cd: line.prod_cd,
                        prod_name: line.prod_name,
                        prod_size: line.prod_size,
                        unit_price,
                        ord_qty: line.ord_qty,
                        cart_seq_no: line.cart_seq_no,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(OrderDocument {
                ord_no: order.ord_no,
                ord_date: order.ord_date.to_utc(),
                ord_amount,
                cust_id: order.cust_id,
                items,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if !lines_by_order.is_empty() {
        let stray: usize = lines_by_order.values().map(Vec::len).sum();
        debug!(lines = stray, "Order lines without a matching order were not embedded");
    }

    Ok(documents)
}
