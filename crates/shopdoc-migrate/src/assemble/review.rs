use chrono::{DateTime, Utc};
use tracing::warn;

use crate::documents::ReviewDocument;
use crate::rows::ReviewRow;

const SCORE_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

/// One document per joined review row; out-of-range scores are kept and reported
pub fn assemble_reviews(rows: Vec<ReviewRow>, migrated_at: DateTime<Utc>) -> Vec<ReviewDocument> {
    rows.into_iter()
        .map(|row| {
            if !SCORE_RANGE.contains(&row.eval_score) {
                warn!(
                    eval_seq_no = row.eval_seq_no,
                    eval_score = row.eval_score,
                    "Review score outside 1-5"
                );
            }
            ReviewDocument {
                prod_cd: row.prod_cd,
                cust_id: row.cust_id,
                cust_name: row.cust_name,
                ord_no: row.ord_no,
                ord_item_no: row.ord_item_no,
                eval_score: row.eval_score,
                eval_comment: row.eval_comment.unwrap_or_default(),
                eval_date: migrated_at,
            }
        })
        .collect()
}
