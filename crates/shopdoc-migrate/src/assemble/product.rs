use crate::documents::{ProductDetail, ProductDocument};
use crate::error::Result;
use crate::rows::ProductRow;

use super::to_whole_units;

pub fn assemble_products(rows: Vec<ProductRow>) -> Result<Vec<ProductDocument>> {
    rows.into_iter()
        .map(|row| {
            let price = to_whole_units(&row.price, &row.prod_cd, "price")?;
            Ok(ProductDocument {
                id: row.prod_cd,
                prod_name: row.prod_name,
                price,
                prod_type: row.prod_type,
                material: row.material,
                prod_img: row.prod_img,
                detail: ProductDetail {
                    prod_intro: row.prod_intro.unwrap_or_default(),
                },
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn product(code: &str, price: &str, intro: Option<&str>) -> ProductRow {
        ProductRow {
            prod_cd: code.to_string(),
            prod_name: format!("Product {}", code),
            price: BigDecimal::from_str(price).unwrap(),
            prod_type: Some("TOP".to_string()),
            material: Some("cotton".to_string()),
            prod_img: None,
            prod_intro: intro.map(str::to_string),
        }
    }

    #[test]
    fn test_price_is_truncated_not_rounded() {
        let docs = assemble_products(vec![product("P001", "19.99", None)]).unwrap();
        assert_eq!(docs[0].price, 19);
    }

    #[test]
    fn test_null_description_becomes_empty_string() {
        let docs = assemble_products(vec![
            product("P001", "10", None),
            product("P002", "10", Some("Soft and light")),
        ])
        .unwrap();
        assert_eq!(docs[0].detail.prod_intro, "");
        assert_eq!(docs[1].detail.prod_intro, "Soft and light");
    }

    #[test]
    fn test_one_document_per_row() {
        let docs = assemble_products(vec![
            product("P001", "1", None),
            product("P002", "2", None),
            product("P003", "3", None),
        ])
        .unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["P001", "P002", "P003"]);
        assert_eq!(docs[2].prod_type.as_deref(), Some("TOP"));
    }

    #[test]
    fn test_empty_input() {
        assert!(assemble_products(vec![]).unwrap().is_empty());
    }
}
