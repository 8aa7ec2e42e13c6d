//! Catalog types: categories and the items they contain.
//!
//! These mirror the documents served by the upstream catalog database.
//! Serde field names follow the upstream document schema (`category_id`,
//! `product_id`), so a fetched document deserializes directly.

use serde::{Deserialize, Serialize};

/// Identifier of a catalog category.
pub type CategoryId = i64;

/// Identifier of a catalog item.
pub type ItemId = i64;

/// A menu category.
///
/// `products` holds item ids in display order; the order is part of the
/// category, not an artifact of indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "category_id")]
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
    #[serde(rename = "parent_id")]
    pub parent_id: CategoryId,
    pub products: Vec<ItemId>,
}

/// A single catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "product_id")]
    pub id: ItemId,
    pub name: String,
    pub image: String,
    pub price: f64,
    pub composition: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_deserializes_upstream_field_names() {
        let item: Item = serde_json::from_value(serde_json::json!({
            "product_id": 42,
            "name": "Peony bouquet",
            "image": "https://cdn.example/peony.jpg",
            "price": 49.90,
            "composition": "9 peonies, eucalyptus",
            "description": "Seasonal."
        }))
        .unwrap();

        assert_eq!(item.id, 42);
        assert_eq!(item.name, "Peony bouquet");
    }

    #[test]
    fn test_category_product_order_preserved() {
        let cat: Category = serde_json::from_value(serde_json::json!({
            "category_id": 1,
            "name": "Bouquets",
            "icon": "bouquet.png",
            "parent_id": 0,
            "products": [5, 3, 9]
        }))
        .unwrap();

        assert_eq!(cat.products, vec![5, 3, 9]);
    }
}
