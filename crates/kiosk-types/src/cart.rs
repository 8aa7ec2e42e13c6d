//! Cart line items.

use serde::{Deserialize, Serialize};

use crate::catalog::Item;

/// Largest quantity a single cart line may carry.
pub const MAX_QUANTITY: u32 = 100;

/// One line of a shopping cart: an item and how many of it.
///
/// Carts key positions by item id; storing the same item id again replaces
/// the whole position, it never sums quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub item: Item,
    pub quantity: u32,
}

impl Position {
    /// Create a position, clamping the quantity into `1..=MAX_QUANTITY`.
    pub fn new(item: Item, quantity: u32) -> Self {
        Self {
            item,
            quantity: quantity.clamp(1, MAX_QUANTITY),
        }
    }

    /// Line total for this position.
    pub fn total(&self) -> f64 {
        self.item.price * f64::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, price: f64) -> Item {
        Item {
            id,
            name: format!("item-{id}"),
            image: String::new(),
            price,
            composition: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_quantity_clamped_to_range() {
        assert_eq!(Position::new(item(1, 1.0), 0).quantity, 1);
        assert_eq!(Position::new(item(1, 1.0), 7).quantity, 7);
        assert_eq!(Position::new(item(1, 1.0), 500).quantity, MAX_QUANTITY);
    }

    #[test]
    fn test_total() {
        let pos = Position::new(item(3, 12.5), 4);
        assert!((pos.total() - 50.0).abs() < f64::EPSILON);
    }
}
