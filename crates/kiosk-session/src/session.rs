//! Per-conversation session state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use kiosk_types::{ItemId, Position};

/// Mutable state of one conversation: where the user is in a paginated
/// listing and what they have in their cart.
///
/// Callers always receive clones; all changes go through
/// [`SessionStore`](crate::SessionStore) methods, so mutating a returned
/// session never affects stored state.
#[derive(Debug, Clone)]
pub struct Session {
    /// Current 0-indexed pagination cursor.
    pub current_page: usize,

    /// Cart contents, keyed by item id.
    pub cart: HashMap<ItemId, Position>,

    /// When this session was first created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new empty session.
    pub fn new() -> Self {
        Self {
            current_page: 0,
            cart: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Total number of items across all cart lines.
    pub fn item_count(&self) -> u32 {
        self.cart.values().map(|pos| pos.quantity).sum()
    }

    /// Total price of the cart.
    pub fn cart_total(&self) -> f64 {
        self.cart.values().map(Position::total).sum()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_types::Item;

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
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert_eq!(session.current_page, 0);
        assert!(session.cart.is_empty());
        assert_eq!(session.item_count(), 0);
    }

    #[test]
    fn test_cart_totals() {
        let mut session = Session::new();
        session.cart.insert(1, Position::new(item(1, 10.0), 2));
        session.cart.insert(2, Position::new(item(2, 5.0), 3));

        assert_eq!(session.item_count(), 5);
        assert!((session.cart_total() - 35.0).abs() < f64::EPSILON);
    }
}
