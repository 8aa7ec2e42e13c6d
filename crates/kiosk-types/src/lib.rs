//! Shared domain types for the Kiosk shop-front core.

pub mod cart;
pub mod catalog;

pub use cart::{MAX_QUANTITY, Position};
pub use catalog::{Category, CategoryId, Item, ItemId};
