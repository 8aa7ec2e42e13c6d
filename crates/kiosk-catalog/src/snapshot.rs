//! Immutable, fully-indexed point-in-time view of the catalog.

use std::collections::HashMap;

use tracing::error;

use kiosk_types::{Category, Item, ItemId};

use crate::source::CatalogData;

/// One generation of catalog data.
///
/// All four views are built together from a single source fetch and never
/// mutated afterwards; the cache replaces whole snapshots behind an `Arc`.
/// Category order is the source fetch order and is stable within one
/// snapshot (not across snapshots).
#[derive(Debug)]
pub struct Snapshot {
    categories: Vec<Category>,
    categories_by_name: HashMap<String, usize>,
    items: HashMap<ItemId, Item>,
    items_by_name: HashMap<String, Item>,
}

impl Snapshot {
    /// Build a snapshot, indexing categories by name and items by id and name.
    pub fn build(data: CatalogData) -> Self {
        let CatalogData { categories, items } = data;

        let categories_by_name = categories
            .iter()
            .enumerate()
            .map(|(i, cat)| (cat.name.clone(), i))
            .collect();

        let items_by_name = items
            .values()
            .map(|item| (item.name.clone(), item.clone()))
            .collect();

        Self {
            categories,
            categories_by_name,
            items,
            items_by_name,
        }
    }

    /// Total number of categories.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Total number of items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// One 0-indexed page of the category sequence.
    ///
    /// Bounds are clamped to the sequence; a page past the end (or a zero
    /// page size) is empty, never an error.
    pub fn categories_page(&self, page: usize, size: usize) -> &[Category] {
        match page_bounds(self.categories.len(), page, size) {
            Some((from, to)) => &self.categories[from..to],
            None => &[],
        }
    }

    /// Look up a category by its display name.
    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories_by_name
            .get(name)
            .map(|&i| &self.categories[i])
    }

    /// Look up an item by id.
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Look up an item by its display name.
    pub fn item_by_name(&self, name: &str) -> Option<&Item> {
        self.items_by_name.get(name)
    }

    /// One 0-indexed page of a category's items, in product order.
    ///
    /// A product id with no matching item is a data-quality problem in the
    /// source collection: it is logged and skipped, the rest of the page is
    /// still served.
    pub fn items_page(&self, category: &Category, page: usize, size: usize) -> Vec<Item> {
        let Some((from, to)) = page_bounds(category.products.len(), page, size) else {
            return Vec::new();
        };

        let mut items = Vec::with_capacity(to - from);
        for &product_id in &category.products[from..to] {
            match self.items.get(&product_id) {
                Some(item) => items.push(item.clone()),
                None => {
                    error!(
                        product_id,
                        category_id = category.id,
                        "product referenced by category is missing from items"
                    );
                }
            }
        }

        items
    }
}

/// Clamped `[from, to)` bounds for one page of a sequence of `len` elements.
///
/// Returns `None` when the page lies entirely past the end, the page size is
/// zero, or the offset arithmetic would overflow.
fn page_bounds(len: usize, page: usize, size: usize) -> Option<(usize, usize)> {
    if size == 0 {
        return None;
    }

    let from = page.checked_mul(size)?;
    if from >= len {
        return None;
    }

    Some((from, (from + size).min(len)))
}
