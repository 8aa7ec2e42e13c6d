//! Catalog source trait and mock implementation.
//!
//! This module defines the abstraction layer over whatever actually holds
//! the catalog (a document database in production) and provides a mock
//! implementation for deterministic tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use kiosk_types::{Category, Item, ItemId};

use crate::error::{Error, Result};

/// Full catalog contents as returned by one source fetch.
#[derive(Debug, Clone, Default)]
pub struct CatalogData {
    /// Categories in display order.
    pub categories: Vec<Category>,

    /// Every known item, keyed by id.
    pub items: HashMap<ItemId, Item>,
}

/// Trait for catalog backends.
///
/// A source returns the complete catalog in one call; the cache never asks
/// for partial data. Calls may fail or hang; the cache bounds every call
/// with a timeout and decides what staleness to tolerate.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the complete catalog.
    async fn fetch(&self) -> Result<CatalogData>;

    /// Name of this source, for logs.
    fn name(&self) -> &str;
}

/// A source that can be shared across tasks.
pub type SharedSource = Arc<dyn CatalogSource>;

/// An in-memory catalog source for testing.
///
/// Serves a fixed [`CatalogData`] that can be swapped at runtime (to drive
/// refresh scenarios), fails a scripted number of leading fetches, and can
/// delay each fetch to exercise timeouts.
#[derive(Debug, Default)]
pub struct MockSource {
    data: std::sync::Mutex<CatalogData>,
    failures: AtomicU32,
    delay: Option<Duration>,
    fetches: AtomicUsize,
}

impl MockSource {
    /// Create a mock source serving the given catalog.
    pub fn new(data: CatalogData) -> Self {
        Self {
            data: std::sync::Mutex::new(data),
            failures: AtomicU32::new(0),
            delay: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Fail the next `n` fetches before serving data.
    pub fn with_failures(self, n: u32) -> Self {
        self.fail_next(n);
        self
    }

    /// Script the next `n` fetches to fail (callable after construction).
    pub fn fail_next(&self, n: u32) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// Sleep this long inside every fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the catalog served by subsequent fetches.
    pub fn set_data(&self, data: CatalogData) {
        *self.data.lock().unwrap() = data;
    }

    /// Number of fetches made against this source.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for MockSource {
    async fn fetch(&self) -> Result<CatalogData> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(Error::Source("mock: scripted failure".to_string()));
        }

        Ok(self.data.lock().unwrap().clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_category() -> CatalogData {
        CatalogData {
            categories: vec![Category {
                id: 1,
                name: "Bouquets".to_string(),
                icon: String::new(),
                parent_id: 0,
                products: vec![],
            }],
            items: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_mock_serves_data() {
        let source = MockSource::new(one_category());

        let data = source.fetch().await.unwrap();
        assert_eq!(data.categories.len(), 1);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_scripted_failures_then_success() {
        let source = MockSource::new(one_category()).with_failures(2);

        assert!(source.fetch().await.is_err());
        assert!(source.fetch().await.is_err());
        assert!(source.fetch().await.is_ok());
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_set_data_swaps_contents() {
        let source = MockSource::new(one_category());
        source.set_data(CatalogData::default());

        let data = source.fetch().await.unwrap();
        assert!(data.categories.is_empty());
    }
}
