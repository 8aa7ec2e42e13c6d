//! Background-refreshed catalog snapshot cache.
//!
//! This crate keeps an immutable, fully-indexed [`Snapshot`] of the catalog
//! in memory and serves paginated reads against it:
//! - The snapshot is rebuilt from a [`CatalogSource`] on a timer and swapped
//!   in atomically; readers never block on the source.
//! - A failed rebuild keeps the previous snapshot visible (stale beats
//!   unavailable).
//! - Every read observes one generation end to end, even while a swap
//!   happens concurrently.
//!
//! # Example
//!
//! ```rust,ignore
//! use kiosk_catalog::{CacheConfig, SnapshotCache};
//! use tokio_util::sync::CancellationToken;
//!
//! let cache = SnapshotCache::new(source, CacheConfig::default(), CancellationToken::new())
//!     .await?;
//! let first_page = cache.get_categories_page(0, 5).await;
//! ```

mod cache;
mod config;
mod error;
mod snapshot;
mod source;

pub use cache::SnapshotCache;
pub use config::CacheConfig;
pub use error::{Error, Result};
pub use snapshot::Snapshot;
pub use source::{CatalogData, CatalogSource, MockSource, SharedSource};
