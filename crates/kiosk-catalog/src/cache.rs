//! Background-refreshed snapshot cache.
//!
//! The cache owns the current [`Snapshot`] behind an `Arc` and swaps it
//! wholesale: readers take the read lock only long enough to clone the
//! `Arc`, then query the immutable snapshot with no lock held. The refresh
//! task builds each replacement entirely off to the side and takes the
//! write lock only for the pointer swap, so a slow catalog source never
//! stalls readers: at worst they keep serving the previous generation.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::time::{MissedTickBehavior, interval, sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use kiosk_types::{Category, Item};

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::snapshot::Snapshot;
use crate::source::SharedSource;

/// Inner state protected by RwLock.
struct CacheInner {
    /// Currently visible snapshot.
    snapshot: Arc<Snapshot>,

    /// Bumped on every successful swap.
    generation: u64,
}

/// Read-mostly catalog cache with a background refresh task.
///
/// Cloning is cheap; clones share the same snapshot and refresh task.
pub struct SnapshotCache {
    inner: Arc<RwLock<CacheInner>>,
    source: SharedSource,
    config: CacheConfig,
}

impl SnapshotCache {
    /// Build the initial snapshot and start the background refresh task.
    ///
    /// The source is tried up to `config.init_attempts` times with
    /// `config.init_backoff` between attempts; every fetch is bounded by
    /// `config.fetch_timeout`. If all attempts fail, returns
    /// [`Error::Init`] wrapping the last failure; without an initial
    /// snapshot there is nothing to serve.
    ///
    /// The refresh task rebuilds every `config.refresh_interval` and exits
    /// when `cancel` fires; cancellation is also observed during the
    /// backoff sleeps here.
    pub async fn new(
        source: SharedSource,
        config: CacheConfig,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let attempts = config.init_attempts.max(1);
        let mut snapshot = None;

        for attempt in 1..=attempts {
            match build_snapshot(&source, &config).await {
                Ok(snap) => {
                    snapshot = Some(snap);
                    break;
                }
                Err(e) if attempt < attempts => {
                    warn!(
                        source = source.name(),
                        attempt,
                        attempts,
                        error = %e,
                        "initial catalog build failed, retrying"
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            return Err(Error::Init {
                                attempts: attempt,
                                source: Box::new(e),
                            });
                        }
                        _ = sleep(config.init_backoff) => {}
                    }
                }
                Err(e) => {
                    return Err(Error::Init {
                        attempts,
                        source: Box::new(e),
                    });
                }
            }
        }

        // The loop either broke with a snapshot or returned an error.
        let snapshot =
            snapshot.ok_or_else(|| Error::Source("no snapshot built".to_string()))?;

        info!(
            source = source.name(),
            categories = snapshot.category_count(),
            items = snapshot.item_count(),
            "catalog cache ready"
        );

        let cache = Self {
            inner: Arc::new(RwLock::new(CacheInner {
                snapshot: Arc::new(snapshot),
                generation: 0,
            })),
            source,
            config,
        };

        cache.spawn_refresh_loop(cancel);

        Ok(cache)
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Capture the currently visible snapshot.
    ///
    /// The read lock is held only for the `Arc` clone; every query made
    /// through the returned snapshot sees one internally consistent
    /// generation, regardless of concurrent swaps.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.inner.read().await.snapshot)
    }

    /// Generation counter of the visible snapshot (0 = initial build).
    pub async fn generation(&self) -> u64 {
        self.inner.read().await.generation
    }

    /// Rebuild the snapshot from the source and swap it in.
    ///
    /// Used by the background loop on every tick; exposed for callers that
    /// want an immediate refresh. On failure the previous snapshot stays
    /// visible.
    pub async fn refresh(&self) -> Result<()> {
        let snapshot = build_snapshot(&self.source, &self.config).await?;

        let mut inner = self.inner.write().await;
        inner.snapshot = Arc::new(snapshot);
        inner.generation += 1;

        debug!(
            generation = inner.generation,
            categories = inner.snapshot.category_count(),
            items = inner.snapshot.item_count(),
            "catalog snapshot swapped"
        );

        Ok(())
    }

    /// One 0-indexed page of categories from the current snapshot.
    ///
    /// A page past the end is empty, never an error.
    pub async fn get_categories_page(&self, page: usize, size: usize) -> Vec<Category> {
        self.snapshot().await.categories_page(page, size).to_vec()
    }

    /// One 0-indexed page of a category's items from the current snapshot.
    ///
    /// Fails with [`Error::CategoryNotFound`] for an unknown category name;
    /// dangling product ids within the page are skipped, not errors.
    pub async fn get_items_page(
        &self,
        category_name: &str,
        page: usize,
        size: usize,
    ) -> Result<Vec<Item>> {
        let snapshot = self.snapshot().await;

        let category = snapshot
            .category_by_name(category_name)
            .ok_or_else(|| Error::CategoryNotFound(category_name.to_string()))?;

        Ok(snapshot.items_page(category, page, size))
    }

    /// Exact-name item lookup in the current snapshot.
    pub async fn get_item(&self, item_name: &str) -> Result<Item> {
        self.snapshot()
            .await
            .item_by_name(item_name)
            .cloned()
            .ok_or_else(|| Error::ItemNotFound(item_name.to_string()))
    }

    fn spawn_refresh_loop(&self, cancel: CancellationToken) {
        let cache = self.clone();

        tokio::spawn(async move {
            let mut ticker = interval(cache.config.refresh_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // An interval yields immediately; consume the startup tick so
            // the first rebuild happens one full interval after construction.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("catalog refresh loop stopped");
                        return;
                    }
                    _ = ticker.tick() => {}
                }

                if let Err(e) = cache.refresh().await {
                    warn!(
                        source = cache.source.name(),
                        error = %e,
                        "catalog refresh failed, keeping previous snapshot"
                    );
                }
            }
        });
    }
}

impl Clone for SnapshotCache {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            source: Arc::clone(&self.source),
            config: self.config.clone(),
        }
    }
}

/// Fetch the catalog under the configured deadline and index it.
async fn build_snapshot(source: &SharedSource, config: &CacheConfig) -> Result<Snapshot> {
    let data = timeout(config.fetch_timeout, source.fetch())
        .await
        .map_err(|_| Error::Timeout(config.fetch_timeout))??;

    Ok(Snapshot::build(data))
}
