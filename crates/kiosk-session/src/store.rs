//! Concurrent session store with a background reaper.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use kiosk_types::{ItemId, Position};

use crate::config::StoreConfig;
use crate::session::Session;
use crate::ttl::TtlTracker;

/// Inner state protected by RwLock.
struct StoreInner {
    /// Live sessions, keyed by conversation id.
    sessions: HashMap<String, Session>,

    /// TTL tracker for expiration.
    ttl: TtlTracker,
}

impl StoreInner {
    /// Fetch the session for `id`, creating and storing an empty one if
    /// absent. One critical section, so two concurrent first-touches of the
    /// same id cannot both create.
    fn session_mut(&mut self, id: &str) -> &mut Session {
        self.ttl.touch(id);
        self.sessions.entry(id.to_string()).or_insert_with(|| {
            debug!(conversation_id = %id, "creating new session");
            Session::new()
        })
    }
}

/// Store of all live conversation sessions.
///
/// Operations never fail: absence degrades to empty/default values, and
/// losing a stale session is an intended outcome. The background reaper
/// removes sessions idle longer than the configured TTL.
///
/// Cloning is cheap; clones share the same session map and reaper task.
pub struct SessionStore {
    inner: Arc<RwLock<StoreInner>>,
    config: StoreConfig,
}

impl SessionStore {
    /// Create an empty store and start the background reaper.
    ///
    /// The reaper runs every `config.reap_interval` and exits promptly when
    /// `cancel` fires, including during its first wait.
    pub fn new(config: StoreConfig, cancel: CancellationToken) -> Self {
        let store = Self {
            inner: Arc::new(RwLock::new(StoreInner {
                sessions: HashMap::new(),
                ttl: TtlTracker::new(config.ttl),
            })),
            config,
        };

        store.spawn_reaper(cancel);

        store
    }

    /// Get the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Current number of live sessions.
    pub async fn len(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    /// Check if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.sessions.is_empty()
    }

    /// Return a copy of the session for `id`, creating an empty one if none
    /// exists. Never fails.
    pub async fn get_session(&self, id: &str) -> Session {
        let mut inner = self.inner.write().await;
        let session = inner.session_mut(id).clone();
        trace!(
            conversation_id = %id,
            current_page = session.current_page,
            cart_lines = session.cart.len(),
            "returning session copy"
        );
        session
    }

    /// Set the pagination cursor, creating the session if absent.
    pub async fn set_page(&self, id: &str, page: usize) {
        let mut inner = self.inner.write().await;
        inner.session_mut(id).current_page = page;
    }

    /// Advance the pagination cursor by one, creating the session if absent.
    pub async fn next_page(&self, id: &str) {
        let mut inner = self.inner.write().await;
        inner.session_mut(id).current_page += 1;
    }

    /// Reset the pagination cursor to zero. No-op if the session is absent.
    pub async fn reset_page(&self, id: &str) {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        if let Some(session) = inner.sessions.get_mut(id) {
            session.current_page = 0;
            inner.ttl.touch(id);
        }
    }

    /// Upsert a position into the session's cart, keyed by item id.
    ///
    /// A position for an id already in the cart is replaced outright; the
    /// new quantity wins, quantities are never summed. Creates the session
    /// if absent.
    pub async fn add_position(&self, id: &str, position: Position) {
        let mut inner = self.inner.write().await;
        let session = inner.session_mut(id);
        debug!(
            conversation_id = %id,
            item_id = position.item.id,
            quantity = position.quantity,
            "adding position to cart"
        );
        session.cart.insert(position.item.id, position);
    }

    /// Remove one cart line. No-op if the session or line is absent.
    pub async fn remove_position(&self, id: &str, item_id: ItemId) {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        if let Some(session) = inner.sessions.get_mut(id) {
            session.cart.remove(&item_id);
            inner.ttl.touch(id);
        }
    }

    /// Empty the session's cart. No-op if the session is absent.
    pub async fn clear_cart(&self, id: &str) {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        if let Some(session) = inner.sessions.get_mut(id) {
            session.cart.clear();
            inner.ttl.touch(id);
        }
    }

    /// Remove every session idle at least as long as the TTL.
    ///
    /// Called by the background reaper on every tick; exposed for callers
    /// that want an immediate pass. Returns the number of sessions removed.
    pub async fn reap_expired(&self) -> usize {
        let mut inner = self.inner.write().await;
        let expired = inner.ttl.drain_expired();
        let count = expired.len();

        for id in expired {
            inner.sessions.remove(&id);
            debug!(conversation_id = %id, "reaped expired session");
        }

        if count > 0 {
            debug!(count, remaining = inner.sessions.len(), "reap pass done");
        }

        count
    }

    fn spawn_reaper(&self, cancel: CancellationToken) {
        let store = self.clone();

        tokio::spawn(async move {
            let mut ticker = interval(store.config.reap_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // An interval yields immediately; consume the startup tick so
            // the first pass happens one full interval after construction.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("session reaper stopped");
                        return;
                    }
                    _ = ticker.tick() => {}
                }

                store.reap_expired().await;
            }
        });
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_types::Item;
    use std::time::Duration;
    use tokio::time::sleep;

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

    fn store() -> SessionStore {
        // Long TTL and reap interval keep background behavior out of the way.
        SessionStore::new(StoreConfig::default(), CancellationToken::new())
    }

    #[tokio::test]
    async fn test_get_session_creates_lazily() {
        let store = store();
        assert_eq!(store.config().ttl, crate::config::DEFAULT_TTL);
        assert!(store.is_empty().await);

        let session = store.get_session("conv-1").await;
        assert_eq!(session.current_page, 0);
        assert!(session.cart.is_empty());

        // The empty session was stored, not just returned.
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_page_cursor_operations() {
        let store = store();

        store.next_page("conv-1").await;
        store.next_page("conv-1").await;
        store.next_page("conv-1").await;
        assert_eq!(store.get_session("conv-1").await.current_page, 3);

        store.set_page("conv-1", 7).await;
        assert_eq!(store.get_session("conv-1").await.current_page, 7);

        store.reset_page("conv-1").await;
        assert_eq!(store.get_session("conv-1").await.current_page, 0);

        // Only one session was ever created for the id.
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_reset_page_missing_session_is_noop() {
        let store = store();
        store.reset_page("ghost").await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_add_position_overwrites_quantity() {
        let store = store();

        store
            .add_position("conv-1", Position::new(item(5, 10.0), 2))
            .await;
        store
            .add_position("conv-1", Position::new(item(5, 10.0), 5))
            .await;

        let session = store.get_session("conv-1").await;
        assert_eq!(session.cart.len(), 1);
        assert_eq!(session.cart[&5].quantity, 5);
    }

    #[tokio::test]
    async fn test_remove_position_and_clear_cart() {
        let store = store();

        store
            .add_position("conv-1", Position::new(item(1, 1.0), 1))
            .await;
        store
            .add_position("conv-1", Position::new(item(2, 2.0), 1))
            .await;

        store.remove_position("conv-1", 1).await;
        assert_eq!(store.get_session("conv-1").await.cart.len(), 1);

        store.clear_cart("conv-1").await;
        assert!(store.get_session("conv-1").await.cart.is_empty());

        // Missing-session variants are no-ops and create nothing.
        store.remove_position("ghost", 1).await;
        store.clear_cart("ghost").await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_returned_session_is_detached_copy() {
        let store = store();

        store
            .add_position("conv-1", Position::new(item(1, 1.0), 1))
            .await;

        let mut copy = store.get_session("conv-1").await;
        copy.current_page = 99;
        copy.cart.clear();

        let stored = store.get_session("conv-1").await;
        assert_eq!(stored.current_page, 0);
        assert_eq!(stored.cart.len(), 1);
    }

    #[tokio::test]
    async fn test_independent_conversations() {
        let store = store();

        store.set_page("conv-1", 3).await;
        store.set_page("conv-2", 8).await;
        store
            .add_position("conv-2", Position::new(item(1, 1.0), 1))
            .await;

        assert_eq!(store.get_session("conv-1").await.current_page, 3);
        assert!(store.get_session("conv-1").await.cart.is_empty());
        assert_eq!(store.get_session("conv-2").await.current_page, 8);
    }

    #[tokio::test]
    async fn test_reap_removes_idle_sessions() {
        let config = StoreConfig::new()
            .with_ttl(Duration::from_millis(20))
            .with_reap_interval(Duration::from_secs(3600));
        let store = SessionStore::new(config, CancellationToken::new());

        store.set_page("conv-1", 1).await;
        sleep(Duration::from_millis(40)).await;

        assert_eq!(store.reap_expired().await, 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_touched_session_survives_reap() {
        let config = StoreConfig::new()
            .with_ttl(Duration::from_millis(60))
            .with_reap_interval(Duration::from_secs(3600));
        let store = SessionStore::new(config, CancellationToken::new());

        store.set_page("conv-1", 1).await;
        sleep(Duration::from_millis(40)).await;

        // Any store operation counts as a touch.
        let _ = store.get_session("conv-1").await;
        sleep(Duration::from_millis(40)).await;

        assert_eq!(store.reap_expired().await, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_background_reaper_runs() {
        let config = StoreConfig::new()
            .with_ttl(Duration::from_millis(10))
            .with_reap_interval(Duration::from_millis(10));
        let store = SessionStore::new(config, CancellationToken::new());

        store.set_page("conv-1", 1).await;
        sleep(Duration::from_millis(80)).await;

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_cancellation_stops_reaper() {
        let config = StoreConfig::new()
            .with_ttl(Duration::from_millis(10))
            .with_reap_interval(Duration::from_millis(10));
        let cancel = CancellationToken::new();
        let store = SessionStore::new(config, cancel.clone());

        cancel.cancel();
        store.set_page("conv-1", 1).await;
        sleep(Duration::from_millis(80)).await;

        // Expired but never reaped: the loop is gone.
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_touch_creates_one_session() {
        let store = store();

        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    let _ = store.get_session("conv-1").await;
                } else {
                    store.next_page("conv-1").await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.len().await, 1);
        // Eight next_page calls all landed on the same session.
        assert_eq!(store.get_session("conv-1").await.current_page, 8);
    }
}
