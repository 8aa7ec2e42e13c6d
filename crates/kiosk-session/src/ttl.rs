//! TTL tracking for session expiration.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Tracks last-touch times for TTL-based expiration.
///
/// A session expires once its idle age reaches the TTL (`age >= ttl`);
/// every store operation that reads or mutates a session counts as a touch.
#[derive(Debug)]
pub struct TtlTracker {
    /// Last touch time for each session.
    touch_times: HashMap<String, Instant>,

    /// Idle age at which a session expires.
    ttl: Duration,
}

impl TtlTracker {
    /// Create a new TTL tracker with the given duration.
    pub fn new(ttl: Duration) -> Self {
        Self {
            touch_times: HashMap::new(),
            ttl,
        }
    }

    /// Record a touch for a session (resets its TTL timer).
    pub fn touch(&mut self, id: &str) {
        self.touch_times.insert(id.to_string(), Instant::now());
    }

    /// Check whether a session has expired.
    pub fn is_expired(&self, id: &str) -> bool {
        match self.touch_times.get(id) {
            None => true, // No touch record = expired
            Some(last_touch) => last_touch.elapsed() >= self.ttl,
        }
    }

    /// Remove tracking for a session.
    pub fn remove(&mut self, id: &str) {
        self.touch_times.remove(id);
    }

    /// Remove all expired entries and return their ids.
    pub fn drain_expired(&mut self) -> Vec<String> {
        let now = Instant::now();
        let expired: Vec<String> = self
            .touch_times
            .iter()
            .filter(|(_, last_touch)| now.duration_since(**last_touch) >= self.ttl)
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            self.touch_times.remove(id);
        }

        expired
    }

    /// Number of tracked sessions.
    pub fn len(&self) -> usize {
        self.touch_times.len()
    }

    /// Check if there are no tracked sessions.
    pub fn is_empty(&self) -> bool {
        self.touch_times.is_empty()
    }

    /// Get the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
