//! Configuration for the session store.

use std::time::Duration;

/// Default idle age after which a session is eligible for removal.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Default interval between reaper passes.
pub const DEFAULT_REAP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Configuration for the session store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum idle age before a session is eligible for removal.
    pub ttl: Duration,

    /// Interval between background reaper passes.
    pub reap_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            reap_interval: DEFAULT_REAP_INTERVAL,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the reaper interval.
    pub fn with_reap_interval(mut self, interval: Duration) -> Self {
        self.reap_interval = interval;
        self
    }
}
