//! Configuration for the snapshot cache.

use std::time::Duration;

/// Default interval between background snapshot rebuilds.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Default deadline for one catalog source fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Default number of attempts for the initial snapshot build.
pub const DEFAULT_INIT_ATTEMPTS: u32 = 10;

/// Default pause between initial build attempts.
pub const DEFAULT_INIT_BACKOFF: Duration = Duration::from_secs(5);

/// Configuration for the snapshot cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Interval between background snapshot rebuilds.
    pub refresh_interval: Duration,

    /// Deadline for a single catalog source fetch (initial and periodic).
    pub fetch_timeout: Duration,

    /// How many times the initial build may try the source before the
    /// constructor gives up with [`Error::Init`](crate::Error::Init).
    pub init_attempts: u32,

    /// Pause between initial build attempts.
    pub init_backoff: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            init_attempts: DEFAULT_INIT_ATTEMPTS,
            init_backoff: DEFAULT_INIT_BACKOFF,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the background refresh interval.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Set the per-fetch deadline.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the number of initial build attempts (minimum 1).
    pub fn with_init_attempts(mut self, attempts: u32) -> Self {
        self.init_attempts = attempts.max(1);
        self
    }

    /// Set the pause between initial build attempts.
    pub fn with_init_backoff(mut self, backoff: Duration) -> Self {
        self.init_backoff = backoff;
        self
    }
}
