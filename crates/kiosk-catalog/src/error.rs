//! Error types for catalog cache operations.

use std::time::Duration;

/// Error type for catalog cache operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Initial snapshot build failed on every allowed attempt. Fatal to the
    /// owning process: there is no catalog data to serve at all.
    #[error("initial catalog build failed after {attempts} attempts: {source}")]
    Init {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    /// The catalog source reported a failure.
    #[error("catalog source error: {0}")]
    Source(String),

    /// A bounded catalog fetch outran its deadline.
    #[error("catalog fetch timed out after {0:?}")]
    Timeout(Duration),

    /// No category with this name in the current snapshot.
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    /// No item with this name in the current snapshot.
    #[error("item not found: {0}")]
    ItemNotFound(String),
}

/// Result type for catalog cache operations.
pub type Result<T> = std::result::Result<T, Error>;
