//! TTL-expiring per-conversation session store.
//!
//! Holds short-lived mutable conversation state (pagination cursor, cart)
//! keyed by conversation id:
//! - Sessions are created lazily on first access and reaped by a background
//!   task once idle longer than the TTL.
//! - Operations never fail; absence degrades to empty/default values.
//! - Callers receive copies, never references into the store.
//!
//! # Example
//!
//! ```rust,ignore
//! use kiosk_session::{SessionStore, StoreConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let store = SessionStore::new(StoreConfig::default(), CancellationToken::new());
//! store.add_position("conv-1", position).await;
//! let session = store.get_session("conv-1").await;
//! ```

mod config;
mod session;
mod store;
mod ttl;

pub use config::StoreConfig;
pub use session::Session;
pub use store::SessionStore;
pub use ttl::TtlTracker;
