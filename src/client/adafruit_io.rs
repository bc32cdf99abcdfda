use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed `{0}` is not known to the backend")]
    UnknownFeed(String),

    #[error("connection to the backend is not established")]
    Disconnected,

    #[error("backend rejected the value: {0}")]
    Rejected(String),
}

/// Handle to a single named time-series feed on the dashboard backend.
pub trait Feed: Send + Sync {
    fn key(&self) -> &str;

    /// Push one value to the feed.
    fn save(&self, value: f32) -> Result<(), FeedError>;
}

/// An already-configured dashboard session (Adafruit IO style).
///
/// The session is owned by the caller for the process lifetime; uploaders
/// borrow it and never reconnect, close or otherwise manage it.
pub trait FeedService: Send + Sync {
    /// Resolve a feed handle by key. `None` when the key cannot be bound.
    fn feed(&self, key: &str) -> Option<Arc<dyn Feed>>;

    /// Service the underlying connection (keep-alives, inbound traffic).
    /// Must not block beyond the client's own timeouts.
    fn run(&self);
}
