//! Feed provider abstractions
//!
//! Defines the FeedSource trait that the live manager polls each tick.
//! The transport behind it (HTTP, a recorded replay, a test script) is
//! invisible to reconciliation.

use crate::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;

// Concrete provider implementations
pub mod espn;
pub mod scripted;

pub use espn::EspnFeedProvider;
pub use scripted::ScriptedFeed;

/// Source of raw scoreboard events
///
/// One call returns the full current snapshot. Per-event problems are left
/// for the extractor; only a failure to obtain the snapshot at all is an
/// error here.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch every event currently on the scoreboard
    async fn fetch_events(&self) -> Result<Vec<Value>, FetchError>;

    /// Provider name for logging and debugging
    fn provider_name(&self) -> &str;
}
