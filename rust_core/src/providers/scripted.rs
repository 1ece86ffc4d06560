//! Scripted feed for offline replay and tests.
//!
//! Plays back a fixed sequence of snapshots. Once the script runs out the
//! last snapshot keeps being served, so a replay settles instead of flapping
//! to empty.

use super::FeedSource;
use crate::error::FetchError;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One scripted fetch result
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Events(Vec<Value>),
    /// Simulates the feed being down (HTTP 503)
    Unreachable,
}

pub struct ScriptedFeed {
    script: Mutex<VecDeque<ScriptedResponse>>,
    last: Mutex<Option<Vec<Value>>>,
    fetches: AtomicUsize,
}

impl ScriptedFeed {
    pub fn new(script: impl IntoIterator<Item = ScriptedResponse>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            last: Mutex::new(None),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Convenience for a script made only of successful snapshots
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = Vec<Value>>) -> Self {
        Self::new(snapshots.into_iter().map(ScriptedResponse::Events))
    }

    /// Append another response to the end of the script
    pub fn push(&self, response: ScriptedResponse) {
        self.script.lock().push_back(response);
    }

    /// Number of fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for ScriptedFeed {
    async fn fetch_events(&self) -> Result<Vec<Value>, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let next = self.script.lock().pop_front();
        match next {
            Some(ScriptedResponse::Events(events)) => {
                *self.last.lock() = Some(events.clone());
                Ok(events)
            }
            Some(ScriptedResponse::Unreachable) => Err(FetchError::Status(503)),
            None => Ok(self.last.lock().clone().unwrap_or_default()),
        }
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_plays_script_in_order_then_repeats_last() {
        let feed = ScriptedFeed::new(vec![
            ScriptedResponse::Events(vec![json!({"id": "1"})]),
            ScriptedResponse::Unreachable,
            ScriptedResponse::Events(vec![json!({"id": "2"})]),
        ]);

        assert_eq!(feed.fetch_events().await.unwrap()[0]["id"], "1");
        assert!(feed.fetch_events().await.is_err());
        assert_eq!(feed.fetch_events().await.unwrap()[0]["id"], "2");
        assert_eq!(feed.fetch_events().await.unwrap()[0]["id"], "2");
        assert_eq!(feed.fetch_count(), 4);
    }

    #[tokio::test]
    async fn test_push_extends_exhausted_script() {
        let feed = ScriptedFeed::from_snapshots(vec![vec![json!({"id": "1"})]]);
        assert_eq!(feed.fetch_events().await.unwrap()[0]["id"], "1");

        feed.push(ScriptedResponse::Unreachable);
        feed.push(ScriptedResponse::Events(Vec::new()));
        assert!(feed.fetch_events().await.is_err());
        assert!(feed.fetch_events().await.unwrap().is_empty());
        // The pushed empty snapshot is now the one repeated
        assert!(feed.fetch_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_script_yields_no_events() {
        let feed = ScriptedFeed::new(Vec::new());
        assert!(feed.fetch_events().await.unwrap().is_empty());
    }
}
