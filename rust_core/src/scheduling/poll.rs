//! Adaptive poll cadence and log throttling
//!
//! Polls quickly while something is live (or in test mode) and backs off to
//! the idle interval when nothing is being tracked. The idle interval is also
//! the only retry policy after a failed fetch.

use super::has_elapsed;
use chrono::{DateTime, Utc};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PollSchedulerConfig {
    /// Poll interval while games are live or in test mode
    pub live_interval: Duration,
    /// Poll interval while nothing is tracked
    pub idle_interval: Duration,
    /// Maximum silence between live-game summaries
    pub log_interval: Duration,
}

impl Default for PollSchedulerConfig {
    fn default() -> Self {
        Self {
            live_interval: Duration::from_secs(15),
            idle_interval: Duration::from_secs(300),
            log_interval: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Default)]
pub struct PollScheduler {
    config: PollSchedulerConfig,
    last_update: Option<DateTime<Utc>>,
    last_log: Option<DateTime<Utc>>,
}

impl PollScheduler {
    pub fn new(config: PollSchedulerConfig) -> Self {
        Self {
            config,
            last_update: None,
            last_log: None,
        }
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn last_log(&self) -> Option<DateTime<Utc>> {
        self.last_log
    }

    /// Interval that applies given the current live set
    pub fn interval(&self, live_set_empty: bool, test_mode: bool) -> Duration {
        if live_set_empty && !test_mode {
            self.config.idle_interval
        } else {
            self.config.live_interval
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>, live_set_empty: bool, test_mode: bool) -> bool {
        has_elapsed(
            self.last_update,
            now,
            self.interval(live_set_empty, test_mode),
        )
    }

    pub fn record_poll(&mut self, now: DateTime<Utc>) {
        self.last_update = Some(now);
    }

    /// Whether the live-game summary should be logged this poll.
    ///
    /// `previous` is the tracked order before reconciliation, `candidates` the
    /// filtered ids just fetched.
    pub fn should_log(&self, now: DateTime<Utc>, previous: &[&str], candidates: &[&str]) -> bool {
        has_elapsed(self.last_log, now, self.config.log_interval)
            || previous.len() != candidates.len()
            || previous.iter().zip(candidates).any(|(a, b)| a != b)
            || (previous.is_empty() && !candidates.is_empty())
    }

    pub fn record_log(&mut self, now: DateTime<Utc>) {
        self.last_log = Some(now);
    }
}
