//! Tick-driven schedulers
//!
//! Both schedulers are pure bookkeeping over caller-supplied timestamps; they
//! never sleep or read the wall clock themselves.

use chrono::{DateTime, Utc};
use std::time::Duration;

pub mod poll;
pub mod rotation;

pub use poll::{PollScheduler, PollSchedulerConfig};
pub use rotation::RotationScheduler;

/// True when `interval` has passed since `since`, or `since` never happened.
///
/// A `since` later than `now` means the wall clock stepped backwards; that
/// counts as due so the caller re-stamps instead of waiting for the clock to
/// catch up.
pub(crate) fn has_elapsed(since: Option<DateTime<Utc>>, now: DateTime<Utc>, interval: Duration) -> bool {
    match since {
        None => true,
        Some(t) => match now.signed_duration_since(t).to_std() {
            Ok(elapsed) => elapsed >= interval,
            Err(_) => true,
        },
    }
}
