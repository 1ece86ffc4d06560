//! Display rotation among concurrent live games

use super::has_elapsed;
use crate::tracking::LiveGameRegistry;
use chrono::{DateTime, Utc};
use log::info;
use std::time::Duration;

/// Default time each game stays on screen
pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_secs(20);

#[derive(Debug)]
pub struct RotationScheduler {
    display_duration: Duration,
    last_switch: Option<DateTime<Utc>>,
}

impl Default for RotationScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_DURATION)
    }
}

impl RotationScheduler {
    pub fn new(display_duration: Duration) -> Self {
        Self {
            display_duration,
            last_switch: None,
        }
    }

    pub fn last_switch(&self) -> Option<DateTime<Utc>> {
        self.last_switch
    }

    /// Restart the display timer, e.g. after reconciliation moved the pointer.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.last_switch = Some(now);
    }

    /// Advance to the next game if it's time. Returns the new current index.
    ///
    /// Never rotates in test mode or with fewer than two games.
    pub fn tick(
        &mut self,
        registry: &mut LiveGameRegistry,
        now: DateTime<Utc>,
        test_mode: bool,
    ) -> Option<usize> {
        if test_mode || registry.len() <= 1 {
            return None;
        }
        if !has_elapsed(self.last_switch, now, self.display_duration) {
            return None;
        }

        let game = registry.advance()?;
        info!("Switched live view to: {}", game.matchup());
        self.last_switch = Some(now);
        registry.current_index()
    }
}
