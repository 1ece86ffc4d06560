//! Scoring alert delivery
//!
//! The tick loop hands alerts to an [`AlertSender`], which never blocks; an
//! [`AlertWorker`] drains the queue on its own task and fans each alert out
//! to the configured [`AlertSink`]s.

use crate::error::AlertError;
use crate::models::ScoringAlert;
use async_trait::async_trait;
use log::info;

pub mod effects;
pub mod queue;

pub use effects::{effect_id, WledEffectSink};
pub use queue::{alert_channel, AlertSender, AlertWorker, DEFAULT_ALERT_QUEUE_CAPACITY};

/// Consumer of scoring alerts (lighting controller, log, ...)
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, alert: &ScoringAlert) -> Result<(), AlertError>;

    fn name(&self) -> &str;
}

/// Writes each delivered alert to the log.
#[derive(Debug, Default, Clone)]
pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn deliver(&self, alert: &ScoringAlert) -> Result<(), AlertError> {
        info!(
            "Delivered {} alert for {} (game {})",
            alert.event, alert.team_abbr, alert.game_id
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
