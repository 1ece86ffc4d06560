//! Bounded alert queue between the tick loop and the sinks

use super::AlertSink;
use crate::models::ScoringAlert;
use log::{debug, info, warn};
use tokio::sync::mpsc::{self, error::TrySendError};

pub const DEFAULT_ALERT_QUEUE_CAPACITY: usize = 32;

/// Create a connected sender/worker pair.
pub fn alert_channel(capacity: usize) -> (AlertSender, AlertWorker) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        AlertSender { tx },
        AlertWorker {
            rx,
            sinks: Vec::new(),
        },
    )
}

/// Non-blocking handle used by the tick loop.
#[derive(Debug, Clone)]
pub struct AlertSender {
    tx: mpsc::Sender<ScoringAlert>,
}

impl AlertSender {
    /// Queue an alert. A full or closed queue drops it with a warning.
    pub fn enqueue(&self, alert: ScoringAlert) -> bool {
        match self.tx.try_send(alert) {
            Ok(()) => true,
            Err(TrySendError::Full(alert)) => {
                warn!(
                    "Alert queue full, dropping {} alert for {}",
                    alert.event, alert.team_abbr
                );
                false
            }
            Err(TrySendError::Closed(alert)) => {
                warn!(
                    "Alert worker stopped, dropping {} alert for {}",
                    alert.event, alert.team_abbr
                );
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

pub struct AlertWorker {
    rx: mpsc::Receiver<ScoringAlert>,
    sinks: Vec<Box<dyn AlertSink>>,
}

impl AlertWorker {
    pub fn with_sink(mut self, sink: impl AlertSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Deliver alerts until every sender is dropped.
    ///
    /// Sink failures are logged and never stop the worker.
    pub async fn run(mut self) {
        info!("Alert worker started with sinks: {:?}", self.sink_names());
        let mut delivered = 0usize;

        while let Some(alert) = self.rx.recv().await {
            for sink in &self.sinks {
                if let Err(e) = sink.deliver(&alert).await {
                    warn!(
                        "Alert sink {} failed for {} {}: {}",
                        sink.name(),
                        alert.team_abbr,
                        alert.event,
                        e
                    );
                }
            }
            delivered += 1;
            debug!("Alerts delivered: {}", delivered);
        }

        info!("Alert worker stopped after {} alerts", delivered);
    }
}
