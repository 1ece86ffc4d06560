//! Error types shared across the tracking pipeline.
//!
//! None of these are fatal: callers log them and keep showing the last known
//! good state.

use thiserror::Error;

/// A single feed event could not be turned into a [`crate::models::Game`].
///
/// Always carries the event id (or `"unknown"` when the id itself is missing)
/// so the skip can be logged against the offending event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("event {event_id}: missing required field `{field}`")]
    MissingField { event_id: String, field: &'static str },

    #[error("event {event_id}: missing team abbreviation")]
    MissingAbbreviation { event_id: String },

    #[error("event {event_id}: malformed field `{field}`: {reason}")]
    MalformedField {
        event_id: String,
        field: &'static str,
        reason: String,
    },
}

impl ExtractionError {
    pub fn event_id(&self) -> &str {
        match self {
            ExtractionError::MissingField { event_id, .. }
            | ExtractionError::MissingAbbreviation { event_id }
            | ExtractionError::MalformedField { event_id, .. } => event_id,
        }
    }
}

/// The feed as a whole was unreachable or unusable this tick.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed returned HTTP {0}")]
    Status(u16),

    #[error("feed body could not be decoded: {0}")]
    Decode(String),

    #[error("feed body has no `events` array")]
    MissingEvents,
}

/// Test-mode clock text was not `MM:SS`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not parse clock `{clock}`")]
pub struct ClockParseError {
    pub clock: String,
}

/// Delivery of a scoring alert to an effect consumer failed.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("effect request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("effect endpoint returned HTTP {0}")]
    Status(u16),
}
