//! Gridiron Core - live football game tracking for scoreboard displays.
//!
//! This module provides:
//! - Normalization of ESPN scoreboard events into flat game records
//! - Live set reconciliation with a stable display rotation
//! - Scoring play detection with once-per-occurrence alerts
//! - Adaptive poll cadence (fast while live, slow while idle)
//! - A network-free clock simulation for test mode
//! - Queued alert delivery to lighting effects

pub mod alerts;
pub mod clients;
pub mod error;
pub mod extractor;
pub mod league_config;
pub mod manager;
pub mod models;
pub mod providers;
pub mod scheduling;
pub mod simulator;
pub mod team_palette;
pub mod tracking;

pub use error::{AlertError, ClockParseError, ExtractionError, FetchError};
pub use extractor::GameDetailExtractor;
pub use manager::{LiveConfig, LiveGameManager, TickReport};
pub use models::{Game, GamePhase, ScoreboardSnapshot, ScoringAlert, ScoringEvent};
pub use scheduling::{PollScheduler, PollSchedulerConfig, RotationScheduler};
pub use simulator::TestClockSimulator;
pub use team_palette::TeamPalette;
pub use tracking::{LiveGameRegistry, ReconcileOutcome, ScoringEventTracker};
