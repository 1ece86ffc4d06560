//! Cross-tick state: the live set and the scoring de-dup map.

pub mod registry;
pub mod scoring;

pub use registry::{LiveGameRegistry, ReconcileOutcome};
pub use scoring::ScoringEventTracker;
