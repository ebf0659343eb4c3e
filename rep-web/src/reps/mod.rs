//! Reps module - phase trackers, scoring and rep events
//!
//! Re-exports only. All logic in submodules.

mod event;
mod jump;
mod phase;
mod pullup;
mod scorer;
mod step;

pub use event::{RepDetail, RepEvent, RepIssue};
pub use jump::JumpTracker;
pub use phase::{JumpPhase, JumpSignals, PullupPhase, PullupSignals, RepPhase};
pub use pullup::PullupTracker;
pub use scorer::{
    landing_score, power_score, range_score, score_jump, score_pullup, symmetry_score,
    JumpMeasurements, PullupMeasurements, ScoredRep,
};
pub use step::TrackerStep;
