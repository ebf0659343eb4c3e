//! Calibration module - stability-gated baseline capture
//!
//! Re-exports only. All logic in submodules.

mod stance;
mod state;

pub use stance::Calibrator;
pub use state::{CalibrationState, CalibrationStatus, StanceIssue};
