//! Calibration state - owned by the caller, threaded through every frame

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Session baseline and the stability run leading up to it
///
/// The counter only grows through a contiguous run of qualifying frames; any
/// disqualifying frame drops it back to zero. Once complete, the state stays
/// complete until the caller resets it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationState {
    /// Captured baseline (ankle y for jumps, shoulder y for pull-ups)
    baseline: Option<f32>,
    /// Consecutive qualifying frames so far
    stable_frames: u32,
    complete: bool,
}

impl CalibrationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn baseline(&self) -> Option<f32> {
        self.baseline
    }

    pub fn stable_frames(&self) -> u32 {
        self.stable_frames
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Restore a state saved with `to_json` (e.g. across page loads)
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Forget the baseline so the next frames recalibrate
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Count one more qualifying frame, returns the run length
    pub(crate) fn extend_run(&mut self) -> u32 {
        self.stable_frames = self.stable_frames.saturating_add(1);
        self.stable_frames
    }

    /// Disqualifying frame - no partial credit
    pub(crate) fn break_run(&mut self) {
        self.stable_frames = 0;
    }

    pub(crate) fn complete_with(&mut self, baseline: f32) {
        self.baseline = Some(baseline);
        self.complete = true;
    }
}

/// What the stance check found wrong
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StanceIssue {
    /// Jumps: knees not locked out
    StraightenLegs,
    /// Jumps: feet narrower than the shoulders allow
    WidenStance,
    /// Pull-ups: elbows bent during the hang
    ExtendArms,
    /// Pull-ups: hands not above the head
    GripBar,
}

/// Outcome of one calibration frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CalibrationStatus {
    /// Required landmarks under the calibration confidence minimum
    NotVisible,
    /// Landmarks fine, posture not
    Adjust { issue: StanceIssue },
    /// Qualifying run in progress
    Holding { frames: u32, required: u32 },
    Complete { baseline: f32 },
}

impl CalibrationStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, CalibrationStatus::Complete { .. })
    }

    /// Fraction of the stability run done (0-1)
    pub fn progress(&self) -> f32 {
        match self {
            CalibrationStatus::NotVisible | CalibrationStatus::Adjust { .. } => 0.0,
            CalibrationStatus::Holding { frames, required } => {
                (*frames as f32 / (*required).max(1) as f32).min(1.0)
            }
            CalibrationStatus::Complete { .. } => 1.0,
        }
    }
}
