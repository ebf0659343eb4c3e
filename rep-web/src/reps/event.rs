//! Completed repetition events
//!
//! A `RepEvent` is the only thing downstream collaborators (storage,
//! leaderboard, AI analysis) ever see of a rep.

use serde::Serialize;

use crate::exercise::Exercise;

/// Named problem found in a rep
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepIssue {
    Asymmetry,
    PartialTopRom,
    PartialBottomRom,
    StiffLanding,
    LowJump,
    #[serde(rename = "no issues")]
    NoIssues,
}

impl RepIssue {
    pub fn tag(&self) -> &'static str {
        match self {
            RepIssue::Asymmetry => "asymmetry",
            RepIssue::PartialTopRom => "partial_top_rom",
            RepIssue::PartialBottomRom => "partial_bottom_rom",
            RepIssue::StiffLanding => "stiff_landing",
            RepIssue::LowJump => "low_jump",
            RepIssue::NoIssues => "no issues",
        }
    }
}

/// Exercise-specific geometry of one rep. Angles in degrees, heights in the
/// estimator's normalized units.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "exercise", rename_all = "snake_case")]
pub enum RepDetail {
    Pullup {
        /// Smallest mean elbow angle (top of the pull)
        peak_flexion: f32,
        /// Largest mean elbow angle (dead hang)
        bottom_extension: f32,
        /// Largest left/right elbow difference
        asymmetry: f32,
        /// Shoulder rise above the calibrated hang
        shoulder_rise: f32,
        range_score: u8,
        symmetry_score: u8,
    },
    Jump {
        /// Peak ankle rise above the calibrated ground level
        height: f32,
        landing_knee_angle: f32,
        /// Left/right knee difference at touchdown
        landing_asymmetry: f32,
        /// Left/right ankle height difference at touchdown
        ankle_offset: f32,
        /// Smallest mean knee angle before takeoff
        crouch_depth: f32,
        /// Largest mean knee angle after takeoff
        takeoff_extension: f32,
        landing_score: u8,
        power_score: u8,
    },
}

impl RepDetail {
    pub fn exercise(&self) -> Exercise {
        match self {
            RepDetail::Pullup { .. } => Exercise::Pullup,
            RepDetail::Jump { .. } => Exercise::Jump,
        }
    }
}

/// One scored repetition
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RepEvent {
    /// Timestamp of the completing frame (ms)
    pub timestamp_ms: f64,
    /// 1-based position in the session
    pub rep_number: u32,
    /// Composite score (0-100)
    pub score: u8,
    /// Never empty
    pub issues: Vec<RepIssue>,
    pub detail: RepDetail,
}

impl RepEvent {
    pub fn exercise(&self) -> Exercise {
        self.detail.exercise()
    }

    pub fn has_issue(&self, issue: RepIssue) -> bool {
        self.issues.contains(&issue)
    }

    /// Opaque payload handed to the AI-analysis collaborator
    pub fn analysis_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::Map::new();
        payload.insert("exercise".into(), self.exercise().name().into());
        payload.insert("rep".into(), serde_json::to_value(self).unwrap_or_default());
        payload.into()
    }
}
