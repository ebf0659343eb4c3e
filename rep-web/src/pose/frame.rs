//! Per-frame joint angles - shared data structure for calibration and reps

use serde::Serialize;

use super::confidence_gate::ConfidenceGate;
use super::landmarks::*;

/// Joint angles for one frame, in degrees (0-180)
///
/// A field is None when a contributing landmark was gated out, never zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FrameAngles {
    pub left_elbow: Option<f32>,
    pub right_elbow: Option<f32>,
    pub left_knee: Option<f32>,
    pub right_knee: Option<f32>,
    pub left_hip: Option<f32>,
    pub right_hip: Option<f32>,
}

impl FrameAngles {
    /// Measure every tracked joint through the given gate
    pub fn measure(pose: &PoseFrame, gate: &ConfidenceGate) -> Self {
        Self {
            left_elbow: gate.angle(pose, LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST),
            right_elbow: gate.angle(pose, RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST),
            left_knee: gate.angle(pose, LEFT_HIP, LEFT_KNEE, LEFT_ANKLE),
            right_knee: gate.angle(pose, RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE),
            left_hip: gate.angle(pose, LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE),
            right_hip: gate.angle(pose, RIGHT_SHOULDER, RIGHT_HIP, RIGHT_KNEE),
        }
    }

    /// Both elbows, only if both were measured
    pub fn elbows(&self) -> Option<(f32, f32)> {
        Some((self.left_elbow?, self.right_elbow?))
    }

    /// Both knees, only if both were measured
    pub fn knees(&self) -> Option<(f32, f32)> {
        Some((self.left_knee?, self.right_knee?))
    }

    pub fn mean_elbow(&self) -> Option<f32> {
        self.elbows().map(|(l, r)| (l + r) / 2.0)
    }

    pub fn mean_knee(&self) -> Option<f32> {
        self.knees().map(|(l, r)| (l + r) / 2.0)
    }
}
