//! Confidence gate - suppresses measurements from weak detections
//!
//! Calibration and rep tracking each get their own gate so the stance check
//! can be stricter than the in-rep tracking.

use super::angles::joint_angle;
use super::landmarks::PoseFrame;

/// Minimum-confidence gate applied to landmark triples and sets
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfidenceGate {
    /// Minimum confidence to accept raw data
    threshold: f32,
}

impl ConfidenceGate {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Set confidence threshold
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold.clamp(0.0, 1.0);
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Angle at `vertex`, absent if any of the three landmarks is gated out
    pub fn angle(&self, pose: &PoseFrame, a: usize, vertex: usize, c: usize) -> Option<f32> {
        joint_angle(pose.get(a), pose.get(vertex), pose.get(c), self.threshold)
    }

    /// Every listed landmark passes the gate
    pub fn passes(&self, pose: &PoseFrame, indices: &[usize]) -> bool {
        pose.all_visible(indices, self.threshold)
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self::new(0.5)
    }
}
