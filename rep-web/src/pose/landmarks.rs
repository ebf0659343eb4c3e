//! Pose landmarks as delivered by the browser estimator
//!
//! MediaPipe Pose emits 33 landmarks per frame. JavaScript hands them over as a
//! flat Float32Array of `[x, y, z, visibility]` quadruples. Coordinates are
//! normalized to the image (0-1, y grows downward); `z` is ignored.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

pub const LANDMARK_COUNT: usize = 33;

/// Floats per landmark in the flat JS array (x, y, z, visibility)
pub const VALUES_PER_LANDMARK: usize = 4;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single 2D landmark with detection confidence
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Detection confidence (0-1)
    pub confidence: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    pub fn position(&self) -> Point2<f32> {
        Point2::new(self.x, self.y)
    }

    /// Confidence meets the given minimum
    pub fn is_visible(&self, min_confidence: f32) -> bool {
        self.confidence >= min_confidence
    }
}

/// One frame of landmarks from the estimator
#[derive(Clone, Debug, PartialEq)]
pub struct PoseFrame {
    /// Capture time in milliseconds
    pub timestamp_ms: f64,
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl PoseFrame {
    pub fn new(timestamp_ms: f64, landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self {
            timestamp_ms,
            landmarks,
        }
    }

    /// Frame with every landmark at the origin and zero confidence
    pub fn empty(timestamp_ms: f64) -> Self {
        Self::new(timestamp_ms, [Landmark::default(); LANDMARK_COUNT])
    }

    /// Parse the flat `[x, y, z, visibility] × 33` array from JavaScript.
    ///
    /// Returns None on a length mismatch.
    pub fn from_flat(data: &[f32], timestamp_ms: f64) -> Option<Self> {
        if data.len() != LANDMARK_COUNT * VALUES_PER_LANDMARK {
            return None;
        }

        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (landmark, chunk) in landmarks
            .iter_mut()
            .zip(data.chunks_exact(VALUES_PER_LANDMARK))
        {
            *landmark = Landmark::new(chunk[0], chunk[1], chunk[3].clamp(0.0, 1.0));
        }

        Some(Self::new(timestamp_ms, landmarks))
    }

    pub fn get(&self, index: usize) -> &Landmark {
        &self.landmarks[index]
    }

    /// All listed landmarks meet the minimum confidence
    pub fn all_visible(&self, indices: &[usize], min_confidence: f32) -> bool {
        indices
            .iter()
            .all(|&i| self.landmarks[i].is_visible(min_confidence))
    }

    /// Mean y of two landmarks
    pub fn mean_y(&self, a: usize, b: usize) -> f32 {
        (self.landmarks[a].y + self.landmarks[b].y) / 2.0
    }

    /// Horizontal separation of two landmarks
    pub fn separation_x(&self, a: usize, b: usize) -> f32 {
        (self.landmarks[a].x - self.landmarks[b].x).abs()
    }
}
