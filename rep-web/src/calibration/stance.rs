//! Stance check and baseline capture
//!
//! A baseline is only taken after the subject holds a correct starting
//! posture for a contiguous run of frames. Jumps need straight legs and a
//! shoulder-width stance; pull-ups need a dead hang under the bar.

use tracing::info;

use super::state::{CalibrationState, CalibrationStatus, StanceIssue};
use crate::config::CalibrationConfig;
use crate::exercise::Exercise;
use crate::pose::*;

const JUMP_LANDMARKS: [usize; 8] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_HIP,
    RIGHT_HIP,
    LEFT_KNEE,
    RIGHT_KNEE,
    LEFT_ANKLE,
    RIGHT_ANKLE,
];

const PULLUP_LANDMARKS: [usize; 7] = [
    NOSE,
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_ELBOW,
    RIGHT_ELBOW,
    LEFT_WRIST,
    RIGHT_WRIST,
];

/// Per-exercise calibration driver
#[derive(Clone, Debug)]
pub struct Calibrator {
    exercise: Exercise,
    /// Stricter than the tracking gate
    gate: ConfidenceGate,
    config: CalibrationConfig,
}

impl Calibrator {
    pub fn new(exercise: Exercise, gate: ConfidenceGate, config: CalibrationConfig) -> Self {
        Self {
            exercise,
            gate,
            config,
        }
    }

    pub fn required_landmarks(&self) -> &'static [usize] {
        match self.exercise {
            Exercise::Jump => &JUMP_LANDMARKS,
            Exercise::Pullup => &PULLUP_LANDMARKS,
        }
    }

    /// Process one frame of calibration
    ///
    /// No-op once the state is complete.
    pub fn update(&self, pose: &PoseFrame, state: &mut CalibrationState) -> CalibrationStatus {
        if let (true, Some(baseline)) = (state.is_complete(), state.baseline()) {
            return CalibrationStatus::Complete { baseline };
        }

        if !self.gate.passes(pose, self.required_landmarks()) {
            state.break_run();
            return CalibrationStatus::NotVisible;
        }

        let stance = match self.exercise {
            Exercise::Jump => self.check_jump_stance(pose),
            Exercise::Pullup => self.check_dead_hang(pose),
        };

        let baseline = match stance {
            Ok(baseline) => baseline,
            Err(issue) => {
                state.break_run();
                return CalibrationStatus::Adjust { issue };
            }
        };

        let frames = state.extend_run();
        if frames >= self.config.stable_frames {
            state.complete_with(baseline);
            info!(exercise = %self.exercise, baseline, "calibration complete");
            return CalibrationStatus::Complete { baseline };
        }

        CalibrationStatus::Holding {
            frames,
            required: self.config.stable_frames,
        }
    }

    /// Straight legs, feet at least `stance_ratio` of shoulder width apart.
    /// Baseline = mean ankle height.
    fn check_jump_stance(&self, pose: &PoseFrame) -> Result<f32, StanceIssue> {
        let left = self.gate.angle(pose, LEFT_HIP, LEFT_KNEE, LEFT_ANKLE);
        let right = self.gate.angle(pose, RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE);
        let knee = match (left, right) {
            (Some(l), Some(r)) => (l + r) / 2.0,
            _ => return Err(StanceIssue::StraightenLegs),
        };
        if knee <= self.config.min_leg_extension {
            return Err(StanceIssue::StraightenLegs);
        }

        let feet = pose.separation_x(LEFT_ANKLE, RIGHT_ANKLE);
        let shoulders = pose.separation_x(LEFT_SHOULDER, RIGHT_SHOULDER);
        if feet < self.config.stance_ratio * shoulders {
            return Err(StanceIssue::WidenStance);
        }

        Ok(pose.mean_y(LEFT_ANKLE, RIGHT_ANKLE))
    }

    /// Both arms locked out, both hands above the head.
    /// Baseline = mean shoulder height at the hang.
    fn check_dead_hang(&self, pose: &PoseFrame) -> Result<f32, StanceIssue> {
        let nose_y = pose.get(NOSE).y;
        if pose.get(LEFT_WRIST).y >= nose_y || pose.get(RIGHT_WRIST).y >= nose_y {
            return Err(StanceIssue::GripBar);
        }

        let left = self.gate.angle(pose, LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST);
        let right = self.gate.angle(pose, RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST);
        match (left, right) {
            (Some(l), Some(r))
                if l > self.config.min_arm_extension && r > self.config.min_arm_extension => {}
            _ => return Err(StanceIssue::ExtendArms),
        }

        Ok(pose.mean_y(LEFT_SHOULDER, RIGHT_SHOULDER))
    }
}
