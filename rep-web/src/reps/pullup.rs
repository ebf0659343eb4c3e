//! Pull-up tracker
//!
//! The bar is not a fixed pixel row: it is re-derived every frame from the
//! highest wrist. A rep needs both elbows bent with the chin over that line,
//! then both elbows extended again.

use tracing::debug;

use super::phase::{PullupPhase, PullupSignals};
use super::scorer::PullupMeasurements;
use super::step::TrackerStep;
use crate::config::PullupConfig;
use crate::feedback::Cue;
use crate::pose::*;

/// Elbow difference (degrees) that earns a mid-rep reminder
const UNEVEN_ARMS_CUE: f32 = 15.0;

const TRACKED_POINTS: [usize; 5] = [NOSE, LEFT_WRIST, RIGHT_WRIST, LEFT_SHOULDER, RIGHT_SHOULDER];

/// Extremes seen since the last completed rep
#[derive(Clone, Copy, Debug)]
struct PullupCycle {
    /// Smallest mean elbow angle
    peak_flexion: f32,
    /// Largest mean elbow angle
    bottom_extension: f32,
    /// Largest left/right difference
    asymmetry: f32,
    /// Highest shoulder position (smallest y)
    top_shoulder_y: f32,
}

impl Default for PullupCycle {
    fn default() -> Self {
        Self {
            peak_flexion: 180.0,
            bottom_extension: 0.0,
            asymmetry: 0.0,
            top_shoulder_y: f32::INFINITY,
        }
    }
}

impl PullupCycle {
    fn observe(&mut self, left: f32, right: f32, shoulder_y: f32) {
        let mean = (left + right) / 2.0;
        self.peak_flexion = self.peak_flexion.min(mean);
        self.bottom_extension = self.bottom_extension.max(mean);
        self.asymmetry = self.asymmetry.max((left - right).abs());
        self.top_shoulder_y = self.top_shoulder_y.min(shoulder_y);
    }

    /// Back at the hang without a rep: forget the attempt, keep the hang
    fn rearm(&mut self) {
        *self = Self {
            bottom_extension: self.bottom_extension,
            ..Self::default()
        };
    }

    fn finish(&self, baseline: f32) -> PullupMeasurements {
        PullupMeasurements {
            peak_flexion: self.peak_flexion,
            bottom_extension: self.bottom_extension,
            asymmetry: self.asymmetry,
            shoulder_rise: (baseline - self.top_shoulder_y).max(0.0),
        }
    }
}

/// Rest ⇄ Flexed automaton for one session
#[derive(Clone, Debug)]
pub struct PullupTracker {
    config: PullupConfig,
    phase: PullupPhase,
    cycle: PullupCycle,
}

impl PullupTracker {
    pub fn new(config: PullupConfig) -> Self {
        Self {
            config,
            phase: PullupPhase::Rest,
            cycle: PullupCycle::default(),
        }
    }

    pub fn phase(&self) -> PullupPhase {
        self.phase
    }

    /// Advance one frame. `baseline` is the calibrated hang shoulder height.
    ///
    /// Missing elbows or head/hand landmarks hold the current phase.
    pub fn update(
        &mut self,
        pose: &PoseFrame,
        angles: &FrameAngles,
        baseline: f32,
        gate: &ConfidenceGate,
    ) -> TrackerStep<PullupPhase, PullupMeasurements> {
        let Some((left, right)) = angles.elbows() else {
            return TrackerStep::hold(Some(Cue::NotVisible));
        };
        if !gate.passes(pose, &TRACKED_POINTS) {
            return TrackerStep::hold(Some(Cue::NotVisible));
        }

        let bar_y = pose.get(LEFT_WRIST).y.min(pose.get(RIGHT_WRIST).y);
        let chin_over_bar = pose.get(NOSE).y <= bar_y + self.config.bar_clearance;
        let shoulder_y = pose.mean_y(LEFT_SHOULDER, RIGHT_SHOULDER);

        let bent = left < self.config.flex_angle && right < self.config.flex_angle;
        let extended = left > self.config.extend_angle && right > self.config.extend_angle;

        if self.phase == PullupPhase::Rest && extended {
            self.cycle.rearm();
        }
        self.cycle.observe(left, right, shoulder_y);

        let signals = PullupSignals {
            flexed: bent && chin_over_bar,
            extended,
        };

        let next = self.phase.step(signals);
        let mut step = TrackerStep::hold(None);

        if next != self.phase {
            debug!(from = self.phase.name(), to = next.name(), left, right, "pull-up phase");
            if next == PullupPhase::Rest {
                step.completed = Some(self.cycle.finish(baseline));
                self.cycle = PullupCycle::default();
                self.cycle.observe(left, right, shoulder_y);
            }
            self.phase = next;
            step.transition = Some(next);
        }

        if step.completed.is_none() {
            step.cue = if self.phase == PullupPhase::Rest && bent && !chin_over_bar {
                Some(Cue::PullHigher)
            } else if (left - right).abs() > UNEVEN_ARMS_CUE {
                Some(Cue::EvenArms)
            } else {
                None
            };
        }

        step
    }

    /// Back to Rest with an empty cycle
    pub fn reset(&mut self) {
        self.phase = PullupPhase::Rest;
        self.cycle = PullupCycle::default();
    }
}
