//! Vertical jump tracker
//!
//! Takeoff is not a fixed threshold: the ankle displacement above the
//! calibrated ground level is fed to the z-score detector, and a positive
//! spike while crouched marks the explosive push. Flight and touchdown are
//! then judged against a fixed margin around the baseline.

use tracing::debug;

use super::phase::{JumpPhase, JumpSignals};
use super::scorer::JumpMeasurements;
use super::step::TrackerStep;
use crate::config::{DetectorConfig, JumpConfig};
use crate::feedback::Cue;
use crate::pose::*;
use crate::signal::{Verdict, ZScoreDetector};

/// Extremes of the current jump attempt
#[derive(Clone, Copy, Debug)]
struct JumpCycle {
    /// Smallest mean knee angle before takeoff
    crouch_depth: f32,
    /// Largest mean knee angle after takeoff
    takeoff_extension: f32,
    /// Largest ankle rise above baseline
    height: f32,
}

impl Default for JumpCycle {
    fn default() -> Self {
        Self {
            crouch_depth: 180.0,
            takeoff_extension: 0.0,
            height: 0.0,
        }
    }
}

/// Five-phase jump automaton for one session
#[derive(Clone, Debug)]
pub struct JumpTracker {
    config: JumpConfig,
    detector: ZScoreDetector,
    phase: JumpPhase,
    /// Consecutive frames with knees under the crouch angle
    crouch_frames: u32,
    /// Frames since the last transition
    phase_frames: u32,
    cycle: JumpCycle,
}

impl JumpTracker {
    pub fn new(config: JumpConfig, detector: &DetectorConfig) -> Self {
        Self {
            config,
            detector: ZScoreDetector::from_config(detector),
            phase: JumpPhase::Rest,
            crouch_frames: 0,
            phase_frames: 0,
            cycle: JumpCycle::default(),
        }
    }

    pub fn phase(&self) -> JumpPhase {
        self.phase
    }

    /// Advance one frame. `baseline` is the calibrated ankle height.
    ///
    /// Missing knees or ankles hold the phase and skip the detector so a
    /// dropout cannot register as a spike.
    pub fn update(
        &mut self,
        pose: &PoseFrame,
        angles: &FrameAngles,
        baseline: f32,
        gate: &ConfidenceGate,
    ) -> TrackerStep<JumpPhase, JumpMeasurements> {
        let Some((left, right)) = angles.knees() else {
            return TrackerStep::hold(Some(Cue::NotVisible));
        };
        if !gate.passes(pose, &[LEFT_ANKLE, RIGHT_ANKLE]) {
            return TrackerStep::hold(Some(Cue::NotVisible));
        }

        let knee = (left + right) / 2.0;
        // Image y grows downward, so rising ankles give positive displacement
        let displacement = baseline - pose.mean_y(LEFT_ANKLE, RIGHT_ANKLE);
        let verdict = self.detector.update(displacement);

        self.crouch_frames = if knee < self.config.crouch_angle {
            self.crouch_frames.saturating_add(1)
        } else {
            0
        };
        self.phase_frames = self.phase_frames.saturating_add(1);

        let standing = knee > self.config.stand_angle;
        let signals = JumpSignals {
            crouch_held: self.crouch_frames >= self.config.crouch_hold_frames,
            standing,
            takeoff: verdict == Verdict::Positive,
            above_margin: displacement > self.config.airborne_margin,
            settled: standing || self.phase_frames >= self.config.landing_hold_frames,
            timed_out: self.phase_frames >= self.config.takeoff_timeout_frames,
        };

        let next = self.phase.step(signals);
        self.accumulate(next, knee, displacement);

        let mut step = TrackerStep::hold(None);
        if next == self.phase {
            return step;
        }

        debug!(from = self.phase.name(), to = next.name(), knee, displacement, "jump phase");
        match next {
            JumpPhase::Landing => {
                step.completed = Some(JumpMeasurements {
                    height: self.cycle.height,
                    landing_knee_angle: knee,
                    landing_asymmetry: (left - right).abs(),
                    ankle_offset: (pose.get(LEFT_ANKLE).y - pose.get(RIGHT_ANKLE).y).abs(),
                    crouch_depth: self.cycle.crouch_depth,
                    takeoff_extension: self.cycle.takeoff_extension,
                });
            }
            JumpPhase::Crouched => step.cue = Some(Cue::Explode),
            JumpPhase::Rest | JumpPhase::Exploding | JumpPhase::Airborne => {}
        }

        self.phase = next;
        self.phase_frames = 0;
        step.transition = Some(next);
        step
    }

    fn accumulate(&mut self, next: JumpPhase, knee: f32, displacement: f32) {
        // Every attempt starts from Rest with an empty cycle, including a
        // return from Landing or a timed-out takeoff while still squatting
        if next == JumpPhase::Rest && (self.phase != JumpPhase::Rest || self.crouch_frames == 0) {
            self.cycle = JumpCycle::default();
        }

        match next {
            JumpPhase::Rest | JumpPhase::Crouched => {
                self.cycle.crouch_depth = self.cycle.crouch_depth.min(knee);
            }
            JumpPhase::Exploding | JumpPhase::Airborne => {
                self.cycle.takeoff_extension = self.cycle.takeoff_extension.max(knee);
                self.cycle.height = self.cycle.height.max(displacement);
            }
            JumpPhase::Landing => {}
        }
    }

    /// Back to Rest, forget the cycle and the detector history
    pub fn reset(&mut self) {
        self.phase = JumpPhase::Rest;
        self.crouch_frames = 0;
        self.phase_frames = 0;
        self.cycle = JumpCycle::default();
        self.detector.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::reps::{score_jump, RepIssue};
    use crate::testing::{jump_pose, uneven_jump_pose};
    use approx::assert_abs_diff_eq;

    const GROUND: f32 = 0.9;

    type Step = TrackerStep<JumpPhase, JumpMeasurements>;

    fn tracker() -> JumpTracker {
        JumpTracker::new(JumpConfig::default(), &DetectorConfig::default())
    }

    fn run(tracker: &mut JumpTracker, knee: f32, rise: f32) -> Step {
        run_pose(tracker, &jump_pose(knee, GROUND - rise, 0.9))
    }

    fn run_pose(tracker: &mut JumpTracker, pose: &PoseFrame) -> Step {
        let gate = ConfidenceGate::new(0.5);
        let angles = FrameAngles::measure(pose, &gate);
        tracker.update(pose, &angles, GROUND, &gate)
    }

    /// Stand, crouch, explode and fly, stopping just before touchdown
    fn fly(tracker: &mut JumpTracker) -> Vec<Step> {
        let mut steps = Vec::new();
        for _ in 0..12 {
            steps.push(run(tracker, 175.0, 0.0));
        }
        for knee in [140.0, 110.0, 95.0, 90.0, 90.0] {
            steps.push(run(tracker, knee, 0.0));
        }
        steps.push(run(tracker, 150.0, 0.02));
        for rise in [0.06, 0.12, 0.15, 0.12, 0.06] {
            steps.push(run(tracker, 175.0, rise));
        }
        steps
    }

    /// Full jump landing with the given knee angle
    fn jump(tracker: &mut JumpTracker, landing_knee: f32) -> Vec<Step> {
        let mut steps = fly(tracker);
        steps.push(run(tracker, landing_knee, 0.0));
        steps
    }

    fn phases(steps: &[Step]) -> Vec<JumpPhase> {
        steps.iter().filter_map(|s| s.transition).collect()
    }

    #[test]
    fn test_full_jump_cycle() {
        let mut tracker = tracker();
        let steps = jump(&mut tracker, 100.0);

        assert_eq!(
            phases(&steps),
            vec![JumpPhase::Crouched, JumpPhase::Exploding, JumpPhase::Airborne, JumpPhase::Landing]
        );
        let completed: Vec<_> = steps.iter().filter_map(|s| s.completed).collect();
        assert_eq!(completed.len(), 1);

        let m = completed[0];
        assert_abs_diff_eq!(m.height, 0.15, epsilon = 1e-4);
        assert_abs_diff_eq!(m.landing_knee_angle, 100.0, epsilon = 0.5);
        assert_abs_diff_eq!(m.crouch_depth, 90.0, epsilon = 0.5);
        assert_abs_diff_eq!(m.takeoff_extension, 175.0, epsilon = 0.5);
        assert_abs_diff_eq!(m.landing_asymmetry, 0.0, epsilon = 0.5);
    }

    #[test]
    fn test_landing_returns_to_rest() {
        let mut tracker = tracker();
        jump(&mut tracker, 100.0);
        assert_eq!(tracker.phase(), JumpPhase::Landing);

        let step = run(&mut tracker, 175.0, 0.0);
        assert_eq!(step.transition, Some(JumpPhase::Rest));
    }

    #[test]
    fn test_single_frame_dip_is_not_a_crouch() {
        let mut tracker = tracker();
        for _ in 0..12 {
            run(&mut tracker, 175.0, 0.0);
        }
        run(&mut tracker, 100.0, 0.0);
        run(&mut tracker, 175.0, 0.0);
        assert_eq!(tracker.phase(), JumpPhase::Rest);
    }

    #[test]
    fn test_standing_up_aborts_crouch() {
        let mut tracker = tracker();
        for _ in 0..12 {
            run(&mut tracker, 175.0, 0.0);
        }
        for _ in 0..4 {
            run(&mut tracker, 95.0, 0.0);
        }
        assert_eq!(tracker.phase(), JumpPhase::Crouched);

        let step = run(&mut tracker, 175.0, 0.0);
        assert_eq!(step.transition, Some(JumpPhase::Rest));
        assert!(step.completed.is_none());
    }

    #[test]
    fn test_spike_without_crouch_is_ignored() {
        let mut tracker = tracker();
        for _ in 0..12 {
            run(&mut tracker, 175.0, 0.0);
        }
        let step = run(&mut tracker, 175.0, 0.02);
        assert!(step.transition.is_none());
        assert_eq!(tracker.phase(), JumpPhase::Rest);
    }

    #[test]
    fn test_hidden_ankles_hold_phase() {
        let mut tracker = tracker();
        for _ in 0..12 {
            run(&mut tracker, 175.0, 0.0);
        }
        for _ in 0..4 {
            run(&mut tracker, 95.0, 0.0);
        }
        let mut pose = jump_pose(95.0, GROUND - 0.2, 0.9);
        pose.landmarks[LEFT_ANKLE].confidence = 0.1;
        let step = run_pose(&mut tracker, &pose);
        assert!(step.transition.is_none());
        assert_eq!(step.cue, Some(Cue::NotVisible));
        assert_eq!(tracker.phase(), JumpPhase::Crouched);
    }

    #[test]
    fn test_takeoff_timeout_aborts() {
        let mut tracker = tracker();
        for _ in 0..12 {
            run(&mut tracker, 175.0, 0.0);
        }
        for _ in 0..4 {
            run(&mut tracker, 95.0, 0.0);
        }
        run(&mut tracker, 150.0, 0.02);
        assert_eq!(tracker.phase(), JumpPhase::Exploding);

        let mut last = None;
        for _ in 0..JumpConfig::default().takeoff_timeout_frames {
            last = run(&mut tracker, 150.0, 0.02).transition;
        }
        assert_eq!(last, Some(JumpPhase::Rest));
    }

    #[test]
    fn test_second_jump_from_landing_squat_starts_fresh() {
        let mut tracker = tracker();
        jump(&mut tracker, 90.0);

        // Stay in the squat until the landing hold runs out
        let mut steps = Vec::new();
        for _ in 0..12 {
            steps.push(run(&mut tracker, 90.0, 0.0));
        }
        assert_eq!(phases(&steps), vec![JumpPhase::Rest, JumpPhase::Crouched]);

        steps.push(run(&mut tracker, 150.0, 0.02));
        for rise in [0.04, 0.04, 0.0] {
            steps.push(run(&mut tracker, 175.0, rise));
        }
        let completed: Vec<_> = steps.iter().filter_map(|s| s.completed).collect();
        assert_eq!(completed.len(), 1);
        assert_abs_diff_eq!(completed[0].height, 0.04, epsilon = 1e-4);

        let rep = score_jump(&completed[0], &ScoringConfig::default());
        assert!(rep.issues.contains(&RepIssue::LowJump));
    }

    #[test]
    fn test_uneven_touchdown_is_asymmetric() {
        let mut tracker = tracker();
        fly(&mut tracker);

        let step = run_pose(&mut tracker, &uneven_jump_pose(80.0, 110.0, GROUND, 0.9));
        assert_eq!(step.transition, Some(JumpPhase::Landing));
        let m = step.completed.unwrap();
        assert_abs_diff_eq!(m.landing_asymmetry, 30.0, epsilon = 0.5);
        assert_abs_diff_eq!(m.landing_knee_angle, 95.0, epsilon = 0.5);

        let rep = score_jump(&m, &ScoringConfig::default());
        assert!(rep.issues.contains(&RepIssue::Asymmetry));
    }
}
