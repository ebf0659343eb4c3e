//! Rep session - the call-per-frame processor
//!
//! One `RepSession` per subject and exercise. It owns every buffer the
//! pipeline needs; the calibration state is owned by the caller and passed
//! in on each frame so it can be inspected, persisted or reset externally.
//!
//! Per frame:
//! 1. Measure joint angles through the tracking gate
//! 2. Until calibrated, run the stance check and stop there
//! 3. Otherwise advance the exercise tracker
//! 4. Score a completed rep and pick at most one coaching phrase

use serde::Serialize;
use tracing::{info, warn};

use crate::calibration::{CalibrationState, CalibrationStatus, Calibrator};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::exercise::Exercise;
use crate::feedback::{Cue, FeedbackPicker};
use crate::pose::{ConfidenceGate, FrameAngles, PoseFrame};
use crate::reps::{
    score_jump, score_pullup, JumpTracker, PullupTracker, RepEvent, RepIssue, RepPhase, ScoredRep,
};
use crate::stats::SessionStats;

/// Everything the host needs to know about one frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameResult {
    /// New phase, only on the frame it was entered
    pub phase_change: Option<RepPhase>,
    pub phase: RepPhase,
    pub angles: FrameAngles,
    pub calibration: CalibrationStatus,
    /// At most one coaching phrase
    pub feedback: Option<&'static str>,
    pub rep_completed: bool,
    /// Present exactly when `rep_completed` is set
    pub rep: Option<RepEvent>,
}

#[derive(Clone, Debug)]
enum Tracker {
    Pullup(PullupTracker),
    Jump(JumpTracker),
}

impl Tracker {
    fn phase(&self) -> RepPhase {
        match self {
            Tracker::Pullup(t) => t.phase().into(),
            Tracker::Jump(t) => t.phase().into(),
        }
    }

    fn reset(&mut self) {
        match self {
            Tracker::Pullup(t) => t.reset(),
            Tracker::Jump(t) => t.reset(),
        }
    }
}

/// Frame-synchronous rep counter for one exercise
#[derive(Clone, Debug)]
pub struct RepSession {
    exercise: Exercise,
    config: SessionConfig,
    tracking_gate: ConfidenceGate,
    calibrator: Calibrator,
    tracker: Tracker,
    feedback: FeedbackPicker,
    stats: SessionStats,
    /// Calibration was complete on the previous frame
    calibrated: bool,
}

impl RepSession {
    /// Build a session. Invalid configuration fails here, never mid-stream.
    pub fn new(exercise: Exercise, config: SessionConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            warn!(%err, "rejected session configuration");
            return Err(err);
        }

        let calibrator = Calibrator::new(
            exercise,
            ConfidenceGate::new(config.confidence.calibration),
            config.calibration,
        );
        let tracker = match exercise {
            Exercise::Pullup => Tracker::Pullup(PullupTracker::new(config.pullup)),
            Exercise::Jump => Tracker::Jump(JumpTracker::new(config.jump, &config.detector)),
        };

        info!(%exercise, "rep session created");
        Ok(Self {
            exercise,
            tracking_gate: ConfidenceGate::new(config.confidence.tracking),
            calibrator,
            tracker,
            feedback: FeedbackPicker::new(&config.feedback),
            stats: SessionStats::new(),
            calibrated: false,
            config,
        })
    }

    /// Build a session from a selector string such as `"pullups"`
    pub fn from_selector(selector: &str, config: SessionConfig) -> Result<Self> {
        Self::new(selector.parse()?, config)
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn phase(&self) -> RepPhase {
        self.tracker.phase()
    }

    /// Process one frame to completion
    pub fn process_frame(
        &mut self,
        frame: &PoseFrame,
        calibration: &mut CalibrationState,
    ) -> FrameResult {
        let angles = FrameAngles::measure(frame, &self.tracking_gate);

        let baseline = match calibration.baseline().filter(|_| calibration.is_complete()) {
            Some(baseline) => baseline,
            None => return self.calibrate(frame, calibration, angles),
        };

        let (phase_change, cue, scored) = match &mut self.tracker {
            Tracker::Pullup(tracker) => {
                let step = tracker.update(frame, &angles, baseline, &self.tracking_gate);
                (
                    step.transition.map(RepPhase::from),
                    step.cue,
                    step.completed.map(|m| score_pullup(&m, &self.config.scoring)),
                )
            }
            Tracker::Jump(tracker) => {
                let step = tracker.update(frame, &angles, baseline, &self.tracking_gate);
                (
                    step.transition.map(RepPhase::from),
                    step.cue,
                    step.completed.map(|m| score_jump(&m, &self.config.scoring)),
                )
            }
        };

        let rep = scored.map(|scored| self.finish_rep(scored, frame.timestamp_ms));
        let cue = rep.as_ref().map(completion_cue).or(cue);

        FrameResult {
            phase_change,
            phase: self.tracker.phase(),
            angles,
            calibration: CalibrationStatus::Complete { baseline },
            feedback: self.feedback.offer(cue, rep.is_some()),
            rep_completed: rep.is_some(),
            rep,
        }
    }

    /// Drop the current rep attempt, keep the totals
    pub fn reset_tracker(&mut self) {
        self.tracker.reset();
    }

    /// Drop tracker progress and totals. Calibration is the caller's.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.stats = SessionStats::new();
    }

    fn calibrate(
        &mut self,
        frame: &PoseFrame,
        calibration: &mut CalibrationState,
        angles: FrameAngles,
    ) -> FrameResult {
        // Caller cleared the calibration mid-session
        if self.calibrated {
            self.tracker.reset();
            self.calibrated = false;
        }

        let status = self.calibrator.update(frame, calibration);
        let (cue, urgent) = match status {
            CalibrationStatus::NotVisible => (Cue::NotVisible, false),
            CalibrationStatus::Adjust { issue } => (Cue::from(issue), false),
            CalibrationStatus::Holding { .. } => (Cue::HoldStill, false),
            CalibrationStatus::Complete { .. } => {
                self.tracker.reset();
                self.calibrated = true;
                (Cue::Calibrated, true)
            }
        };

        FrameResult {
            phase_change: None,
            phase: self.tracker.phase(),
            angles,
            calibration: status,
            feedback: self.feedback.offer(Some(cue), urgent),
            rep_completed: false,
            rep: None,
        }
    }

    fn finish_rep(&mut self, scored: ScoredRep, timestamp_ms: f64) -> RepEvent {
        let mut event = scored.into_event(timestamp_ms, 0);
        self.stats.record(&mut event);
        info!(
            exercise = %self.exercise,
            rep = event.rep_number,
            score = event.score,
            issues = ?event.issues,
            "rep completed"
        );
        event
    }
}

/// Coaching cue for the first issue of a finished rep
fn completion_cue(event: &RepEvent) -> Cue {
    let pullup = event.exercise() == Exercise::Pullup;
    match event.issues.first() {
        Some(RepIssue::Asymmetry) if pullup => Cue::EvenArms,
        Some(RepIssue::Asymmetry) => Cue::LandEvenly,
        Some(RepIssue::PartialTopRom) if pullup => Cue::PullHigher,
        Some(RepIssue::PartialTopRom | RepIssue::PartialBottomRom) => Cue::FullRange,
        Some(RepIssue::StiffLanding) => Cue::SoftLanding,
        Some(RepIssue::LowJump) => Cue::JumpHigher,
        Some(RepIssue::NoIssues) | None => Cue::GoodRep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use crate::reps::PullupPhase;
    use crate::testing::{hang_pose, jump_pose, standing_pose};

    fn calibrated_pullups() -> (RepSession, CalibrationState) {
        let mut session = RepSession::new(Exercise::Pullup, SessionConfig::default()).unwrap();
        let mut calibration = CalibrationState::new();
        for _ in 0..30 {
            session.process_frame(&hang_pose(170.0, 170.0, false), &mut calibration);
        }
        assert!(calibration.is_complete());
        (session, calibration)
    }

    #[test]
    fn test_unknown_selector_fails_at_setup() {
        let err = RepSession::from_selector("burpees", SessionConfig::default()).unwrap_err();
        assert!(matches!(err, SessionError::UnknownExercise(_)));
    }

    #[test]
    fn test_invalid_config_fails_at_setup() {
        let mut config = SessionConfig::default();
        config.detector.influence = -0.5;
        assert!(RepSession::new(Exercise::Jump, config).is_err());
    }

    #[test]
    fn test_calibrates_before_tracking() {
        let mut session = RepSession::new(Exercise::Pullup, SessionConfig::default()).unwrap();
        let mut calibration = CalibrationState::new();

        // Flexed pose during calibration is a stance problem, not a rep
        let result = session.process_frame(&hang_pose(80.0, 80.0, true), &mut calibration);
        assert!(result.phase_change.is_none());
        assert!(matches!(result.calibration, CalibrationStatus::Adjust { .. }));
        assert_eq!(session.phase(), RepPhase::rest(Exercise::Pullup));
    }

    #[test]
    fn test_calibration_completion_speaks() {
        let mut session = RepSession::new(Exercise::Jump, SessionConfig::default()).unwrap();
        let mut calibration = CalibrationState::new();
        let mut last = None;
        for _ in 0..30 {
            last = Some(session.process_frame(&standing_pose(0.9, 0.9), &mut calibration));
        }
        let result = last.unwrap();
        assert!(result.calibration.is_complete());
        assert!(Cue::Calibrated.phrases().contains(&result.feedback.unwrap()));
    }

    #[test]
    fn test_pullup_rep_event() {
        let (mut session, mut calibration) = calibrated_pullups();
        let trace = [170.0, 150.0, 120.0, 90.0, 80.0, 90.0, 120.0, 150.0, 170.0];

        let mut events = Vec::new();
        for angle in trace {
            let pose = hang_pose(angle, angle, angle < 100.0);
            let result = session.process_frame(&pose, &mut calibration);
            assert_eq!(result.rep_completed, result.rep.is_some());
            events.extend(result.rep);
        }

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].rep_number, 1);
        assert_eq!(events[0].score, 100);
        assert_eq!(events[0].issues, vec![RepIssue::NoIssues]);
        assert_eq!(session.stats().reps, 1);
    }

    #[test]
    fn test_rep_completion_always_has_feedback() {
        let (mut session, mut calibration) = calibrated_pullups();
        for angle in [80.0, 80.0] {
            session.process_frame(&hang_pose(angle, angle, true), &mut calibration);
        }
        let result = session.process_frame(&hang_pose(170.0, 170.0, false), &mut calibration);
        assert!(result.rep_completed);
        assert!(result.feedback.is_some());
    }

    #[test]
    fn test_external_reset_recalibrates() {
        let (mut session, mut calibration) = calibrated_pullups();
        session.process_frame(&hang_pose(80.0, 80.0, true), &mut calibration);
        assert_eq!(session.phase(), RepPhase::from(PullupPhase::Flexed));

        calibration.reset();
        let result = session.process_frame(&hang_pose(170.0, 170.0, false), &mut calibration);
        assert!(!result.rep_completed);
        assert_eq!(result.calibration, CalibrationStatus::Holding { frames: 1, required: 30 });
        assert_eq!(session.phase(), RepPhase::rest(Exercise::Pullup));
    }

    #[test]
    fn test_reset_tracker_keeps_totals() {
        let (mut session, mut calibration) = calibrated_pullups();
        for (angle, chin) in [(80.0, true), (170.0, false), (80.0, true)] {
            session.process_frame(&hang_pose(angle, angle, chin), &mut calibration);
        }
        assert_eq!(session.phase(), RepPhase::from(PullupPhase::Flexed));

        session.reset_tracker();
        assert_eq!(session.phase(), RepPhase::rest(Exercise::Pullup));
        assert_eq!(session.stats().reps, 1);
    }

    #[test]
    fn test_low_confidence_frame_is_unproductive() {
        let mut session = RepSession::new(Exercise::Jump, SessionConfig::default()).unwrap();
        let mut calibration = CalibrationState::new();
        for _ in 0..30 {
            session.process_frame(&standing_pose(0.9, 0.9), &mut calibration);
        }
        let result = session.process_frame(&jump_pose(90.0, 0.9, 0.2), &mut calibration);
        assert!(result.phase_change.is_none());
        assert!(result.angles.left_knee.is_none());
        assert!(result.angles.right_knee.is_none());
    }

    #[test]
    fn test_completion_cue_mapping() {
        let (mut session, mut calibration) = calibrated_pullups();
        // Elbows never get below 90, so the top is partial
        for (angle, chin) in [(95.0, true), (95.0, true), (170.0, false)] {
            let result = session.process_frame(&hang_pose(angle, angle, chin), &mut calibration);
            if let Some(event) = result.rep {
                assert_eq!(event.issues, vec![RepIssue::PartialTopRom]);
                assert_eq!(completion_cue(&event), Cue::PullHigher);
            }
        }
        assert_eq!(session.stats().reps, 1);
    }
}
