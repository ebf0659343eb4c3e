//! Rep phases and their transition rules
//!
//! Each exercise has a closed set of phases forming one directed cycle that
//! starts and ends at `Rest`. `step` is the whole transition table: the
//! trackers only compute the boolean inputs.

use serde::Serialize;

use crate::exercise::Exercise;

/// Pull-up cycle: Rest → Flexed → Rest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PullupPhase {
    Rest,
    Flexed,
}

/// Inputs for one pull-up transition
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PullupSignals {
    /// Both elbows bent past the flex threshold with the chin over the bar
    pub flexed: bool,
    /// Both elbows past the extension threshold
    pub extended: bool,
}

impl PullupPhase {
    pub const ALL: [PullupPhase; 2] = [PullupPhase::Rest, PullupPhase::Flexed];

    pub fn step(self, signals: PullupSignals) -> Self {
        match self {
            PullupPhase::Rest if signals.flexed => PullupPhase::Flexed,
            PullupPhase::Rest => PullupPhase::Rest,
            PullupPhase::Flexed if signals.extended => PullupPhase::Rest,
            PullupPhase::Flexed => PullupPhase::Flexed,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PullupPhase::Rest => "REST",
            PullupPhase::Flexed => "FLEXED",
        }
    }
}

/// Jump cycle: Rest → Crouched → Exploding → Airborne → Landing → Rest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpPhase {
    Rest,
    Crouched,
    Exploding,
    Airborne,
    Landing,
}

/// Inputs for one jump transition
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JumpSignals {
    /// Knees bent past the crouch threshold for the required frames
    pub crouch_held: bool,
    /// Knees straightened past the standing threshold
    pub standing: bool,
    /// Detector fired a positive spike on the vertical displacement
    pub takeoff: bool,
    /// Ankles above baseline by more than the airborne margin
    pub above_margin: bool,
    /// Landing hold elapsed (or the subject stood up)
    pub settled: bool,
    /// No liftoff within the takeoff window
    pub timed_out: bool,
}

impl JumpPhase {
    pub const ALL: [JumpPhase; 5] = [
        JumpPhase::Rest,
        JumpPhase::Crouched,
        JumpPhase::Exploding,
        JumpPhase::Airborne,
        JumpPhase::Landing,
    ];

    /// Crouched and Exploding may fall back to Rest without completing a rep
    pub fn step(self, signals: JumpSignals) -> Self {
        match self {
            JumpPhase::Rest if signals.crouch_held => JumpPhase::Crouched,
            JumpPhase::Rest => JumpPhase::Rest,
            JumpPhase::Crouched if signals.takeoff => JumpPhase::Exploding,
            JumpPhase::Crouched if signals.standing => JumpPhase::Rest,
            JumpPhase::Crouched => JumpPhase::Crouched,
            JumpPhase::Exploding if signals.above_margin => JumpPhase::Airborne,
            JumpPhase::Exploding if signals.timed_out => JumpPhase::Rest,
            JumpPhase::Exploding => JumpPhase::Exploding,
            JumpPhase::Airborne if !signals.above_margin => JumpPhase::Landing,
            JumpPhase::Airborne => JumpPhase::Airborne,
            JumpPhase::Landing if signals.settled => JumpPhase::Rest,
            JumpPhase::Landing => JumpPhase::Landing,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            JumpPhase::Rest => "REST",
            JumpPhase::Crouched => "CROUCHED",
            JumpPhase::Exploding => "EXPLODING",
            JumpPhase::Airborne => "AIRBORNE",
            JumpPhase::Landing => "LANDING",
        }
    }
}

/// Phase of whichever exercise the session tracks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RepPhase {
    Pullup(PullupPhase),
    Jump(JumpPhase),
}

impl RepPhase {
    /// Rest phase of the given exercise
    pub fn rest(exercise: Exercise) -> Self {
        match exercise {
            Exercise::Pullup => PullupPhase::Rest.into(),
            Exercise::Jump => JumpPhase::Rest.into(),
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(
            self,
            RepPhase::Pullup(PullupPhase::Rest) | RepPhase::Jump(JumpPhase::Rest)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            RepPhase::Pullup(phase) => phase.name(),
            RepPhase::Jump(phase) => phase.name(),
        }
    }
}

impl From<PullupPhase> for RepPhase {
    fn from(phase: PullupPhase) -> Self {
        RepPhase::Pullup(phase)
    }
}

impl From<JumpPhase> for RepPhase {
    fn from(phase: JumpPhase) -> Self {
        RepPhase::Jump(phase)
    }
}
