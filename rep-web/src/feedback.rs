//! Coaching phrases
//!
//! One cue per frame at most, mapped onto a small pool of phrases. Phrases
//! rotate pseudo-randomly so the voice collaborator does not repeat itself,
//! and a cooldown keeps it from talking every frame.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::calibration::StanceIssue;
use crate::config::FeedbackConfig;

/// Condition the coach wants to talk about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    NotVisible,
    StraightenLegs,
    WidenStance,
    ExtendArms,
    GripBar,
    HoldStill,
    Calibrated,
    PullHigher,
    EvenArms,
    Explode,
    FullRange,
    LandEvenly,
    SoftLanding,
    JumpHigher,
    GoodRep,
}

impl Cue {
    pub fn phrases(&self) -> &'static [&'static str] {
        match self {
            Cue::NotVisible => &[
                "Step into frame so I can see you",
                "I can't see you clearly, move back a little",
                "Make sure your whole body is visible",
            ],
            Cue::StraightenLegs => &["Stand tall with straight legs", "Lock your knees out"],
            Cue::WidenStance => &["Feet shoulder-width apart", "Widen your stance a little"],
            Cue::ExtendArms => &["Hang with straight arms", "Let your arms fully extend"],
            Cue::GripBar => &["Grab the bar with both hands", "Hands up on the bar"],
            Cue::HoldStill => &["Hold still...", "Stay steady, calibrating"],
            Cue::Calibrated => &["Calibrated! Let's go", "All set, start when ready"],
            Cue::PullHigher => &["Get your chin over the bar", "Pull higher!"],
            Cue::EvenArms => &["Pull evenly with both arms", "Keep both arms working together"],
            Cue::Explode => &["Now explode up!", "Drive through your feet!"],
            Cue::FullRange => &["Use the full range of motion", "All the way down, all the way up"],
            Cue::LandEvenly => &["Land on both feet evenly", "Keep your knees level on landing"],
            Cue::SoftLanding => &["Bend your knees when you land", "Land softer"],
            Cue::JumpHigher => &["Jump higher!", "More power from the legs"],
            Cue::GoodRep => &["Great rep!", "Nice and clean!", "Perfect form!"],
        }
    }
}

impl From<StanceIssue> for Cue {
    fn from(issue: StanceIssue) -> Self {
        match issue {
            StanceIssue::StraightenLegs => Cue::StraightenLegs,
            StanceIssue::WidenStance => Cue::WidenStance,
            StanceIssue::ExtendArms => Cue::ExtendArms,
            StanceIssue::GripBar => Cue::GripBar,
        }
    }
}

/// Picks and throttles phrases
#[derive(Clone, Debug)]
pub struct FeedbackPicker {
    rng: SmallRng,
    /// Minimum frames between phrases
    cooldown_frames: u32,
    /// Frames since the last phrase went out
    frames_since_last: u32,
    last_phrase: Option<&'static str>,
}

impl FeedbackPicker {
    pub fn new(config: &FeedbackConfig) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(config.seed),
            cooldown_frames: config.cooldown_frames,
            // First cue goes out immediately
            frames_since_last: config.cooldown_frames,
            last_phrase: None,
        }
    }

    /// Called once per frame. `urgent` cues (rep completed, calibration
    /// done) skip the cooldown.
    pub fn offer(&mut self, cue: Option<Cue>, urgent: bool) -> Option<&'static str> {
        self.frames_since_last = self.frames_since_last.saturating_add(1);

        let cue = cue?;
        if !urgent && self.frames_since_last < self.cooldown_frames {
            return None;
        }

        let pool = cue.phrases();
        let mut idx = self.rng.gen_range(0..pool.len());
        if pool.len() > 1 && self.last_phrase == Some(pool[idx]) {
            idx = (idx + 1) % pool.len();
        }

        self.last_phrase = Some(pool[idx]);
        self.frames_since_last = 0;
        Some(pool[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker(cooldown_frames: u32) -> FeedbackPicker {
        FeedbackPicker::new(&FeedbackConfig {
            cooldown_frames,
            seed: 7,
        })
    }

    #[test]
    fn test_first_cue_is_immediate() {
        let mut picker = picker(30);
        assert!(picker.offer(Some(Cue::HoldStill), false).is_some());
    }

    #[test]
    fn test_cooldown_throttles() {
        let mut picker = picker(10);
        assert!(picker.offer(Some(Cue::NotVisible), false).is_some());
        for _ in 0..9 {
            assert!(picker.offer(Some(Cue::NotVisible), false).is_none());
        }
        assert!(picker.offer(Some(Cue::NotVisible), false).is_some());
    }

    #[test]
    fn test_urgent_skips_cooldown() {
        let mut picker = picker(100);
        assert!(picker.offer(Some(Cue::PullHigher), false).is_some());
        assert!(picker.offer(Some(Cue::GoodRep), true).is_some());
    }

    #[test]
    fn test_no_cue_no_phrase() {
        let mut picker = picker(0);
        assert!(picker.offer(None, true).is_none());
    }

    #[test]
    fn test_never_repeats_back_to_back() {
        let mut picker = picker(0);
        let mut last = None;
        for _ in 0..50 {
            let phrase = picker.offer(Some(Cue::GoodRep), true);
            assert!(phrase.is_some());
            assert_ne!(phrase, last);
            last = phrase;
        }
    }

    #[test]
    fn test_phrase_comes_from_cue_pool() {
        let mut picker = picker(0);
        let phrase = picker.offer(Some(Cue::SoftLanding), false).unwrap();
        assert!(Cue::SoftLanding.phrases().contains(&phrase));
    }

    #[test]
    fn test_every_pool_non_empty() {
        for cue in [
            Cue::NotVisible,
            Cue::StraightenLegs,
            Cue::WidenStance,
            Cue::ExtendArms,
            Cue::GripBar,
            Cue::HoldStill,
            Cue::Calibrated,
            Cue::PullHigher,
            Cue::EvenArms,
            Cue::Explode,
            Cue::FullRange,
            Cue::LandEvenly,
            Cue::SoftLanding,
            Cue::JumpHigher,
            Cue::GoodRep,
        ] {
            assert!(!cue.phrases().is_empty());
        }
    }
}
