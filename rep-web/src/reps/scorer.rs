//! Rep scorer - fixed deduction rules plus bucketed sub-scores
//!
//! Every rule is evaluated on its own; penalties are summed and the total is
//! clamped to 0-100. Sub-scores are separate lookups on the same inputs, not
//! derived from the composite.

use super::event::{RepDetail, RepEvent, RepIssue};
use crate::config::ScoringConfig;

/// (upper bound, score): first bound the value stays under wins
const LANDING_BUCKETS: [(f32, u8); 4] = [(100.0, 100), (120.0, 85), (140.0, 70), (160.0, 50)];
const SYMMETRY_BUCKETS: [(f32, u8); 4] = [(5.0, 100), (10.0, 80), (15.0, 60), (25.0, 40)];

/// (lower bound, score): first bound the value reaches wins
const RANGE_BUCKETS: [(f32, u8); 3] = [(80.0, 100), (60.0, 75), (40.0, 50)];
const POWER_BUCKETS: [(f32, u8); 3] = [(0.15, 100), (0.10, 80), (0.05, 60)];

/// Geometry accumulated over one pull-up cycle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PullupMeasurements {
    pub peak_flexion: f32,
    pub bottom_extension: f32,
    pub asymmetry: f32,
    pub shoulder_rise: f32,
}

/// Geometry accumulated over one jump cycle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpMeasurements {
    pub height: f32,
    pub landing_knee_angle: f32,
    pub landing_asymmetry: f32,
    pub ankle_offset: f32,
    pub crouch_depth: f32,
    pub takeoff_extension: f32,
}

/// Score, issues and detail of a rep that has not been numbered yet
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredRep {
    pub score: u8,
    pub issues: Vec<RepIssue>,
    pub detail: RepDetail,
}

impl ScoredRep {
    pub fn into_event(self, timestamp_ms: f64, rep_number: u32) -> RepEvent {
        RepEvent {
            timestamp_ms,
            rep_number,
            score: self.score,
            issues: self.issues,
            detail: self.detail,
        }
    }
}

pub fn score_pullup(m: &PullupMeasurements, config: &ScoringConfig) -> ScoredRep {
    let mut deductions = Vec::with_capacity(3);
    if m.asymmetry > config.asymmetry_tolerance {
        deductions.push((RepIssue::Asymmetry, config.asymmetry_penalty));
    }
    if m.peak_flexion > config.full_flexion_angle {
        deductions.push((RepIssue::PartialTopRom, config.partial_rom_penalty));
    }
    if m.bottom_extension < config.full_extension_angle {
        deductions.push((RepIssue::PartialBottomRom, config.partial_rom_penalty));
    }

    let (score, issues) = composite(&deductions);
    ScoredRep {
        score,
        issues,
        detail: RepDetail::Pullup {
            peak_flexion: m.peak_flexion,
            bottom_extension: m.bottom_extension,
            asymmetry: m.asymmetry,
            shoulder_rise: m.shoulder_rise,
            range_score: range_score(m.bottom_extension - m.peak_flexion),
            symmetry_score: symmetry_score(m.asymmetry),
        },
    }
}

pub fn score_jump(m: &JumpMeasurements, config: &ScoringConfig) -> ScoredRep {
    let mut deductions = Vec::with_capacity(5);
    if m.landing_asymmetry > config.asymmetry_tolerance {
        deductions.push((RepIssue::Asymmetry, config.asymmetry_penalty));
    }
    if m.takeoff_extension < config.takeoff_extension_angle {
        deductions.push((RepIssue::PartialTopRom, config.partial_rom_penalty));
    }
    if m.crouch_depth > config.deep_crouch_angle {
        deductions.push((RepIssue::PartialBottomRom, config.partial_rom_penalty));
    }
    if m.landing_knee_angle > config.stiff_landing_angle {
        deductions.push((RepIssue::StiffLanding, config.stiff_landing_penalty));
    }
    if m.height < config.min_jump_height {
        deductions.push((RepIssue::LowJump, config.low_jump_penalty));
    }

    let (score, issues) = composite(&deductions);
    ScoredRep {
        score,
        issues,
        detail: RepDetail::Jump {
            height: m.height,
            landing_knee_angle: m.landing_knee_angle,
            landing_asymmetry: m.landing_asymmetry,
            ankle_offset: m.ankle_offset,
            crouch_depth: m.crouch_depth,
            takeoff_extension: m.takeoff_extension,
            landing_score: landing_score(m.landing_knee_angle),
            power_score: power_score(m.height),
        },
    }
}

/// Sum penalties, clamp, never return an empty explanation
fn composite(deductions: &[(RepIssue, u32)]) -> (u8, Vec<RepIssue>) {
    let penalty: u64 = deductions.iter().map(|&(_, p)| u64::from(p)).sum();
    let score = 100u64.saturating_sub(penalty) as u8;

    let mut issues: Vec<RepIssue> = deductions.iter().map(|&(issue, _)| issue).collect();
    if issues.is_empty() {
        issues.push(RepIssue::NoIssues);
    }
    (score, issues)
}

fn bucket_at_most(value: f32, buckets: &[(f32, u8)], fallback: u8) -> u8 {
    buckets
        .iter()
        .find(|&&(bound, _)| value <= bound)
        .map_or(fallback, |&(_, score)| score)
}

fn bucket_at_least(value: f32, buckets: &[(f32, u8)], fallback: u8) -> u8 {
    buckets
        .iter()
        .find(|&&(bound, _)| value >= bound)
        .map_or(fallback, |&(_, score)| score)
}

/// Deeper (smaller) landing knee angle absorbs more impact
pub fn landing_score(knee_angle: f32) -> u8 {
    bucket_at_most(knee_angle, &LANDING_BUCKETS, 25)
}

pub fn power_score(height: f32) -> u8 {
    bucket_at_least(height, &POWER_BUCKETS, 30)
}

/// Degrees travelled between dead hang and peak flexion
pub fn range_score(range_of_motion: f32) -> u8 {
    bucket_at_least(range_of_motion, &RANGE_BUCKETS, 25)
}

pub fn symmetry_score(asymmetry: f32) -> u8 {
    bucket_at_most(asymmetry, &SYMMETRY_BUCKETS, 20)
}
