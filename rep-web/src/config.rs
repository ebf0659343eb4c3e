//! Session configuration
//!
//! Every threshold the pipeline uses lives here. The host may pass a partial
//! JSON document; missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

/// Landmark confidence minima
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Minimum confidence while tracking reps
    pub tracking: f32,
    /// Minimum confidence while calibrating (stricter)
    pub calibration: f32,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            tracking: 0.5,
            calibration: 0.7,
        }
    }
}

/// Smoothed z-score detector parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Window length of the filtered series
    pub lag: usize,
    /// Z-score needed to flag a sample
    pub threshold: f32,
    /// Weight of a flagged sample in the filtered series (0-1)
    pub influence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            lag: 10,
            threshold: 3.0,
            influence: 0.1,
        }
    }
}

/// Stability gate for baseline capture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Contiguous qualifying frames needed (~1s at 30fps)
    pub stable_frames: u32,
    /// Jumps: average knee angle must exceed this (degrees)
    pub min_leg_extension: f32,
    /// Jumps: ankle separation must be at least this × shoulder separation
    pub stance_ratio: f32,
    /// Pull-ups: both elbows must exceed this during the dead hang (degrees)
    pub min_arm_extension: f32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            stable_frames: 30,
            min_leg_extension: 160.0,
            stance_ratio: 0.7,
            min_arm_extension: 150.0,
        }
    }
}

/// Pull-up phase thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullupConfig {
    /// Both elbows below this to count as flexed (degrees)
    pub flex_angle: f32,
    /// Both elbows above this to count as extended (degrees)
    pub extend_angle: f32,
    /// How far below the wrist line the chin may sit and still count as over the bar
    pub bar_clearance: f32,
}

impl Default for PullupConfig {
    fn default() -> Self {
        Self {
            flex_angle: 100.0,
            extend_angle: 150.0,
            bar_clearance: 0.02,
        }
    }
}

/// Jump phase thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Average knee angle below this counts as crouching (degrees)
    pub crouch_angle: f32,
    /// Consecutive crouching frames before the crouch is accepted
    pub crouch_hold_frames: u32,
    /// Average knee angle above this counts as standing (degrees)
    pub stand_angle: f32,
    /// Ankle rise above baseline that counts as airborne (native units)
    pub airborne_margin: f32,
    /// Frames spent in Landing before returning to Rest
    pub landing_hold_frames: u32,
    /// Frames allowed between takeoff and leaving the ground
    pub takeoff_timeout_frames: u32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            crouch_angle: 120.0,
            crouch_hold_frames: 3,
            stand_angle: 160.0,
            airborne_margin: 0.03,
            landing_hold_frames: 10,
            takeoff_timeout_frames: 15,
        }
    }
}

/// Deduction rules for the rep scorer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub asymmetry_tolerance: f32,
    pub asymmetry_penalty: u32,
    pub partial_rom_penalty: u32,
    /// Pull-up peak flexion must reach this (degrees)
    pub full_flexion_angle: f32,
    /// Pull-up bottom extension must reach this (degrees)
    pub full_extension_angle: f32,
    /// Jump crouch must bend the knees at least this far (degrees)
    pub deep_crouch_angle: f32,
    /// Jump knees must straighten past this in the air (degrees)
    pub takeoff_extension_angle: f32,
    pub stiff_landing_angle: f32,
    pub stiff_landing_penalty: u32,
    /// Native units, same as the ankle baseline
    pub min_jump_height: f32,
    pub low_jump_penalty: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            asymmetry_tolerance: 15.0,
            asymmetry_penalty: 15,
            partial_rom_penalty: 10,
            full_flexion_angle: 90.0,
            full_extension_angle: 160.0,
            deep_crouch_angle: 100.0,
            takeoff_extension_angle: 160.0,
            stiff_landing_angle: 160.0,
            stiff_landing_penalty: 20,
            min_jump_height: 0.05,
            low_jump_penalty: 10,
        }
    }
}

/// Coaching phrase throttling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Minimum frames between two phrases (~1.5s at 30fps)
    pub cooldown_frames: u32,
    /// Seed for phrase rotation
    pub seed: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            cooldown_frames: 45,
            seed: 0x5EED,
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub confidence: ConfidenceConfig,
    pub detector: DetectorConfig,
    pub calibration: CalibrationConfig,
    pub pullup: PullupConfig,
    pub jump: JumpConfig,
    pub scoring: ScoringConfig,
    pub feedback: FeedbackConfig,
}

impl SessionConfig {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON (for the host's settings panel)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let check_unit = |name: &str, value: f32| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(SessionError::invalid_config(format!(
                    "{name} must be within [0, 1], got {value}"
                )))
            }
        };
        let check_positive = |name: &str, value: f32| {
            if value > 0.0 {
                Ok(())
            } else {
                Err(SessionError::invalid_config(format!(
                    "{name} must be positive, got {value}"
                )))
            }
        };
        let check_frames = |name: &str, value: u32| {
            if value > 0 {
                Ok(())
            } else {
                Err(SessionError::invalid_config(format!("{name} must be at least 1")))
            }
        };

        check_unit("confidence.tracking", self.confidence.tracking)?;
        check_unit("confidence.calibration", self.confidence.calibration)?;

        if self.detector.lag < 2 {
            return Err(SessionError::invalid_config(format!(
                "detector.lag must be at least 2, got {}",
                self.detector.lag
            )));
        }
        check_positive("detector.threshold", self.detector.threshold)?;
        check_unit("detector.influence", self.detector.influence)?;

        check_frames("calibration.stable_frames", self.calibration.stable_frames)?;
        check_positive("calibration.stance_ratio", self.calibration.stance_ratio)?;

        if self.pullup.flex_angle >= self.pullup.extend_angle {
            return Err(SessionError::invalid_config(
                "pullup.flex_angle must be below pullup.extend_angle",
            ));
        }
        if self.jump.crouch_angle >= self.jump.stand_angle {
            return Err(SessionError::invalid_config(
                "jump.crouch_angle must be below jump.stand_angle",
            ));
        }
        check_positive("jump.airborne_margin", self.jump.airborne_margin)?;
        check_frames("jump.crouch_hold_frames", self.jump.crouch_hold_frames)?;
        check_frames("jump.landing_hold_frames", self.jump.landing_hold_frames)?;
        check_frames("jump.takeoff_timeout_frames", self.jump.takeoff_timeout_frames)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SessionConfig::from_json(r#"{ "detector": { "lag": 20 } }"#).unwrap();
        assert_eq!(config.detector.lag, 20);
        assert_eq!(config.detector.threshold, DetectorConfig::default().threshold);
        assert_eq!(config.jump, JumpConfig::default());
    }

    #[test]
    fn test_rejects_bad_influence() {
        let err = SessionConfig::from_json(r#"{ "detector": { "influence": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_short_lag() {
        let mut config = SessionConfig::default();
        config.detector.lag = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_pullup_thresholds() {
        let mut config = SessionConfig::default();
        config.pullup.flex_angle = 160.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = SessionConfig::from_json("{ detector: ").unwrap_err();
        assert!(matches!(err, SessionError::ConfigParse(_)));
    }

    #[test]
    fn test_json_round_trip_preserves_values() {
        let mut config = SessionConfig::default();
        config.feedback.cooldown_frames = 10;
        let json = config.to_json().unwrap();
        assert_eq!(SessionConfig::from_json(&json).unwrap(), config);
    }
}
