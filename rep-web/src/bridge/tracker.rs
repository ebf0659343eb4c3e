//! Rep tracker - the object JavaScript drives once per video frame
//!
//! Owns one session and its calibration state. There are no globals: the
//! host creates one `RepTracker` per subject and exercise and keeps it.

use wasm_bindgen::prelude::*;

use crate::calibration::CalibrationState;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::pose::PoseFrame;
use crate::reps::RepEvent;
use crate::session::RepSession;

impl From<SessionError> for JsValue {
    fn from(err: SessionError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[wasm_bindgen]
pub struct RepTracker {
    session: RepSession,
    calibration: CalibrationState,
    last_rep: Option<RepEvent>,
}

#[wasm_bindgen]
impl RepTracker {
    /// `exercise` is a selector such as "pullups" or "jumps". `config_json`
    /// may be a partial settings document; missing fields use defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(exercise: &str, config_json: Option<String>) -> Result<RepTracker, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) => SessionConfig::from_json(json)?,
            None => SessionConfig::default(),
        };
        let session = RepSession::from_selector(exercise, config)?;
        console_log!("Rep tracker ready for {}", session.exercise());

        Ok(Self {
            session,
            calibration: CalibrationState::new(),
            last_rep: None,
        })
    }

    /// Process one frame of landmarks (flat Float32Array of 33 × [x, y, z, visibility]).
    /// Returns the frame result as JSON.
    ///
    /// A malformed array is treated as a frame where nobody is visible, so
    /// the current phase is held.
    pub fn process(&mut self, data: &[f32], timestamp_ms: f64) -> Result<String, JsValue> {
        let frame = PoseFrame::from_flat(data, timestamp_ms).unwrap_or_else(|| {
            web_sys::console::warn_1(
                &format!("Expected 132 landmark values, got {}", data.len()).into(),
            );
            PoseFrame::empty(timestamp_ms)
        });

        let result = self.session.process_frame(&frame, &mut self.calibration);
        if let Some(rep) = &result.rep {
            console_log!("Rep {} scored {}", rep.rep_number, rep.score);
            self.last_rep = Some(rep.clone());
        }

        Ok(serde_json::to_string(&result).map_err(SessionError::from)?)
    }

    /// Drop the baseline; the next frames recalibrate
    pub fn reset_calibration(&mut self) {
        self.calibration.reset();
        console_log!("Calibration reset");
    }

    /// Start over: new calibration, zero reps
    pub fn reset(&mut self) {
        self.calibration.reset();
        self.session.reset();
        self.last_rep = None;
    }

    #[wasm_bindgen(getter)]
    pub fn exercise(&self) -> String {
        self.session.exercise().name().to_string()
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_complete()
    }

    pub fn phase(&self) -> String {
        self.session.phase().name().to_string()
    }

    pub fn rep_count(&self) -> u32 {
        self.session.stats().reps
    }

    /// Calibration state as JSON, for persisting across page loads
    pub fn calibration_json(&self) -> Result<String, JsValue> {
        Ok(self.calibration.to_json()?)
    }

    /// Load a state saved with `calibration_json`. The current rep attempt
    /// is dropped since it was measured against the old baseline.
    pub fn restore_calibration(&mut self, json: &str) -> Result<(), JsValue> {
        self.calibration = CalibrationState::from_json(json)?;
        self.session.reset_tracker();
        console_log!("Calibration restored");
        Ok(())
    }

    /// Session totals as JSON (what the leaderboard submission needs)
    pub fn stats_json(&self) -> Result<String, JsValue> {
        Ok(serde_json::to_string(self.session.stats()).map_err(SessionError::from)?)
    }

    /// Payload for the AI-analysis call of the latest rep
    pub fn last_rep_analysis(&self) -> Option<String> {
        self.last_rep
            .as_ref()
            .map(|rep| rep.analysis_payload().to_string())
    }
}

/// Full default settings document, for the host's settings panel
#[wasm_bindgen]
pub fn default_config_json() -> Result<String, JsValue> {
    Ok(SessionConfig::default().to_json()?)
}
