//! Rep Web - pull-up and vertical jump rep counting from pose landmarks
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - Console logging for the bridge
//! - wasm_bindgen start hook
//!
//! The pipeline itself is plain Rust and runs natively as well: joint
//! angles, calibration, per-exercise phase trackers, the z-score takeoff
//! detector, scoring and coaching feedback.

use wasm_bindgen::prelude::*;

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => ($crate::log(&format_args!($($t)*).to_string()))
}

// ============================================================================
// MODULES
// ============================================================================

mod bridge;
pub mod calibration;
pub mod config;
pub mod error;
pub mod exercise;
pub mod feedback;
pub mod pose;
pub mod reps;
pub mod session;
pub mod signal;
pub mod stats;

#[cfg(test)]
mod testing;

pub use bridge::{default_config_json, RepTracker};
pub use calibration::{CalibrationState, CalibrationStatus};
pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use exercise::Exercise;
pub use pose::{Landmark, PoseFrame};
pub use reps::{RepEvent, RepIssue, RepPhase};
pub use session::{FrameResult, RepSession};
pub use stats::SessionStats;

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
