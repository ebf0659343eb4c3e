//! Pose module - landmarks, confidence gating and joint angles
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod confidence_gate;
mod frame;
mod landmarks;

pub use angles::joint_angle;
pub use confidence_gate::ConfidenceGate;
pub use frame::FrameAngles;
pub use landmarks::*;
