//! Signal module - adaptive spike detection on per-frame scalars
//!
//! Re-exports only. All logic in submodules.

mod detector;
mod ring_buffer;

pub use detector::{Verdict, ZScoreDetector};
pub use ring_buffer::RingBuffer;
