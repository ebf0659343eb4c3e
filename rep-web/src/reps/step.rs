//! Output of one tracker frame

use crate::feedback::Cue;

/// What a tracker did with one frame
#[derive(Clone, Debug, PartialEq)]
pub struct TrackerStep<P, M> {
    /// New phase, only when it changed this frame
    pub transition: Option<P>,
    /// Most relevant coaching condition this frame
    pub cue: Option<Cue>,
    /// Measurements of the rep this frame completed
    pub completed: Option<M>,
}

impl<P, M> TrackerStep<P, M> {
    /// No transition, no completion
    pub fn hold(cue: Option<Cue>) -> Self {
        Self {
            transition: None,
            cue,
            completed: None,
        }
    }
}
