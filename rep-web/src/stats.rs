//! Running totals for one session
//!
//! Mirrors what the leaderboard collaborator publishes per user: rep count,
//! total score and best single score.

use serde::Serialize;

use crate::reps::RepEvent;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub reps: u32,
    pub total_score: u64,
    pub best_score: u8,
    /// Timestamp of the latest rep (ms)
    pub last_rep_ms: Option<f64>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number the event and fold it into the totals
    pub fn record(&mut self, event: &mut RepEvent) {
        self.reps += 1;
        event.rep_number = self.reps;
        self.total_score += u64::from(event.score);
        self.best_score = self.best_score.max(event.score);
        self.last_rep_ms = Some(event.timestamp_ms);
    }

    pub fn average_score(&self) -> Option<f32> {
        if self.reps == 0 {
            return None;
        }
        Some(self.total_score as f32 / self.reps as f32)
    }
}
