//! Exercise selector

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Supported movements
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exercise {
    Pullup,
    Jump,
}

impl Exercise {
    pub fn name(&self) -> &'static str {
        match self {
            Exercise::Pullup => "pullups",
            Exercise::Jump => "jumps",
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Exercise {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pullup" | "pullups" | "pull-up" | "pull-ups" | "pull_ups" => Ok(Exercise::Pullup),
            "jump" | "jumps" | "vertical_jump" | "vertical-jump" => Ok(Exercise::Jump),
            _ => Err(SessionError::unknown_exercise(s)),
        }
    }
}
