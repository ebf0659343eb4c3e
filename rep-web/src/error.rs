//! Session setup errors
//!
//! Only structural misconfiguration is an error. Bad frames never are.

use thiserror::Error;

/// Errors raised while building a [`crate::session::RepSession`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// Exercise selector did not match any supported movement.
    #[error("unknown exercise: {0}")]
    UnknownExercise(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration or saved calibration JSON could not be parsed.
    #[error("JSON parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl SessionError {
    /// Creates an unknown exercise error.
    #[must_use]
    pub fn unknown_exercise(selector: impl Into<String>) -> Self {
        Self::UnknownExercise(selector.into())
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

/// Result type for session setup.
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_exercise_message() {
        let err = SessionError::unknown_exercise("burpees");
        assert!(err.to_string().contains("unknown exercise"));
        assert!(err.to_string().contains("burpees"));
    }

    #[test]
    fn test_invalid_config_message() {
        let err = SessionError::invalid_config("lag must be at least 2");
        assert!(err.to_string().contains("invalid configuration"));
    }

    #[test]
    fn test_parse_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: SessionError = parse.into();
        assert!(matches!(err, SessionError::ConfigParse(_)));
    }
}
