//! Core error types for podomoro-core.
//!
//! The timer engine itself never fails; invalid durations degrade to zero
//! minutes instead. These errors cover configuration files, habit intents and
//! textual parsing of user-facing values.

use std::path::PathBuf;
use thiserror::Error;

use crate::habit::HabitId;

/// Core error type for podomoro-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Habit names must contain something besides whitespace
    #[error("Habit name must not be blank")]
    BlankHabitName,

    /// Intent referenced a habit that is not in the store
    #[error("No habit with id {0}")]
    UnknownHabit(HabitId),

    /// Text did not name a timer mode
    #[error("Unknown timer mode '{0}' (expected fifty-ten, thirty-five or custom)")]
    UnknownMode(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_lift_into_core_error() {
        let err: CoreError = ValidationError::UnknownHabit(HabitId(7)).into();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::UnknownHabit(HabitId(7)))
        ));
        assert_eq!(err.to_string(), "Validation error: No habit with id 7");
    }

    #[test]
    fn config_errors_name_the_key() {
        let err: CoreError = ConfigError::UnknownKey("timer.nope".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown configuration key: timer.nope"
        );
    }
}
