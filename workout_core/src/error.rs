//! Error types for the workout_core library.

use std::fmt;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for workout_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Transport error talking to the backend
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Plan file is not valid JSON or has the wrong top-level shape
    #[error("Format error: {0}")]
    Format(String),

    /// A single schema violation
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Batch validation failed; every collected violation is carried
    #[error("Plan validation failed with {} error(s)", .0.len())]
    InvalidPlan(Vec<SchemaError>),

    /// Remote client rejected an operation
    #[error("Client error: {0}")]
    Client(String),
}

/// A schema violation found by the validator.
///
/// Always names the workout; step-scoped violations also carry the 1-based
/// step index.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaError {
    pub workout: String,
    pub step: Option<usize>,
    pub message: String,
}

impl SchemaError {
    pub fn workout(workout: &str, message: impl Into<String>) -> Self {
        Self {
            workout: workout.to_string(),
            step: None,
            message: message.into(),
        }
    }

    pub fn step(workout: &str, step: usize, message: impl Into<String>) -> Self {
        Self {
            workout: workout.to_string(),
            step: Some(step),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step {
            Some(step) => write!(
                f,
                "workout \"{}\", step {}: {}",
                self.workout, step, self.message
            ),
            None => write!(f, "workout \"{}\": {}", self.workout, self.message),
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display_names_step() {
        let err = SchemaError::step("Chest Day", 3, "targetType is required");
        assert_eq!(
            err.to_string(),
            "workout \"Chest Day\", step 3: targetType is required"
        );
    }

    #[test]
    fn test_invalid_plan_counts_errors() {
        let err = Error::InvalidPlan(vec![
            SchemaError::workout("A", "workoutName is required"),
            SchemaError::step("B", 1, "stepType is required"),
        ]);
        assert_eq!(err.to_string(), "Plan validation failed with 2 error(s)");
    }
}
