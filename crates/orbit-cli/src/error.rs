//! Silent Orbit — filter error types.

use orbit_core::record::RecordError;
use orbit_directives::PolicyError;
use thiserror::Error;

/// Startup and runtime errors for the filter.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable holds an unusable value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading input or writing output failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The policy file is missing or invalid.
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    /// The state file or the outcome could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The state file is valid JSON but not a character record.
    #[error("state error: {0}")]
    State(#[from] RecordError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_is_reported_as_state_error() {
        let err = AppError::from(RecordError::NotAnObject);
        assert_eq!(
            err.to_string(),
            "state error: character record must be a JSON object"
        );
    }
}
