//! Environment configuration, read once at start.

use std::path::PathBuf;

use crate::error::AppError;

/// Variable naming an optional YAML policy file.
pub const POLICY_PATH_VAR: &str = "ORBIT_POLICY_PATH";
/// Variable naming an optional JSON character record.
pub const STATE_PATH_VAR: &str = "ORBIT_STATE_PATH";
/// Variable selecting the log format.
pub const LOG_FORMAT_VAR: &str = "ORBIT_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

/// Filter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Policy file; the standard policy is used when absent.
    pub policy_path: Option<PathBuf>,
    /// Character record to clamp against; no clamping when absent.
    pub state_path: Option<PathBuf>,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `ORBIT_LOG_FORMAT` is not `json` or
    /// `pretty`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// As [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let log_format = match read(LOG_FORMAT_VAR).as_deref().map(str::trim) {
            None | Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "{LOG_FORMAT_VAR} must be 'json' or 'pretty', got '{other}'"
                )));
            }
        };

        Ok(Self {
            policy_path: read(POLICY_PATH_VAR).map(PathBuf::from),
            state_path: read(STATE_PATH_VAR).map(PathBuf::from),
            log_format,
        })
    }
}
