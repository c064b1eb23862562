//! Shared helpers for filter integration tests.
#![allow(dead_code)]

use std::io::Write;

use orbit_cli::config::Config;
use orbit_cli::error::AppError;
use orbit_cli::filter;
use orbit_directives::ValidationOutcome;
use orbit_test_support::starter_record;
use tempfile::NamedTempFile;

/// Writes `contents` to a fresh temporary file.
pub fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// A temporary file holding the starter character record.
pub fn starter_state_file() -> NamedTempFile {
    temp_file(&starter_record().to_value().to_string())
}

/// Runs the filter over `text`, returning the outcome and the printed JSON.
pub fn run_filter(
    config: &Config,
    text: &str,
) -> Result<(ValidationOutcome, serde_json::Value), AppError> {
    let mut output = Vec::new();
    let outcome = filter::run(config, &mut text.as_bytes(), &mut output)?;
    let printed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    Ok((outcome, printed))
}
