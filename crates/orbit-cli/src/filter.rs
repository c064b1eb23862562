//! The filter run: text in, outcome JSON out.

use std::io::{Read, Write};

use orbit_core::record::CharacterRecord;
use orbit_directives::{DirectiveExtractor, NarrationValidator, PathPolicy, ValidationOutcome};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppError;

/// Loads the configured policy, or the standard one.
///
/// # Errors
///
/// Returns `AppError::Policy` if the configured file cannot be loaded.
pub fn load_policy(config: &Config) -> Result<PathPolicy, AppError> {
    match &config.policy_path {
        Some(path) => {
            debug!(path = %path.display(), "loading policy file");
            Ok(PathPolicy::from_yaml_path(path)?)
        }
        None => Ok(PathPolicy::standard()),
    }
}

/// Loads the configured character record, if any.
///
/// # Errors
///
/// Returns `AppError::Io` if the file cannot be read, `AppError::Json` if it
/// is not JSON, and `AppError::State` if it is not an object.
pub fn load_state(config: &Config) -> Result<Option<CharacterRecord>, AppError> {
    let Some(path) = &config.state_path else {
        return Ok(None);
    };
    debug!(path = %path.display(), "loading character record");
    let raw = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    Ok(Some(CharacterRecord::from_value(value)?))
}

/// Reads all of `input`, validates it, and writes the outcome to `output`
/// as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if loading configuration files, reading input or writing
/// output fails. Directive problems are reported inside the outcome.
pub fn run<R, W>(
    config: &Config,
    input: &mut R,
    output: &mut W,
) -> Result<ValidationOutcome, AppError>
where
    R: Read,
    W: Write,
{
    let validator = NarrationValidator::new(DirectiveExtractor::standard(), load_policy(config)?);
    let state = load_state(config)?;

    let mut text = String::new();
    input.read_to_string(&mut text)?;

    let outcome = validator.validate(&text, state.as_ref());

    for warning in &outcome.warnings {
        warn!(%warning, "directive clamped");
    }
    for error in &outcome.errors {
        warn!(%error, "directive rejected");
    }
    info!(
        ok = outcome.ok,
        directives = outcome.raw_directives.len(),
        increments = outcome.increment_ops.len(),
        sets = outcome.set_ops.len(),
        "narration filtered"
    );

    serde_json::to_writer_pretty(&mut *output, &outcome)?;
    writeln!(output)?;

    Ok(outcome)
}
