//! Whole-text validation: extract, check, clamp and merge.

use orbit_core::record::CharacterRecord;
use tracing::debug;

use super::clamper::clamp_increments;
use super::extractor::DirectiveExtractor;
use super::validator::check_entries;
use crate::domain::outcome::{DirectiveOps, ValidationOutcome};
use crate::domain::policy::PathPolicy;

/// Runs the full pipeline with a fixed extractor and policy.
#[derive(Debug, Clone)]
pub struct NarrationValidator {
    extractor: DirectiveExtractor,
    policy: PathPolicy,
}

impl Default for NarrationValidator {
    fn default() -> Self {
        Self::new(DirectiveExtractor::standard(), PathPolicy::standard())
    }
}

impl NarrationValidator {
    /// Creates a validator.
    #[must_use]
    pub fn new(extractor: DirectiveExtractor, policy: PathPolicy) -> Self {
        Self { extractor, policy }
    }

    /// The policy this validator checks against.
    #[must_use]
    pub fn policy(&self) -> &PathPolicy {
        &self.policy
    }

    /// Validates every directive in `text` and merges the results.
    ///
    /// Increments to the same path are summed across directives and sets
    /// keep the last write. With `current`, each directive is clamped
    /// against the current value plus what earlier directives already
    /// added, so the merged increment respects the absolute range.
    #[must_use]
    pub fn validate(&self, text: &str, current: Option<&CharacterRecord>) -> ValidationOutcome {
        let extraction = self.extractor.extract(text);

        let mut merged = DirectiveOps {
            errors: extraction.errors,
            ..DirectiveOps::default()
        };

        for directive in &extraction.directives {
            let mut ops = check_entries(directive, &self.policy);

            if let Some(record) = current {
                let earlier = &merged.increments;
                ops.warnings = clamp_increments(&mut ops.increments, &self.policy, |path| {
                    record
                        .number_at(path)
                        .map(|value| value + earlier.get(path).copied().unwrap_or(0.0))
                });
            }

            for (path, delta) in ops.increments {
                *merged.increments.entry(path).or_insert(0.0) += delta;
            }
            merged.sets.extend(ops.sets);
            merged.errors.extend(ops.errors);
            merged.warnings.extend(ops.warnings);
        }

        debug!(
            directives = extraction.directives.len(),
            increments = merged.increments.len(),
            sets = merged.sets.len(),
            errors = merged.errors.len(),
            warnings = merged.warnings.len(),
            "narration validated"
        );

        ValidationOutcome::assemble(extraction.cleaned_text, merged, extraction.directives)
    }
}

/// Validates `text` with the standard markers and the given policy.
#[must_use]
pub fn validate_narration(
    text: &str,
    policy: &PathPolicy,
    current: Option<&CharacterRecord>,
) -> ValidationOutcome {
    NarrationValidator::new(DirectiveExtractor::standard(), policy.clone()).validate(text, current)
}
