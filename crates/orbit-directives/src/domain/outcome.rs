//! Pipeline results.

use orbit_core::mutation::{IncrementOps, Mutation, SetOps};
use serde::Serialize;

use super::directive::Directive;
use super::errors::{ClampWarning, DirectiveError};

/// What validating a single directive produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectiveOps {
    /// Accepted increments, summed per path and clamped when state was given.
    pub increments: IncrementOps,
    /// Accepted sets, last write per path.
    pub sets: SetOps,
    /// Rejected keys.
    pub errors: Vec<DirectiveError>,
    /// Clamped increments.
    pub warnings: Vec<ClampWarning>,
}

/// The packaged result of validating one narrator text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationOutcome {
    /// True iff `errors` is empty.
    pub ok: bool,
    /// The text with every directive block removed, trimmed.
    pub cleaned_text: String,
    /// Merged increments across all directives.
    pub increment_ops: IncrementOps,
    /// Merged sets across all directives.
    pub set_ops: SetOps,
    /// Extraction errors first, then validation errors in directive order.
    pub errors: Vec<DirectiveError>,
    /// Clamp warnings in directive order.
    pub warnings: Vec<ClampWarning>,
    /// Every directive that parsed, in extraction order.
    pub raw_directives: Vec<Directive>,
}

impl ValidationOutcome {
    /// Packages the pieces, deriving `ok` from `errors`.
    #[must_use]
    pub fn assemble(
        cleaned_text: String,
        merged: DirectiveOps,
        raw_directives: Vec<Directive>,
    ) -> Self {
        Self {
            ok: merged.errors.is_empty(),
            cleaned_text,
            increment_ops: merged.increments,
            set_ops: merged.sets,
            errors: merged.errors,
            warnings: merged.warnings,
            raw_directives,
        }
    }

    /// The merged operations as a record mutation.
    #[must_use]
    pub fn mutation(&self) -> Mutation {
        Mutation {
            increments: self.increment_ops.clone(),
            sets: self.set_ops.clone(),
        }
    }

    /// Error messages, in order.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Warning messages, in order.
    #[must_use]
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}
