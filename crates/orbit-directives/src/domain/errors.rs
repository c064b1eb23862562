//! Findings produced by the pipeline.
//!
//! None of these abort processing. A `DirectiveError` drops one block or one
//! key; a `ClampWarning` records a corrected increment.

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// A rejected block or key.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DirectiveError {
    /// The block payload is not valid JSON.
    #[error("invalid JSON in update block: {0}")]
    MalformedBlock(String),

    /// The block payload is valid JSON but not an object.
    #[error("update block must be a JSON object: {0}")]
    NotAnObject(String),

    /// A numeric value targets a path outside the increment table.
    #[error("increment path not allowed: {0}")]
    IncrementPathNotAllowed(String),

    /// A numeric value falls outside the path's delta range.
    #[error("increment delta out of range for {path}: {delta} (allowed {min}..{max})")]
    DeltaOutOfRange {
        /// The rejected path.
        path: String,
        /// The proposed delta.
        delta: f64,
        /// Lowest allowed delta.
        min: f64,
        /// Highest allowed delta.
        max: f64,
    },

    /// A non-numeric value targets a path outside the set table.
    #[error("set path not allowed: {0}")]
    SetPathNotAllowed(String),

    /// A set value has the wrong type for its path.
    #[error("{path} must be a {expected}, got {found}")]
    TypeMismatch {
        /// The rejected path.
        path: String,
        /// The required kind.
        expected: &'static str,
        /// The kind that was supplied.
        found: &'static str,
    },
}

impl Serialize for DirectiveError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Which edge of an absolute range an increment was pulled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampEdge {
    /// The range minimum.
    Floor,
    /// The range maximum.
    Ceiling,
}

impl fmt::Display for ClampEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Floor => f.write_str("floor"),
            Self::Ceiling => f.write_str("ceiling"),
        }
    }
}

/// An increment that was shrunk to keep the field inside its absolute range.
#[derive(Debug, Clone, PartialEq)]
pub struct ClampWarning {
    /// The clamped path.
    pub path: String,
    /// Which edge was hit.
    pub edge: ClampEdge,
    /// The edge value the field now lands on.
    pub bound: f64,
    /// The increment as requested.
    pub requested: f64,
    /// The increment after clamping.
    pub applied: f64,
}

impl fmt::Display for ClampWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "clamped {} to {} {:?} (requested {:?}, applied {:?})",
            self.path, self.edge, self.bound, self.requested, self.applied
        )
    }
}

impl Serialize for ClampWarning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
