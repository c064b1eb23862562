//! The combined mutation a narration produces for one character record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Dot-path keyed additive numeric updates.
pub type IncrementOps = BTreeMap<String, f64>;

/// Dot-path keyed absolute replacements.
pub type SetOps = BTreeMap<String, serde_json::Value>;

/// Increments and sets to apply to a record in one step.
///
/// A path never appears in both maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    /// Additive updates (`$inc`-style).
    #[serde(default)]
    pub increments: IncrementOps,
    /// Absolute replacements (`$set`-style).
    #[serde(default)]
    pub sets: SetOps,
}

impl Mutation {
    /// Returns true if applying this mutation would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.increments.is_empty() && self.sets.is_empty()
    }

    /// Total number of touched paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.increments.len() + self.sets.len()
    }
}
