//! Path policy: which fields a narrator may touch, and by how much.
//!
//! A policy is plain immutable data. Build it once (the
//! [`PathPolicy::standard`] tables, the checked builders, or a YAML file) and
//! pass it by reference into the pipeline.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::directive::DirectiveValue;

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lowest allowed value.
    pub min: f64,
    /// Highest allowed value.
    pub max: f64,
}

impl Bounds {
    /// Creates bounds; callers are expected to pass `min <= max`.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies within the bounds, edges included.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Type constraint for a settable path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Must be a JSON string.
    Text,
    /// Any non-numeric JSON value.
    Any,
}

impl ValueKind {
    /// Returns true if `value` satisfies this constraint.
    #[must_use]
    pub fn accepts(self, value: &DirectiveValue) -> bool {
        match self {
            Self::Text => matches!(value, DirectiveValue::Text(_)),
            Self::Any => true,
        }
    }

    /// Name used in type mismatch messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Any => "value",
        }
    }
}

/// Reasons a policy definition is rejected.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The policy file could not be read.
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),

    /// The policy file is not valid YAML for the policy schema.
    #[error("failed to parse policy: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A path is empty or contains an empty segment.
    #[error("invalid policy path '{0}'")]
    InvalidPath(String),

    /// A range has `min > max` or a non-finite edge.
    #[error("invalid range for '{path}': {min}..{max}")]
    InvalidRange {
        /// The offending path.
        path: String,
        /// Declared minimum.
        min: f64,
        /// Declared maximum.
        max: f64,
    },

    /// A path is both incrementable and settable.
    #[error("path '{0}' is listed in both the increment and set tables")]
    OverlappingPath(String),

    /// An absolute range names a path that cannot be incremented.
    #[error("absolute range for '{0}' has no matching increment rule")]
    OrphanAbsoluteRange(String),

    /// The absolute table names a path twice.
    #[error("absolute range for '{0}' is declared twice")]
    DuplicateAbsoluteRange(String),
}

/// The allowlist tables consulted by the validator and clamper.
///
/// Every way of obtaining a policy runs [`PathPolicy::check`], so a policy
/// in hand always satisfies the table invariants. Absolute ranges keep
/// their declaration order, which is the order clamp warnings come out in.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "PolicyTables")]
pub struct PathPolicy {
    increments: BTreeMap<String, Bounds>,
    sets: BTreeMap<String, ValueKind>,
    absolute: Vec<(String, Bounds)>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyTables {
    #[serde(default)]
    increments: BTreeMap<String, Bounds>,
    #[serde(default)]
    sets: BTreeMap<String, ValueKind>,
    #[serde(default, deserialize_with = "ordered_ranges")]
    absolute: Vec<(String, Bounds)>,
}

/// Reads a `path: {min, max}` mapping without losing entry order.
fn ordered_ranges<'de, D>(deserializer: D) -> Result<Vec<(String, Bounds)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct RangesVisitor;

    impl<'de> Visitor<'de> for RangesVisitor {
        type Value = Vec<(String, Bounds)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of paths to ranges")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut ranges = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, Bounds>()? {
                ranges.push(entry);
            }
            Ok(ranges)
        }
    }

    deserializer.deserialize_map(RangesVisitor)
}

impl TryFrom<PolicyTables> for PathPolicy {
    type Error = PolicyError;

    fn try_from(tables: PolicyTables) -> Result<Self, Self::Error> {
        let policy = Self {
            increments: tables.increments,
            sets: tables.sets,
            absolute: tables.absolute,
        };
        policy.check()?;
        Ok(policy)
    }
}

const STANDARD_INCREMENTS: &[(&str, f64, f64)] = &[
    ("stats.combat.strength", -2.0, 2.0),
    ("stats.combat.agility", -3.0, 3.0),
    ("stats.combat.athletics", -3.0, 3.0),
    ("stats.combat.melee_attack", -2.0, 2.0),
    ("stats.combat.melee_defence", -2.0, 2.0),
    ("stats.combat.toughness", -2.0, 2.0),
    ("stats.combat.ranged", -2.0, 2.0),
    ("stats.utility.engineer", -2.0, 2.0),
    ("stats.utility.field_medic", -2.0, 2.0),
    ("stats.utility.stealth", -2.0, 2.0),
    // Status fields are held in place by their absolute range below.
    ("status.integrity", -1000.0, 1000.0),
    ("status.core_stability", -1000.0, 1000.0),
];

const STANDARD_ABSOLUTE: &[(&str, f64, f64)] = &[
    ("status.integrity", 0.0, 100.0),
    ("status.core_stability", 0.0, 100.0),
];

impl PathPolicy {
    /// An empty policy that rejects every directive.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The tables for the standard character sheet.
    #[must_use]
    pub fn standard() -> Self {
        let bounds =
            |&(path, min, max): &(&str, f64, f64)| (path.to_owned(), Bounds::new(min, max));
        Self {
            increments: STANDARD_INCREMENTS.iter().map(bounds).collect(),
            sets: BTreeMap::from([("status.location".to_owned(), ValueKind::Text)]),
            absolute: STANDARD_ABSOLUTE.iter().map(bounds).collect(),
        }
    }

    /// Adds or replaces an increment rule.
    ///
    /// # Errors
    ///
    /// Returns the violated invariant if the resulting tables fail
    /// [`PathPolicy::check`], for example a path that is already settable.
    pub fn with_increment(mut self, path: &str, min: f64, max: f64) -> Result<Self, PolicyError> {
        self.increments.insert(path.to_owned(), Bounds::new(min, max));
        self.checked()
    }

    /// Adds or replaces a set rule.
    ///
    /// # Errors
    ///
    /// As [`PathPolicy::with_increment`]; a path that is already
    /// incrementable is rejected with `PolicyError::OverlappingPath`.
    pub fn with_set(mut self, path: &str, kind: ValueKind) -> Result<Self, PolicyError> {
        self.sets.insert(path.to_owned(), kind);
        self.checked()
    }

    /// Adds or replaces an absolute range. The path needs an increment rule
    /// first.
    ///
    /// # Errors
    ///
    /// As [`PathPolicy::with_increment`]; a path without an increment rule
    /// is rejected with `PolicyError::OrphanAbsoluteRange`.
    pub fn with_absolute(mut self, path: &str, min: f64, max: f64) -> Result<Self, PolicyError> {
        let bounds = Bounds::new(min, max);
        match self.absolute.iter_mut().find(|(p, _)| p == path) {
            Some((_, existing)) => *existing = bounds,
            None => self.absolute.push((path.to_owned(), bounds)),
        }
        self.checked()
    }

    fn checked(self) -> Result<Self, PolicyError> {
        self.check()?;
        Ok(self)
    }

    /// Parses and checks a YAML policy document.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Parse` for malformed YAML and the other
    /// variants for tables that fail [`PathPolicy::check`].
    pub fn from_yaml_str(source: &str) -> Result<Self, PolicyError> {
        let tables: PolicyTables = serde_yaml::from_str(source)?;
        Self::try_from(tables)
    }

    /// Reads a YAML policy file.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Io` if the file cannot be read, otherwise as
    /// [`PathPolicy::from_yaml_str`].
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }

    /// Checks the table invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn check(&self) -> Result<(), PolicyError> {
        let all_paths = self
            .increments
            .keys()
            .chain(self.sets.keys())
            .chain(self.absolute.iter().map(|(p, _)| p));
        for path in all_paths {
            if path.split('.').any(str::is_empty) {
                return Err(PolicyError::InvalidPath(path.clone()));
            }
        }
        let all_ranges = self
            .increments
            .iter()
            .chain(self.absolute.iter().map(|(p, b)| (p, b)));
        for (path, bounds) in all_ranges {
            if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds.min > bounds.max {
                return Err(PolicyError::InvalidRange {
                    path: path.clone(),
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }
        if let Some(path) = self.sets.keys().find(|p| self.increments.contains_key(*p)) {
            return Err(PolicyError::OverlappingPath(path.clone()));
        }
        for (index, (path, _)) in self.absolute.iter().enumerate() {
            if !self.increments.contains_key(path) {
                return Err(PolicyError::OrphanAbsoluteRange(path.clone()));
            }
            if self.absolute[..index].iter().any(|(p, _)| p == path) {
                return Err(PolicyError::DuplicateAbsoluteRange(path.clone()));
            }
        }
        Ok(())
    }

    /// Delta bounds for an incrementable path.
    #[must_use]
    pub fn increment_rule(&self, path: &str) -> Option<Bounds> {
        self.increments.get(path).copied()
    }

    /// Type constraint for a settable path.
    #[must_use]
    pub fn set_rule(&self, path: &str) -> Option<ValueKind> {
        self.sets.get(path).copied()
    }

    /// Absolute range for a path, if it has one.
    #[must_use]
    pub fn absolute_range(&self, path: &str) -> Option<Bounds> {
        self.absolute
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, b)| *b)
    }

    /// All absolute ranges in declaration order.
    pub fn absolute_ranges(&self) -> impl Iterator<Item = (&str, Bounds)> {
        self.absolute.iter().map(|(p, b)| (p.as_str(), *b))
    }
}
