//! The nested character record and dot-path access into it.
//!
//! A record is a JSON object such as
//! `{"status": {"integrity": 100.0, "location": "The city of Stout"}}`;
//! `status.integrity` addresses the nested number.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::mutation::Mutation;

/// Reasons a record cannot be read or mutated at a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The record itself is not a JSON object.
    #[error("character record must be a JSON object")]
    NotAnObject,

    /// The path is empty or has an empty segment.
    #[error("invalid path '{0}'")]
    InvalidPath(String),

    /// A parent segment of the path holds a non-object value.
    #[error("path '{path}' is blocked by a non-object value at '{segment}'")]
    PathBlocked {
        /// The full path being written.
        path: String,
        /// The segment holding a scalar or array.
        segment: String,
    },

    /// An increment targets a field that holds a non-numeric value.
    #[error("cannot increment non-numeric field '{0}'")]
    NonNumeric(String),

    /// An increment would produce NaN or infinity.
    #[error("increment of '{0}' does not produce a finite number")]
    NonFinite(String),
}

/// A nested, dot-path addressable character record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterRecord(Map<String, Value>);

impl CharacterRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::NotAnObject` for any other JSON value.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(RecordError::NotAnObject),
        }
    }

    /// Returns the record as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Consumes the record into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Resolves a dot-path, returning `None` when any segment is missing or a
    /// parent is not an object.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Resolves a dot-path to a number. Strings, booleans and containers
    /// resolve to `None`.
    #[must_use]
    pub fn number_at(&self, path: &str) -> Option<f64> {
        self.lookup(path).and_then(Value::as_f64)
    }

    /// Adds `delta` to the number at `path`, creating the field (and any
    /// missing parents) with value `delta` when absent. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is malformed, a parent is not an object,
    /// the field is non-numeric, or the sum is not finite.
    pub fn increment(&mut self, path: &str, delta: f64) -> Result<f64, RecordError> {
        let slot = self.slot_mut(path)?;
        let current = match slot {
            Value::Null => 0.0,
            Value::Number(n) => n.as_f64().unwrap_or_default(),
            _ => return Err(RecordError::NonNumeric(path.to_owned())),
        };
        let updated = current + delta;
        let number = serde_json::Number::from_f64(updated)
            .ok_or_else(|| RecordError::NonFinite(path.to_owned()))?;
        *slot = Value::Number(number);
        Ok(updated)
    }

    /// Replaces the value at `path`, creating missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is malformed or a parent is not an object.
    pub fn assign(&mut self, path: &str, value: Value) -> Result<(), RecordError> {
        *self.slot_mut(path)? = value;
        Ok(())
    }

    /// Applies every increment and set of a mutation. The record is left
    /// untouched if any single operation fails.
    ///
    /// # Errors
    ///
    /// Returns the first `RecordError` encountered.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<(), RecordError> {
        let mut staged = self.clone();
        for (path, delta) in &mutation.increments {
            staged.increment(path, *delta)?;
        }
        for (path, value) in &mutation.sets {
            staged.assign(path, value.clone())?;
        }
        *self = staged;
        Ok(())
    }

    /// Walks to the leaf slot of `path`, inserting `Null` placeholders for
    /// missing segments.
    fn slot_mut(&mut self, path: &str) -> Result<&mut Value, RecordError> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(RecordError::InvalidPath(path.to_owned()));
        }
        let (leaf, parents) = segments
            .split_last()
            .ok_or_else(|| RecordError::InvalidPath(path.to_owned()))?;

        let mut map = &mut self.0;
        for segment in parents {
            let entry = map
                .entry((*segment).to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            map = match entry {
                Value::Object(inner) => inner,
                _ => {
                    return Err(RecordError::PathBlocked {
                        path: path.to_owned(),
                        segment: (*segment).to_owned(),
                    });
                }
            };
        }
        Ok(map.entry((*leaf).to_owned()).or_insert(Value::Null))
    }
}

impl TryFrom<Value> for CharacterRecord {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}
