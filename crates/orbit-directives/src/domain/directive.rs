//! Parsed directive blocks.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A directive value, tagged once at parse time.
///
/// Numbers request an increment; everything else requests a set. Booleans
/// land in `Other`, never in `Number`.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveValue {
    /// A JSON number.
    Number(f64),
    /// A JSON string.
    Text(String),
    /// Booleans, null, arrays and nested objects.
    Other(Value),
}

impl DirectiveValue {
    /// Tags a raw JSON value.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(number) => Self::Number(number),
                None => Self::Other(Value::Number(n)),
            },
            Value::String(s) => Self::Text(s),
            other => Self::Other(other),
        }
    }

    /// Converts back to JSON for storage or display.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
            Self::Text(s) => Value::String(s.clone()),
            Self::Other(v) => v.clone(),
        }
    }

    /// Short JSON type name used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::Other(Value::Bool(_)) => "boolean",
            Self::Other(Value::Null) => "null",
            Self::Other(Value::Array(_)) => "array",
            Self::Other(_) => "object",
        }
    }
}

/// One parsed directive block: dot-path keys with tagged values, in the
/// order they were written. Repeated keys are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directive {
    entries: Vec<(String, DirectiveValue)>,
}

impl Directive {
    /// Builds a directive from entries.
    #[must_use]
    pub fn new(entries: Vec<(String, DirectiveValue)>) -> Self {
        Self { entries }
    }

    /// Iterates entries in written order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &DirectiveValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries, counting repeats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the block was `{}`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last value written for `path`, if any.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&DirectiveValue> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == path)
            .map(|(_, v)| v)
    }
}

impl<'de> Deserialize<'de> for Directive {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DirectiveVisitor;

        impl<'de> Visitor<'de> for DirectiveVisitor {
            type Value = Directive;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a directive object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    entries.push((key, DirectiveValue::from_json(value)));
                }
                Ok(Directive { entries })
            }
        }

        deserializer.deserialize_map(DirectiveVisitor)
    }
}

impl Serialize for Directive {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, &value.to_json())?;
        }
        map.end()
    }
}
