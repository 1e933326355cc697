//! Scenario payloads and their canonical JSON text.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use serde_json::value::RawValue;

/// One data variant a test was executed with.
///
/// The payload is opaque. Its compact JSON encoding is computed once at
/// construction and is the only thing equality, hashing and ordering look
/// at. Object keys keep the order they were supplied in.
#[derive(Debug, Clone)]
pub struct ScenarioValue {
    value: Value,
    canonical: String,
}

impl ScenarioValue {
    /// Wrap a payload. `Value::Null` is accepted and encodes as `null`.
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        let canonical = value.to_string();
        Self { value, canonical }
    }

    /// A scenario carrying the JSON null literal.
    #[must_use]
    pub fn null() -> Self {
        Self::new(Value::Null)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The deterministic JSON encoding used for dedup, ordering and output.
    pub fn canonical_text(&self) -> &str {
        &self.canonical
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Whether this scenario carries no information worth attaching to a
    /// test: `null`, or a string that is empty after trimming.
    pub fn is_empty_payload(&self) -> bool {
        match &self.value {
            Value::Null => true,
            Value::String(text) => crate::is_blank(text),
            _ => false,
        }
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl PartialEq for ScenarioValue {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for ScenarioValue {}

impl PartialOrd for ScenarioValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScenarioValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl Hash for ScenarioValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for ScenarioValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl From<Value> for ScenarioValue {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl From<&str> for ScenarioValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ScenarioValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<i64> for ScenarioValue {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<f64> for ScenarioValue {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<bool> for ScenarioValue {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

/// Emits the canonical text verbatim rather than re-encoding the payload.
impl Serialize for ScenarioValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(self.canonical.clone()).map_err(serde::ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ScenarioValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::new)
    }
}
