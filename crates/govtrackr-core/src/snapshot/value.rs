//! Snapshot value model.
//!
//! A snapshot is a point-in-time, JSON-like picture of a record
//! (a politician, a bill, a promise...). Values are an owned tree, so a
//! snapshot can never contain a reference cycle.

use crate::errors::{DiffError, ExError};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// Coarse shape of a value, used to dispatch recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Primitive,
    Object,
    Array,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Primitive => "primitive",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, ValueKind::Primitive)
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value inside a snapshot.
///
/// Integers that fit in `i64` are kept exact; every other number is a
/// `Float`. Absence of a key is not a value: lookups return `None`.
#[derive(Debug, PartialEq)]
pub enum SnapshotValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Object(Fields),
    Array(Vec<SnapshotValue>),
}

impl SnapshotValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            SnapshotValue::Object(_) => ValueKind::Object,
            SnapshotValue::Array(_) => ValueKind::Array,
            _ => ValueKind::Primitive,
        }
    }

    /// Number of direct children for containers, zero for primitives
    pub fn child_count(&self) -> usize {
        match self {
            SnapshotValue::Object(fields) => fields.len(),
            SnapshotValue::Array(items) => items.len(),
            _ => 0,
        }
    }

    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            SnapshotValue::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[SnapshotValue]> {
        match self {
            SnapshotValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

enum CloneStep<'a> {
    Visit(&'a SnapshotValue),
    Array(usize),
    Object(Vec<&'a str>),
}

/// Deep copy with an explicit work stack, so cloning a subtree cut off by
/// the depth guard cannot overflow the call stack.
impl Clone for SnapshotValue {
    fn clone(&self) -> Self {
        let mut steps = vec![CloneStep::Visit(self)];
        let mut built: Vec<SnapshotValue> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                CloneStep::Visit(SnapshotValue::Array(items)) => {
                    steps.push(CloneStep::Array(items.len()));
                    steps.extend(items.iter().rev().map(CloneStep::Visit));
                }
                CloneStep::Visit(SnapshotValue::Object(fields)) => {
                    steps.push(CloneStep::Object(fields.keys().collect()));
                    steps.extend(fields.entries.iter().rev().map(|(_, v)| CloneStep::Visit(v)));
                }
                CloneStep::Visit(SnapshotValue::Null) => built.push(SnapshotValue::Null),
                CloneStep::Visit(SnapshotValue::Bool(b)) => built.push(SnapshotValue::Bool(*b)),
                CloneStep::Visit(SnapshotValue::Int(i)) => built.push(SnapshotValue::Int(*i)),
                CloneStep::Visit(SnapshotValue::Float(f)) => built.push(SnapshotValue::Float(*f)),
                CloneStep::Visit(SnapshotValue::String(s)) => {
                    built.push(SnapshotValue::String(s.clone()))
                }
                CloneStep::Array(len) => {
                    let items = built.split_off(built.len() - len);
                    built.push(SnapshotValue::Array(items));
                }
                CloneStep::Object(keys) => {
                    let values = built.split_off(built.len() - keys.len());
                    let entries = keys
                        .into_iter()
                        .map(str::to_string)
                        .zip(values)
                        .collect();
                    built.push(SnapshotValue::Object(Fields { entries }));
                }
            }
        }

        built.pop().unwrap_or(SnapshotValue::Null)
    }
}

impl From<serde_json::Value> for SnapshotValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => SnapshotValue::Null,
            serde_json::Value::Bool(b) => SnapshotValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => SnapshotValue::Int(i),
                None => SnapshotValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => SnapshotValue::String(s),
            serde_json::Value::Array(items) => {
                SnapshotValue::Array(items.into_iter().map(SnapshotValue::from).collect())
            }
            // JSON object keys are already unique
            serde_json::Value::Object(map) => SnapshotValue::Object(Fields {
                entries: map
                    .into_iter()
                    .map(|(k, v)| (k, SnapshotValue::from(v)))
                    .collect(),
            }),
        }
    }
}

impl From<bool> for SnapshotValue {
    fn from(b: bool) -> Self {
        SnapshotValue::Bool(b)
    }
}

impl From<i64> for SnapshotValue {
    fn from(i: i64) -> Self {
        SnapshotValue::Int(i)
    }
}

impl From<i32> for SnapshotValue {
    fn from(i: i32) -> Self {
        SnapshotValue::Int(i64::from(i))
    }
}

impl From<f64> for SnapshotValue {
    fn from(f: f64) -> Self {
        SnapshotValue::Float(f)
    }
}

impl From<&str> for SnapshotValue {
    fn from(s: &str) -> Self {
        SnapshotValue::String(s.to_string())
    }
}

impl From<String> for SnapshotValue {
    fn from(s: String) -> Self {
        SnapshotValue::String(s)
    }
}

impl From<Fields> for SnapshotValue {
    fn from(fields: Fields) -> Self {
        SnapshotValue::Object(fields)
    }
}

impl From<Vec<SnapshotValue>> for SnapshotValue {
    fn from(items: Vec<SnapshotValue>) -> Self {
        SnapshotValue::Array(items)
    }
}

/// Non-finite floats have no JSON form and serialize as `null`.
impl Serialize for SnapshotValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SnapshotValue::Null => serializer.serialize_unit(),
            SnapshotValue::Bool(b) => serializer.serialize_bool(*b),
            SnapshotValue::Int(i) => serializer.serialize_i64(*i),
            SnapshotValue::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            SnapshotValue::Float(_) => serializer.serialize_unit(),
            SnapshotValue::String(s) => serializer.serialize_str(s),
            SnapshotValue::Object(fields) => fields.serialize(serializer),
            SnapshotValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for SnapshotValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(SnapshotValue::from)
    }
}

/// Insertion-ordered keyed record with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, SnapshotValue)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing (in place) and returning any previous value
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<SnapshotValue>,
    ) -> Option<SnapshotValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder form of [`Fields::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SnapshotValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&SnapshotValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SnapshotValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, SnapshotValue)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, SnapshotValue)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A top-level keyed record: the unit the diff engine compares.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot(Fields);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: impl Into<String>, value: impl Into<SnapshotValue>) -> Self {
        Self(self.0.with(key, value))
    }

    pub fn fields(&self) -> &Fields {
        &self.0
    }

    pub fn into_fields(self) -> Fields {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Fields> for Snapshot {
    fn from(fields: Fields) -> Self {
        Self(fields)
    }
}

impl TryFrom<serde_json::Value> for Snapshot {
    type Error = ExError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match SnapshotValue::from(value) {
            SnapshotValue::Object(fields) => Ok(Self(fields)),
            other => Err(DiffError::InvalidSnapshot {
                reason: format!("snapshot root must be an object, got {}", other.kind()),
            }
            .into()),
        }
    }
}
