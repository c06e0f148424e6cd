//! The `Value` tree that the tagged codec encodes and decodes.
//!
//! `Value` is a closed union of six cases. Map keys are plain `String`s, so the
//! "keys are always text" invariant holds by construction, and maps are stored as
//! `Vec<(String, Value)>` to keep insertion order without depending on `IndexMap`.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CodecError;

/// A tagged-format document value.
///
/// Integers and reals are separate cases: `Integer(1)` and `Real(1.0)` are not
/// equal and encode with different tags.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Key-value pairs in insertion order. Keys are unique.
    Map(Vec<(String, Value)>),
    Sequence(Vec<Value>),
    Text(String),
    Integer(i64),
    Real(f64),
    Null,
}

impl Value {
    /// An empty map.
    pub fn map() -> Self {
        Value::Map(Vec::new())
    }

    /// An empty sequence.
    pub fn seq() -> Self {
        Value::Sequence(Vec::new())
    }

    /// Insert `value` under `key`, replacing (in place) any existing entry for that key.
    ///
    /// Returns the previous value, if any. Has no effect on non-map values
    /// other than handing `value` back.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        match self {
            Value::Map(entries) => insert_entry(entries, key.into(), value),
            _ => Some(value),
        }
    }

    /// Builder-style [`Value::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value.into());
        self
    }

    /// Append to a sequence. No effect on other cases.
    pub fn push(&mut self, value: impl Into<Value>) {
        if let Value::Sequence(items) = self {
            items.push(value.into());
        }
    }

    /// Look up a key in a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn as_map(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view: reals as-is, integers widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the case, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Map(_) => "map",
            Value::Sequence(_) => "sequence",
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Null => "null",
        }
    }
}

/// Single-entry map insertion for `Value::insert`; bulk building goes through [`MapBuilder`].
fn insert_entry(
    entries: &mut Vec<(String, Value)>,
    key: String,
    value: Value,
) -> Option<Value> {
    if let Some(pos) = entries.iter().position(|(k, _)| *k == key) {
        return Some(std::mem::replace(&mut entries[pos].1, value));
    }
    entries.push((key, value));
    None
}

/// Builds map entries in order with an index of key positions, so each insert
/// is constant time. A repeated key keeps its first position and takes the
/// last value, as with [`Value::insert`].
#[derive(Debug, Default)]
pub(crate) struct MapBuilder {
    entries: Vec<(String, Value)>,
    positions: HashMap<String, usize>,
}

impl MapBuilder {
    pub(crate) fn insert(&mut self, key: String, value: Value) {
        match self.positions.entry(key) {
            Entry::Occupied(slot) => self.entries[*slot.get()].1 = value,
            Entry::Vacant(slot) => {
                self.entries.push((slot.key().clone(), value));
                slot.insert(self.entries.len() - 1);
            }
        }
    }

    pub(crate) fn finish(self) -> Value {
        Value::Map(self.entries)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Sequence(iter.into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut entries = MapBuilder::default();
        for (k, v) in iter {
            entries.insert(k, v);
        }
        entries.finish()
    }
}

/// Renders the tagged encoding.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::encoder::encode(self))
    }
}

/// Parses tagged text.
impl FromStr for Value {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::decoder::decode(s)
    }
}
