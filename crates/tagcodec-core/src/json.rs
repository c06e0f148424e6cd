//! JSON <-> `Value` conversion, and JSON text output.
//!
//! JSON has booleans and `Value` does not, so [`from_json`] is fallible. The
//! other direction always succeeds; non-finite reals become JSON `null`.

use serde_json::{Map, Number, Value as JsonValue};

use crate::error::{CodecError, Result};
use crate::types::Value;

/// Convert a JSON value into a `Value`, keeping object key order.
///
/// Integers that fit in `i64` become `Integer`, every other number becomes
/// `Real` (except integers above `i64::MAX`, which are rejected rather than
/// silently rounded).
pub fn from_json(json: &JsonValue) -> Result<Value> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Err(CodecError::UnsupportedType(format!(
            "boolean ({b}) has no tagged representation"
        ))),
        JsonValue::Number(n) => number_to_value(n),
        JsonValue::String(s) => Ok(Value::Text(s.clone())),
        JsonValue::Array(arr) => arr
            .iter()
            .map(from_json)
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence),
        JsonValue::Object(obj) => obj
            .iter()
            .map(|(k, v)| from_json(v).map(|v| (k.clone(), v)))
            .collect::<Result<Vec<_>>>()
            .map(Value::Map),
    }
}

fn number_to_value(n: &Number) -> Result<Value> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Integer(i));
    }
    if n.is_u64() {
        return Err(CodecError::UnsupportedType(format!(
            "integer {n} is out of range for a signed 64-bit value"
        )));
    }
    n.as_f64()
        .map(Value::Real)
        .ok_or_else(|| CodecError::UnsupportedType(format!("number {n}")))
}

/// Convert a `Value` into JSON.
pub fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Map(entries) => {
            let mut map = Map::new();
            for (k, v) in entries {
                map.insert(k.clone(), to_json(v));
            }
            JsonValue::Object(map)
        }
        Value::Sequence(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Integer(n) => JsonValue::Number((*n).into()),
        Value::Real(f) => Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Null => JsonValue::Null,
    }
}

/// Parse JSON text into a `Value`.
pub fn parse(json: &str) -> Result<Value> {
    let value: JsonValue = serde_json::from_str(json)?;
    from_json(&value)
}

/// Render a `Value` as pretty-printed JSON text.
pub fn encode(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_json(value))?)
}
