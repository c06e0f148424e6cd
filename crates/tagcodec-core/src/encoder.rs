//! Tagged-format encoder: renders a `Value` tree as tagged text.
//!
//! Every value is written as a two-character tag followed by a delimited payload:
//!
//! - Map → `D{key:value,key:value}` (keys written as text values)
//! - Sequence → `L[item,item]`
//! - Text → `S|text|`
//! - Integer → `I|42|`
//! - Real → `F|12.5|`
//! - Null → `N|None|`
//!
//! Text payloads escape only the backslash (`\\`) and the scalar delimiter (`\|`).
//! Text without either character is written verbatim, so commas, colons, and
//! brackets pass through untouched (the decoder's scanner knows it is inside a
//! scalar and does not treat them as structure).
//!
//! # Example
//! ```
//! use tagcodec_core::{encode, Value};
//! let v = Value::map()
//!     .with("name", "Atomic Habits")
//!     .with("price_EUR", 12.5);
//! assert_eq!(encode(&v), "D{S|name|:S|Atomic Habits|,S|price_EUR|:F|12.5|}");
//! ```

use crate::types::Value;

/// Tag letters, shared with the scanner.
pub(crate) const TAG_MAP: char = 'D';
pub(crate) const TAG_SEQ: char = 'L';
pub(crate) const TAG_TEXT: char = 'S';
pub(crate) const TAG_INT: char = 'I';
pub(crate) const TAG_REAL: char = 'F';
pub(crate) const TAG_NULL: char = 'N';

/// Payload written for `Null`.
pub(crate) const NULL_PAYLOAD: &str = "None";

/// Encode a `Value` into tagged text. Never fails for a finite tree.
pub fn encode(value: &Value) -> String {
    let mut out = String::new();
    encode_value(value, &mut out);
    out
}

/// Recursive dispatch on the value case.
fn encode_value(value: &Value, out: &mut String) {
    match value {
        Value::Map(entries) => {
            out.push(TAG_MAP);
            out.push('{');
            for (i, (key, val)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                encode_text(key, out);
                out.push(':');
                encode_value(val, out);
            }
            out.push('}');
        }
        Value::Sequence(items) => {
            out.push(TAG_SEQ);
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                encode_value(item, out);
            }
            out.push(']');
        }
        Value::Text(s) => encode_text(s, out),
        Value::Integer(n) => encode_scalar(TAG_INT, &n.to_string(), out),
        Value::Real(f) => encode_scalar(TAG_REAL, &format_real(*f), out),
        Value::Null => encode_scalar(TAG_NULL, NULL_PAYLOAD, out),
    }
}

/// Emit `S|...|` with `\` and `|` escaped.
fn encode_text(s: &str, out: &mut String) {
    out.push(TAG_TEXT);
    out.push('|');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            _ => out.push(ch),
        }
    }
    out.push('|');
}

fn encode_scalar(tag: char, payload: &str, out: &mut String) {
    out.push(tag);
    out.push('|');
    out.push_str(payload);
    out.push('|');
}

/// Debug formatting always keeps a fractional part or exponent (`1.0`, `1e-7`),
/// so a real never looks like an integer, and it is the shortest text that
/// parses back to the same `f64`.
pub(crate) fn format_real(f: f64) -> String {
    format!("{:?}", f)
}
