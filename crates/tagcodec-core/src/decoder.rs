//! Tagged-format decoder: recursive descent over scanner segments.
//!
//! Decoding works in two phases per container:
//!
//! 1. **Scan**: [`scan::segments`] splits the container payload into its
//!    top-level segments (depth-zero commas), producing an immutable list.
//! 2. **Interpret**: each segment is decoded by dispatching on its two-character
//!    tag. Map segments are first split at their depth-zero `:`.
//!
//! Scalars (`S|`, `I|`, `F|`, `N|`) strip the tag and the closing `|`; text is
//! unescaped, integers and reals go through the standard numeric parsers, so
//! `I|1.5|` and `I|1e3|` are rejected while `F|` accepts anything `f64` does.
//!
//! All failures are [`CodecError::Format`] with the byte offset into the input.
//! Containers nested more than [`MAX_DEPTH`] levels deep are rejected.

use crate::error::{CodecError, Result};
use crate::scan;
use crate::types::{MapBuilder, Value};

/// Maximum container nesting accepted by [`decode`], matching `serde_json`.
pub const MAX_DEPTH: usize = 128;

/// Decode tagged text into a `Value`.
///
/// Leading and trailing whitespace is ignored. Malformed tags, unterminated
/// containers or scalars, bad numbers, non-text map keys, and trailing content
/// are all reported as errors; there is no partial result.
pub fn decode(text: &str) -> Result<Value> {
    let lead = text.len() - text.trim_start().len();
    decode_value(text.trim(), lead, 0)
}

/// Dispatch on the tag at the start of `text` (found at byte `offset`).
///
/// `depth` is the number of containers enclosing `text`.
fn decode_value(text: &str, offset: usize, depth: usize) -> Result<Value> {
    let tag = text.get(..2).ok_or_else(|| {
        CodecError::format(offset, format!("expected a tagged value, found {:?}", text))
    })?;

    if matches!(tag, "D{" | "L[") && depth >= MAX_DEPTH {
        return Err(CodecError::format(
            offset,
            format!("nesting too deep: more than {MAX_DEPTH} levels"),
        ));
    }

    match tag {
        "D{" => decode_map(container_payload(text, offset, '}')?, offset + 2, depth + 1),
        "L[" => decode_sequence(container_payload(text, offset, ']')?, offset + 2, depth + 1),
        "S|" => {
            let payload = scan::scalar_payload(text, offset)?;
            Ok(Value::Text(unescape_text(payload)))
        }
        "I|" => {
            let payload = scan::scalar_payload(text, offset)?;
            payload.parse::<i64>().map(Value::Integer).map_err(|e| {
                CodecError::format(offset + 2, format!("invalid integer {:?}: {}", payload, e))
            })
        }
        "F|" => {
            let payload = scan::scalar_payload(text, offset)?;
            payload.parse::<f64>().map(Value::Real).map_err(|e| {
                CodecError::format(offset + 2, format!("invalid real {:?}: {}", payload, e))
            })
        }
        "N|" => {
            scan::scalar_payload(text, offset)?;
            Ok(Value::Null)
        }
        _ => Err(CodecError::format(
            offset,
            format!("unrecognized tag {:?}", tag),
        )),
    }
}

/// Strip the two-character prefix and the closing bracket of a container.
fn container_payload(text: &str, offset: usize, closer: char) -> Result<&str> {
    if text.len() < 3 || !text.ends_with(closer) {
        return Err(CodecError::format(
            offset + text.len(),
            format!("unterminated container: missing '{closer}'"),
        ));
    }
    Ok(&text[2..text.len() - 1])
}

fn decode_sequence(payload: &str, offset: usize, depth: usize) -> Result<Value> {
    let items = scan::segments(payload, offset, ',')?
        .into_iter()
        .map(|seg| decode_value(seg.text, seg.offset, depth))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Sequence(items))
}

fn decode_map(payload: &str, offset: usize, depth: usize) -> Result<Value> {
    let mut entries = MapBuilder::default();

    for seg in scan::segments(payload, offset, ',')? {
        let (key_seg, value_seg) = scan::split_once(seg.text, seg.offset, ':')?
            .ok_or_else(|| CodecError::format(seg.offset, "map entry without ':'"))?;

        let key = match decode_value(key_seg.text, key_seg.offset, depth)? {
            Value::Text(s) => s,
            other => {
                return Err(CodecError::format(
                    key_seg.offset,
                    format!("map key must be text, found {}", other.type_name()),
                ))
            }
        };
        let value = decode_value(value_seg.text, value_seg.offset, depth)?;
        entries.insert(key, value);
    }

    Ok(entries.finish())
}

/// Undo the encoder's escaping: `\\` → `\`, `\|` → `|`. Any other backslash
/// sequence is kept as written.
fn unescape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('|') => out.push('|'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
