//! XML rendering of a `Value` tree (output only).
//!
//! Layout:
//!
//! - Map → one child element per key, named after the key
//! - Sequence → one `<item>` child per element
//! - Text / Integer / Real → escaped character data
//! - Null, empty map, empty sequence → self-closing element
//!
//! Keys that are not valid XML element names are written as
//! `<entry key="...">` so no information is lost.
//!
//! # Example
//! ```
//! use tagcodec_core::{xml, Value};
//! let v = Value::map().with("name", "Tom & Jerry");
//! let out = xml::encode(&v, "book");
//! assert!(out.contains("<name>Tom &amp; Jerry</name>"));
//! ```

use crate::encoder::format_real;
use crate::types::Value;

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Render `value` as an XML document whose root element is `root`.
///
/// An invalid `root` name falls back to `root`.
pub fn encode(value: &Value, root: &str) -> String {
    let root = if is_valid_name(root) { root } else { "root" };
    let mut out = String::from(DECLARATION);
    out.push('\n');
    encode_element(root, None, value, 0, &mut out);
    out
}

/// Emit `<name>...</name>` (or `<name/>`) for one value at the given depth.
/// `key_attr` carries the original key when `name` had to be replaced by `entry`.
fn encode_element(
    name: &str,
    key_attr: Option<&str>,
    value: &Value,
    depth: usize,
    out: &mut String,
) {
    out.push_str(&make_indent(depth));
    out.push('<');
    out.push_str(name);
    if let Some(key) = key_attr {
        out.push_str(" key=\"");
        out.push_str(&escape(key));
        out.push('"');
    }

    match value {
        Value::Map(entries) if !entries.is_empty() => {
            out.push_str(">\n");
            for (k, v) in entries {
                if is_valid_name(k) {
                    encode_element(k, None, v, depth + 1, out);
                } else {
                    encode_element("entry", Some(k), v, depth + 1, out);
                }
            }
            close_block(name, depth, out);
        }
        Value::Sequence(items) if !items.is_empty() => {
            out.push_str(">\n");
            for item in items {
                encode_element("item", None, item, depth + 1, out);
            }
            close_block(name, depth, out);
        }
        Value::Text(s) => close_inline(name, &escape(s), out),
        Value::Integer(n) => close_inline(name, &n.to_string(), out),
        Value::Real(f) => close_inline(name, &format_real(*f), out),
        Value::Map(_) | Value::Sequence(_) | Value::Null => out.push_str("/>\n"),
    }
}

fn close_block(name: &str, depth: usize, out: &mut String) {
    out.push_str(&make_indent(depth));
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}

fn close_inline(name: &str, body: &str, out: &mut String) {
    out.push('>');
    out.push_str(body);
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}

/// Escape the five XML special characters.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `[A-Za-z_][A-Za-z0-9_.-]*`, not starting with `xml` in any case.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    if name.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("xml")) {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
}

fn make_indent(depth: usize) -> String {
    "  ".repeat(depth)
}
