//! # tagcodec-core
//!
//! Pure-Rust encoder and decoder for a compact **type-tagged text format**, plus the
//! catalog price pipeline that produces the data it carries.
//!
//! Every value in the format announces its own type with a two-character tag:
//! `D{..}` map, `L[..]` sequence, `S|..|` text, `I|..|` integer, `F|..|` real,
//! `N|None|` null. Decoding is a recursive descent over segments found by a
//! depth-tracking scanner, so `decode(encode(v)) == v` for every finite value.
//!
//! ## Quick start
//!
//! ```rust
//! use tagcodec_core::{decode, encode, Value};
//!
//! let book = Value::map()
//!     .with("name", "Atomic Habits")
//!     .with("price_EUR", 12.5)
//!     .with("tags", vec![Value::from("bestseller"), Value::from("nonfiction")])
//!     .with("author", Value::Null);
//!
//! let text = encode(&book);
//! assert_eq!(
//!     text,
//!     "D{S|name|:S|Atomic Habits|,S|price_EUR|:F|12.5|,\
//!      S|tags|:L[S|bestseller|,S|nonfiction|],S|author|:N|None|}"
//! );
//!
//! // Tagged text → Value (roundtrip)
//! assert_eq!(decode(&text).unwrap(), book);
//! ```
//!
//! ## Modules
//!
//! - [`types`]: the `Value` tree
//! - [`encoder`]: `Value` → tagged text
//! - [`decoder`]: tagged text → `Value`
//! - [`scan`]: the segment scanner state machine used by the decoder
//! - [`json`]: `serde_json` bridge and JSON text output
//! - [`xml`]: XML text output
//! - [`catalog`]: price validation, currency conversion, filtering, report building
//! - [`error`]: Error types

pub mod catalog;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod scan;
pub mod types;
pub mod xml;

pub use catalog::{process, CatalogConfig, CatalogReport, Currency, Product, Rates};
pub use decoder::decode;
pub use encoder::encode;
pub use error::CodecError;
pub use types::Value;

/// Encode `value` and decode it again, returning the encoded text and whether
/// the decoded tree equals the original.
///
/// ```
/// use tagcodec_core::{roundtrip, Value};
/// let (text, equal) = roundtrip(&Value::from(vec![Value::from(1), Value::Null])).unwrap();
/// assert_eq!(text, "L[I|1|,N|None|]");
/// assert!(equal);
/// ```
pub fn roundtrip(value: &Value) -> error::Result<(String, bool)> {
    let text = encode(value);
    let back = decode(&text)?;
    Ok((text, back == *value))
}
