//! Structural scanner for tagged text.
//!
//! The decoder never tokenizes the whole input. Instead it asks this module to
//! split a container payload into its top-level segments, then decodes each
//! segment recursively. Splitting is driven by a small state machine:
//!
//! | State | Input | Next state |
//! |---|---|---|
//! | `ScanningContainer` | tag letter (`D L S I F N`) | `ReadingTag(letter)` |
//! | `ScanningContainer` | `}` / `]` | `ScanningContainer` (pops one level; must match opener) |
//! | `ScanningContainer` | `,` / `:` at depth 0 | `ScanningContainer` (reports a separator) |
//! | `ReadingTag(D)` | `{` | `ScanningContainer` (pushes `}`) |
//! | `ReadingTag(L)` | `[` | `ScanningContainer` (pushes `]`) |
//! | `ReadingTag(S I F N)` | `|` | `ReadingDelimitedScalar` |
//! | `ReadingDelimitedScalar` | `\` | escape: next char is payload |
//! | `ReadingDelimitedScalar` | `|` | `ScanningContainer` |
//!
//! Anything else is a format error. Because scalar payloads are tracked
//! explicitly, commas, colons, and brackets inside text never count as structure.

use crate::encoder::{TAG_INT, TAG_MAP, TAG_NULL, TAG_REAL, TAG_SEQ, TAG_TEXT};
use crate::error::{CodecError, Result};

/// Scanner state. See the module docs for the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Saw a tag letter; waiting for its opening delimiter.
    ReadingTag(char),
    /// Between values, inside zero or more open containers.
    ScanningContainer,
    /// Inside a `|`-delimited scalar payload.
    ReadingDelimitedScalar { escaped: bool },
}

/// What a single scanned character meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Part of the current segment.
    Payload,
    /// A `,` or `:` with no container open and outside any scalar.
    Separator(char),
}

/// Incremental scanner. Feed characters with [`Scanner::step`], then call
/// [`Scanner::finish`] to check that everything opened was closed.
#[derive(Debug, Clone)]
pub struct Scanner {
    state: ScanState,
    /// Expected closing brackets of the open containers, innermost last.
    closers: Vec<char>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            state: ScanState::ScanningContainer,
            closers: Vec::new(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Number of containers currently open.
    pub fn depth(&self) -> usize {
        self.closers.len()
    }

    /// Advance by one character found at byte `offset` (used for error reporting).
    pub fn step(&mut self, offset: usize, ch: char) -> Result<Step> {
        match self.state {
            ScanState::ScanningContainer => self.step_container(offset, ch),
            ScanState::ReadingTag(tag) => {
                let expected = opener_for(tag);
                if ch != expected {
                    return Err(CodecError::format(
                        offset,
                        format!("malformed tag: '{tag}' must be followed by '{expected}', found '{ch}'"),
                    ));
                }
                self.state = match ch {
                    '{' => {
                        self.closers.push('}');
                        ScanState::ScanningContainer
                    }
                    '[' => {
                        self.closers.push(']');
                        ScanState::ScanningContainer
                    }
                    _ => ScanState::ReadingDelimitedScalar { escaped: false },
                };
                Ok(Step::Payload)
            }
            ScanState::ReadingDelimitedScalar { escaped: true } => {
                self.state = ScanState::ReadingDelimitedScalar { escaped: false };
                Ok(Step::Payload)
            }
            ScanState::ReadingDelimitedScalar { escaped: false } => {
                match ch {
                    '\\' => self.state = ScanState::ReadingDelimitedScalar { escaped: true },
                    '|' => self.state = ScanState::ScanningContainer,
                    _ => {}
                }
                Ok(Step::Payload)
            }
        }
    }

    fn step_container(&mut self, offset: usize, ch: char) -> Result<Step> {
        match ch {
            TAG_MAP | TAG_SEQ | TAG_TEXT | TAG_INT | TAG_REAL | TAG_NULL => {
                self.state = ScanState::ReadingTag(ch);
                Ok(Step::Payload)
            }
            '}' | ']' => match self.closers.pop() {
                Some(expected) if expected == ch => Ok(Step::Payload),
                Some(expected) => Err(CodecError::format(
                    offset,
                    format!("mismatched bracket: expected '{expected}', found '{ch}'"),
                )),
                None => Err(CodecError::format(
                    offset,
                    format!("unbalanced '{ch}' with no open container"),
                )),
            },
            ',' | ':' if self.closers.is_empty() => Ok(Step::Separator(ch)),
            ',' | ':' => Ok(Step::Payload),
            c if c.is_whitespace() => Ok(Step::Payload),
            _ => Err(CodecError::format(
                offset,
                format!("unexpected character '{ch}'"),
            )),
        }
    }

    /// Check that the input ended cleanly: no pending tag, open scalar, or open container.
    pub fn finish(&self, offset: usize) -> Result<()> {
        match self.state {
            ScanState::ReadingTag(tag) => Err(CodecError::format(
                offset,
                format!("input ended after tag letter '{tag}'"),
            )),
            ScanState::ReadingDelimitedScalar { .. } => Err(CodecError::format(
                offset,
                "unterminated scalar: missing closing '|'",
            )),
            ScanState::ScanningContainer => match self.closers.last() {
                Some(expected) => Err(CodecError::format(
                    offset,
                    format!("unterminated container: missing '{expected}'"),
                )),
                None => Ok(()),
            },
        }
    }
}

fn opener_for(tag: char) -> char {
    match tag {
        TAG_MAP => '{',
        TAG_SEQ => '[',
        _ => '|',
    }
}

/// A slice of the input with its byte offset in the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub offset: usize,
    pub text: &'a str,
}

impl<'a> Segment<'a> {
    /// Trim surrounding whitespace, keeping `offset` pointed at the first kept byte.
    fn trimmed(offset: usize, raw: &'a str) -> Self {
        let lead = raw.len() - raw.trim_start().len();
        Segment {
            offset: offset + lead,
            text: raw.trim(),
        }
    }
}

/// Split `payload` (which starts at byte `offset`) on every top-level `separator`.
///
/// An empty (or all-whitespace) payload yields no segments, so `D{}` and `L[]`
/// decode to empty containers. An empty segment between separators is an error.
pub fn segments(payload: &str, offset: usize, separator: char) -> Result<Vec<Segment<'_>>> {
    if payload.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut scanner = Scanner::new();
    let mut out = Vec::new();
    let mut start = 0;

    for (i, ch) in payload.char_indices() {
        if scanner.step(offset + i, ch)? == Step::Separator(separator) {
            out.push(non_empty(Segment::trimmed(offset + start, &payload[start..i]), offset + i)?);
            start = i + ch.len_utf8();
        }
    }
    scanner.finish(offset + payload.len())?;
    out.push(non_empty(
        Segment::trimmed(offset + start, &payload[start..]),
        offset + payload.len(),
    )?);

    Ok(out)
}

/// Split `text` at its first top-level `separator`.
///
/// The whole text is still scanned, so structural errors after the split point
/// are reported here. Returns `None` if there is no top-level separator.
pub fn split_once(
    text: &str,
    offset: usize,
    separator: char,
) -> Result<Option<(Segment<'_>, Segment<'_>)>> {
    let mut scanner = Scanner::new();
    let mut split = None;

    for (i, ch) in text.char_indices() {
        if scanner.step(offset + i, ch)? == Step::Separator(separator) && split.is_none() {
            split = Some(i);
        }
    }
    scanner.finish(offset + text.len())?;

    Ok(split.map(|i| {
        (
            Segment::trimmed(offset, &text[..i]),
            Segment::trimmed(offset + i + 1, &text[i + 1..]),
        )
    }))
}

/// Return the raw payload of a delimited scalar such as `S|abc|`.
///
/// `text` must start with a scalar tag. The payload is returned still escaped;
/// anything after the closing `|` is an error.
pub fn scalar_payload(text: &str, offset: usize) -> Result<&str> {
    let mut scanner = Scanner::new();

    for (i, ch) in text.char_indices() {
        scanner.step(offset + i, ch)?;
        if i >= 2 && scanner.state() == ScanState::ScanningContainer {
            if i + 1 < text.len() {
                return Err(CodecError::format(
                    offset + i + 1,
                    format!("unexpected trailing characters {:?}", &text[i + 1..]),
                ));
            }
            return Ok(&text[2..i]);
        }
    }

    Err(CodecError::format(
        offset + text.len(),
        "unterminated scalar: missing closing '|'",
    ))
}

fn non_empty(segment: Segment<'_>, offset: usize) -> Result<Segment<'_>> {
    if segment.text.is_empty() {
        return Err(CodecError::format(offset, "empty element"));
    }
    Ok(segment)
}
