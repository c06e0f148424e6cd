//! Error types for tagged-format encoding, decoding, and the catalog pipeline.

use thiserror::Error;

/// Errors that can occur in tagcodec operations.
#[derive(Error, Debug)]
pub enum CodecError {
    /// A source value has no corresponding `Value` case (e.g. a JSON boolean).
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// The input was not valid tagged text (decoding path).
    /// `offset` is the byte offset into the trimmed input where the problem was detected.
    #[error("Format error at byte {offset}: {message}")]
    Format { offset: usize, message: String },

    /// JSON text could not be parsed or printed (bridge path).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The catalog configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CodecError {
    pub(crate) fn format(offset: usize, message: impl Into<String>) -> Self {
        CodecError::Format {
            offset,
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout tagcodec-core.
pub type Result<T> = std::result::Result<T, CodecError>;
