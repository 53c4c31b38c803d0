//! Error types for decoding operations.

use std::fmt;

/// Errors that can occur while decoding a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The gzip stream was corrupt, truncated, or did not inflate to UTF-8.
    Decompress { detail: String },
    /// The (decompressed) text was not a feature-collection JSON document.
    Parse { detail: String },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decompress { detail } => write!(f, "failed to decompress payload: {detail}"),
            Self::Parse { detail } => write!(f, "failed to parse feature collection: {detail}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
