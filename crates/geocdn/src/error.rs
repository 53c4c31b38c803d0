//! Error types for the geocdn crate.

use std::fmt;

/// Result type for geocdn operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in geocdn operations.
#[derive(Debug)]
pub enum Error {
    /// A catalog operation was attempted before a successful `initialize`.
    NotInitialized,
    /// The requested category is not present in the catalog.
    UnknownCategory {
        /// The category that was requested.
        category: String,
    },
    /// HTTP request failed before a response was received.
    Http {
        /// The URL that failed.
        url: String,
        /// The error message.
        message: String,
    },
    /// HTTP response had a non-success status code.
    HttpStatus {
        /// The URL that returned the error.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
    /// Payload decompression or parsing failed.
    Decode(geocdn_decode::DecodeError),
    /// Invalid data in response.
    InvalidData {
        /// Context for where the error occurred.
        context: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
}

impl Error {
    /// The HTTP status code, if this is a status error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotInitialized => {
                write!(f, "catalog not initialized, call initialize() first")
            }
            Error::UnknownCategory { category } => write!(f, "unknown category: {category}"),
            Error::Http { url, message } => {
                write!(f, "http request to {url} failed: {message}")
            }
            Error::HttpStatus { url, status } => {
                write!(f, "http request to {url} returned status {status}")
            }
            Error::Decode(e) => write!(f, "decode error: {e}"),
            Error::InvalidData { context, detail } => {
                write!(f, "invalid {context}: {detail}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<geocdn_decode::DecodeError> for Error {
    fn from(e: geocdn_decode::DecodeError) -> Self {
        Error::Decode(e)
    }
}
