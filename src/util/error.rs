//! Error types for GIF delay rewriting.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for delay rewriting.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// A block marker other than the one required at this point
    #[error("Unexpected marker at offset {offset}: expected {expected}, found {}", hex(.found))]
    UnexpectedMarker {
        offset: u64,
        expected: &'static str,
        found: Vec<u8>,
    },

    /// Second application extension is not an XMP block
    #[error("Unknown application identifier at offset {offset}: {identifier:?}")]
    UnknownApplicationIdentifier { offset: u64, identifier: String },

    /// Speed expression or frame range could not be parsed
    #[error("Malformed speed directive: {0}")]
    MalformedDirective(String),

    /// Stream ended inside a required field
    #[error("Truncated stream at offset {offset}: expected {expected} bytes, got {actual}")]
    TruncatedStream {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a malformed directive error.
    pub fn directive(msg: impl Into<String>) -> Self {
        Self::MalformedDirective(msg.into())
    }
}

/// Result type alias for delay rewriting.
pub type Result<T> = std::result::Result<T, Error>;

/// Space-separated hex dump, `"<eof>"` for an empty slice.
fn hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "<eof>".to_string();
    }
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
