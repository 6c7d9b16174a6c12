//! Error types for swfrust library

use std::io;
use thiserror::Error;

use crate::tags::RawTag;

/// Main error type for swfrust operations
#[derive(Debug, Error)]
pub enum SwfError {
    /// IO error occurred during file operations (including running out of data)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A signature byte did not match `FWS`, `CWS` or `ZWS`
    #[error("Not a SWF. Signature byte {offset} is {byte:#04X} (expected: {expected})")]
    InvalidSignature {
        offset: usize,
        byte: u8,
        expected: &'static str,
    },

    /// The declared file length is implausible for the physical buffer size
    #[error("Implausible file length: declared {declared} bytes, buffer holds {actual} bytes")]
    ImplausibleLength { declared: u32, actual: usize },

    /// Malformed data inside the file
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// Compression method that cannot be used for this operation
    #[error("Unsupported compression: {0}")]
    UnsupportedCompression(String),

    /// Error during compression
    #[error("Compression error: {0}")]
    Compression(String),

    /// Error during decompression
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// Text could not be encoded or decoded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A tag payload could not be decoded.
    ///
    /// `raw` is the record exactly as it was read before dispatch.
    #[error("Parse error in tag {name} (type {code}) at index {index}: {source}")]
    TagParse {
        index: usize,
        code: u16,
        name: &'static str,
        raw: Box<RawTag>,
        #[source]
        source: Box<SwfError>,
    },

    /// Neither a structured tag nor a raw fallback exists for a slot
    #[error("Publish error: no tag and no raw tag fallback at index {index}")]
    PublishFallback { index: usize },

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

impl SwfError {
    /// Build the "unexpected end of data" IO error used by the cursor.
    pub fn eof(position: usize, requested: usize) -> Self {
        SwfError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("read of {requested} byte(s) at position {position} runs past the end of data"),
        ))
    }

    /// Whether this error belongs to the format-error family (bad header data).
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            SwfError::InvalidSignature { .. }
                | SwfError::ImplausibleLength { .. }
                | SwfError::InvalidFormat(_)
        )
    }
}

/// Result type alias for swfrust operations
pub type Result<T> = std::result::Result<T, SwfError>;

impl From<String> for SwfError {
    fn from(s: String) -> Self {
        SwfError::Custom(s)
    }
}

impl From<&str> for SwfError {
    fn from(s: &str) -> Self {
        SwfError::Custom(s.to_string())
    }
}
