//! Error types for OxiDat operations.
//!
//! Every failure is local to one buffer: nothing here is retryable and no
//! state survives a failed call.

use std::io;
use thiserror::Error;

/// The main error type for OxiDat operations.
#[derive(Debug, Error)]
pub enum OxiDatError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Header tag is neither the windowed nor the stored tag.
    #[error("Unknown format tag: {found:02x?}")]
    UnknownTag {
        /// The three tag bytes found at header offsets 1..4.
        found: [u8; 3],
    },

    /// Buffer is too short to hold a header.
    #[error("Header too short: need 8 bytes, have {len}")]
    HeaderTooShort {
        /// Length of the buffer that was offered.
        len: usize,
    },

    /// The stream ended in the middle of a token.
    #[error("Truncated input at offset {offset}: produced {produced} of {expected} bytes")]
    Truncated {
        /// Input offset at which the token could not be completed.
        offset: usize,
        /// Number of bytes produced before the truncation.
        produced: usize,
        /// Number of bytes the caller expected.
        expected: usize,
    },

    /// Input does not fit the 32-bit length field of the header.
    #[error("Input too large: {len} bytes exceeds the 32-bit length field")]
    InputTooLarge {
        /// Length of the rejected input.
        len: usize,
    },
}

/// Result type alias for OxiDat operations.
pub type Result<T> = std::result::Result<T, OxiDatError>;

impl OxiDatError {
    /// Create an unknown tag error.
    pub fn unknown_tag(found: [u8; 3]) -> Self {
        Self::UnknownTag { found }
    }

    /// Create a header too short error.
    pub fn header_too_short(len: usize) -> Self {
        Self::HeaderTooShort { len }
    }

    /// Create a truncated input error.
    pub fn truncated(offset: usize, produced: usize, expected: usize) -> Self {
        Self::Truncated {
            offset,
            produced,
            expected,
        }
    }

    /// Create an input too large error.
    pub fn input_too_large(len: usize) -> Self {
        Self::InputTooLarge { len }
    }

    /// Whether the buffer is simply not in this format.
    ///
    /// Callers treat such buffers as opaque payloads instead of failing.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::UnknownTag { .. } | Self::HeaderTooShort { .. })
    }
}
