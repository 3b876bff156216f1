//! Stream header parsing and writing.
//!
//! Every stream starts with an 8-byte header:
//!
//! | Offset | Size | Meaning |
//! |---|---|---|
//! | 0 | 1 | Flag byte (written as 0x20, never validated) |
//! | 1 | 3 | Method tag: `"3;1"` windowed, `"3;0"` stored |
//! | 4 | 4 | Original length, little-endian |

use oxidat_core::error::{OxiDatError, Result};
use std::fmt;

/// Size of the stream header in bytes.
pub const HEADER_SIZE: usize = 8;

/// Flag byte written by the PIDX packer.
pub const DEFAULT_FLAG: u8 = 0x20;

/// Tag of the windowed LZSS format.
pub const TAG_WINDOWED: [u8; 3] = *b"3;1";

/// Tag of the stored format.
pub const TAG_STORED: [u8; 3] = *b"3;0";

/// Body encoding named by the header tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `"3;1"`: control/data bitstream over a 4 KB window.
    Windowed,
    /// `"3;0"`: XOR-obfuscated raw bytes.
    Stored,
}

impl Method {
    /// Parse a method from the 3-byte tag.
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"3;1" => Some(Self::Windowed),
            b"3;0" => Some(Self::Stored),
            _ => None,
        }
    }

    /// Get the 3-byte tag.
    pub fn tag(&self) -> &'static [u8; 3] {
        match self {
            Self::Windowed => &TAG_WINDOWED,
            Self::Stored => &TAG_STORED,
        }
    }

    /// Get a short human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Windowed => "windowed",
            Self::Stored => "stored",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parsed stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Byte at offset 0, carried through unchanged.
    pub flag: u8,
    /// Body encoding.
    pub method: Method,
    /// Length of the original payload.
    pub original_len: u32,
}

impl Header {
    /// Create a header with the default flag byte.
    pub fn new(method: Method, original_len: u32) -> Self {
        Self {
            flag: DEFAULT_FLAG,
            method,
            original_len,
        }
    }

    /// Replace the flag byte.
    pub fn with_flag(mut self, flag: u8) -> Self {
        self.flag = flag;
        self
    }

    /// Parse the header at the start of `data`.
    ///
    /// Only the tag is validated; the flag byte may hold anything.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(OxiDatError::header_too_short(data.len()));
        }

        let method = Method::from_tag(&data[1..4])
            .ok_or_else(|| OxiDatError::unknown_tag([data[1], data[2], data[3]]))?;

        Ok(Self {
            flag: data[0],
            method,
            original_len: u32::from_le_bytes([data[4], data[5], data[6], data[7]]),
        })
    }

    /// Serialize the header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let tag = self.method.tag();
        let len = self.original_len.to_le_bytes();
        [
            self.flag, tag[0], tag[1], tag[2], len[0], len[1], len[2], len[3],
        ]
    }

    /// Append the serialized header to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_bytes());
    }

    /// Original length as a `usize`.
    pub fn original_len(&self) -> usize {
        self.original_len as usize
    }
}
