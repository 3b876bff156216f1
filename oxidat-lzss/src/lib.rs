//! # OxiDat LZSS
//!
//! Pure Rust implementation of the windowed LZSS codec used for payloads
//! of PIDX `.dat` archives.
//!
//! ## Stream format
//!
//! ```text
//! +------+-------+-----------------+--------------------------------+
//! | flag | "3;1" | original length | control byte + up to 8 tokens  |
//! | 1 B  | 3 B   | 4 B (LE)        | ...repeated                    |
//! +------+-------+-----------------+--------------------------------+
//! ```
//!
//! - 4 KB history window, cursor starting at slot `0xFEE`
//! - Literal: one byte. Match: two bytes holding an **absolute window slot**
//!   (12 bits) and a length of 3..=18 (4 bits)
//! - Every byte after the header is XORed with `0x72`
//! - A `"3;0"` tag marks a stored stream: XORed raw bytes, no window
//!
//! ## Example
//!
//! ```rust
//! use oxidat_lzss::{compress, decompress};
//!
//! let original = b"TOBEORNOTTOBEORTOBEORNOT";
//! let compressed = compress(original).unwrap();
//! let decompressed = decompress(&compressed).unwrap();
//! assert_eq!(decompressed, original);
//! ```
//!
//! ## Packing archive entries
//!
//! ```rust
//! use oxidat_lzss::{LzssConfig, Method, pack, unpack};
//!
//! let config = LzssConfig::STANDARD;
//! let packed = pack(b"short", &config).unwrap();
//! // Too small to benefit: stored instead of compressed.
//! assert_eq!(packed.method, Method::Stored);
//!
//! let unpacked = unpack(&packed.bytes, 5, &config).unwrap();
//! assert_eq!(unpacked.data, b"short");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![forbid(unsafe_code)]

pub mod config;
pub mod container;
pub mod control;
pub mod decoder;
pub mod encoder;
pub mod header;
pub mod observer;
pub mod token;
pub mod window;

pub use config::{LzssConfig, XOR_KEY};
pub use container::{Packed, Unpacked, encode_stored, pack, unpack};
pub use decoder::{DecoderPhase, LzssDecoder};
pub use encoder::LzssEncoder;
pub use header::{HEADER_SIZE, Header, Method};
pub use observer::{
    LogObserver, NoopObserver, Observer, StatsObserver, TokenEvent, TraceWriter,
};
pub use token::{MAX_MATCH, MIN_MATCH, Token, TokenKind};
pub use window::{WINDOW_SIZE, WINDOW_START, Window};

use oxidat_core::error::Result;

/// Compress data into a windowed (`"3;1"`) stream.
///
/// # Example
///
/// ```rust
/// use oxidat_lzss::compress;
///
/// let compressed = compress(b"").unwrap();
/// assert_eq!(compressed, b" 3;1\0\0\0\0");
/// ```
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    LzssEncoder::default().encode(data)
}

/// Frame data in the stored (`"3;0"`) form.
pub fn compress_stored(data: &[u8]) -> Result<Vec<u8>> {
    encode_stored(data, &LzssConfig::STANDARD)
}

/// Decompress a stream, using the length recorded in its header.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    LzssDecoder::default().decode(data)
}

/// Decompress a stream, producing at most `expected_size` bytes.
///
/// # Example
///
/// ```rust
/// use oxidat_lzss::{compress, decompress_with_len};
///
/// let compressed = compress(b"hello hello hello").unwrap();
/// assert_eq!(decompress_with_len(&compressed, 5).unwrap(), b"hello");
/// ```
pub fn decompress_with_len(data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    LzssDecoder::default().decode_with_len(data, expected_size)
}
