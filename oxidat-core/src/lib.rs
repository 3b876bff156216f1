//! # OxiDat Core
//!
//! Core components for the OxiDat codec.
//!
//! - [`ringbuffer`]: Absolute-indexed history window for LZSS coding
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: CLI                                                 │
//! │     oxidat compress / decompress / info / trace        │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     "3;1" windowed LZSS, "3;0" stored, pack policy     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Core (this crate)                                   │
//! │     RingBuffer, OxiDatError                            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxidat_core::RingBuffer;
//!
//! let mut ring = RingBuffer::with_start(4096, 0xFEE);
//! ring.push(b'A');
//! assert_eq!(ring.read(0xFEE), b'A');
//! assert_eq!(ring.position(), 0xFEF);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![forbid(unsafe_code)]

pub mod error;
pub mod ringbuffer;

pub use error::{OxiDatError, Result};
pub use ringbuffer::RingBuffer;
