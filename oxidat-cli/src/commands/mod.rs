//! Command implementations for OxiDat CLI.

pub mod completions;
pub mod compress;
pub mod decompress;
pub mod info;
pub mod trace;

pub use completions::cmd_completions;
pub use compress::{CompressOptions, cmd_compress};
pub use decompress::{DecompressOptions, cmd_decompress};
pub use info::cmd_info;
pub use trace::cmd_trace;
