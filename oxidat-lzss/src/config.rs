//! Codec configuration.

use crate::header::DEFAULT_FLAG;
use crate::window::MAX_SEARCH_SPAN;

/// XOR key applied to every framed byte of a stream.
pub const XOR_KEY: u8 = 0x72;

/// LZSS configuration parameters.
///
/// Window size, start cursor and match bounds are fixed by the bit packing
/// and live next to the types that use them; this struct only carries what
/// a caller may reasonably vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzssConfig {
    /// Byte written at header offset 0. Decoders ignore it.
    pub flag_byte: u8,
    /// Key XORed with every control and data byte.
    pub xor_key: u8,
    /// How many history positions the encoder searches for a match.
    pub search_span: usize,
    /// Whether [`pack`](crate::pack) tries the windowed form at all.
    pub try_compress: bool,
}

impl LzssConfig {
    /// Configuration matching the PIDX tooling byte for byte.
    pub const STANDARD: Self = Self {
        flag_byte: DEFAULT_FLAG,
        xor_key: XOR_KEY,
        search_span: MAX_SEARCH_SPAN,
        try_compress: true,
    };

    /// Create the standard configuration.
    pub const fn new() -> Self {
        Self::STANDARD
    }

    /// Set the header flag byte.
    pub fn with_flag_byte(mut self, flag_byte: u8) -> Self {
        self.flag_byte = flag_byte;
        self
    }

    /// Set the XOR key.
    pub fn with_xor_key(mut self, xor_key: u8) -> Self {
        self.xor_key = xor_key;
        self
    }

    /// Set the encoder search span (clamped to `1..=MAX_SEARCH_SPAN`).
    pub fn with_search_span(mut self, search_span: usize) -> Self {
        self.search_span = search_span.clamp(1, MAX_SEARCH_SPAN);
        self
    }

    /// Set whether packing should attempt compression.
    pub fn with_try_compress(mut self, try_compress: bool) -> Self {
        self.try_compress = try_compress;
        self
    }

    /// Search span actually used by the encoder.
    ///
    /// Fields are public, so the clamp is applied again here.
    pub fn effective_search_span(&self) -> usize {
        self.search_span.clamp(1, MAX_SEARCH_SPAN)
    }
}

impl Default for LzssConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_config() {
        let config = LzssConfig::default();
        assert_eq!(config, LzssConfig::STANDARD);
        assert_eq!(config.flag_byte, 0x20);
        assert_eq!(config.xor_key, 0x72);
        assert_eq!(config.search_span, 4088);
        assert!(config.try_compress);
    }

    #[test]
    fn test_search_span_clamp() {
        assert_eq!(LzssConfig::new().with_search_span(0).search_span, 1);
        assert_eq!(LzssConfig::new().with_search_span(256).search_span, 256);
        assert_eq!(
            LzssConfig::new().with_search_span(1 << 20).search_span,
            MAX_SEARCH_SPAN
        );

        let raw = LzssConfig {
            search_span: 0,
            ..LzssConfig::STANDARD
        };
        assert_eq!(raw.effective_search_span(), 1);
    }
}
