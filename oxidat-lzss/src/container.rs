//! Pack / unpack policy used by archive writers and readers.
//!
//! An archive entry stores one payload plus its original size. Packing
//! tries the windowed form and keeps it only if it is strictly smaller;
//! otherwise the payload goes into the stored form. Unpacking treats any
//! buffer without a recognized header as an opaque raw payload.

use crate::config::LzssConfig;
use crate::decoder::LzssDecoder;
use crate::encoder::LzssEncoder;
use crate::header::{HEADER_SIZE, Header, Method};
use oxidat_core::error::{OxiDatError, Result};

/// Result of [`pack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packed {
    /// Framed stream (header included).
    pub bytes: Vec<u8>,
    /// Length of the original payload, as recorded in the header.
    pub original_len: u32,
    /// Format chosen for the stream.
    pub method: Method,
}

impl Packed {
    /// Ratio of packed size to original size (1.0 for empty input).
    pub fn ratio(&self) -> f64 {
        if self.original_len == 0 {
            1.0
        } else {
            self.bytes.len() as f64 / f64::from(self.original_len)
        }
    }
}

/// Result of [`unpack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unpacked {
    /// Recovered payload.
    pub data: Vec<u8>,
    /// Format the buffer was decoded from, or `None` for opaque payloads.
    pub method: Option<Method>,
}

impl Unpacked {
    /// Whether the buffer carried a recognized header.
    pub fn was_framed(&self) -> bool {
        self.method.is_some()
    }
}

/// Frame `data` in the stored (`"3;0"`) form.
pub fn encode_stored(data: &[u8], config: &LzssConfig) -> Result<Vec<u8>> {
    let original_len =
        u32::try_from(data.len()).map_err(|_| OxiDatError::input_too_large(data.len()))?;

    let mut out = Vec::with_capacity(HEADER_SIZE + data.len());
    Header::new(Method::Stored, original_len)
        .with_flag(config.flag_byte)
        .write_to(&mut out);
    out.extend(data.iter().map(|&b| b ^ config.xor_key));
    Ok(out)
}

/// Pack a payload, choosing between the windowed and stored forms.
///
/// The windowed form is kept only when `config.try_compress` is set and
/// the result is strictly smaller than `data`.
pub fn pack(data: &[u8], config: &LzssConfig) -> Result<Packed> {
    let original_len =
        u32::try_from(data.len()).map_err(|_| OxiDatError::input_too_large(data.len()))?;

    if config.try_compress {
        let compressed = LzssEncoder::new(*config).encode(data)?;
        if compressed.len() < data.len() {
            return Ok(Packed {
                bytes: compressed,
                original_len,
                method: Method::Windowed,
            });
        }
        log::debug!(
            "pack: windowed form of {} bytes is {} bytes, storing instead",
            data.len(),
            compressed.len()
        );
    }

    Ok(Packed {
        bytes: encode_stored(data, config)?,
        original_len,
        method: Method::Stored,
    })
}

/// Unpack an archive payload whose original size is `declared_len`.
///
/// Buffers without a recognized header are returned as-is, cut to
/// `declared_len`. Truncated streams are still an error.
pub fn unpack(bytes: &[u8], declared_len: usize, config: &LzssConfig) -> Result<Unpacked> {
    match LzssDecoder::new(*config).decode_with_len(bytes, declared_len) {
        Ok(data) => {
            // The header parsed, or decoding would have failed.
            let method = Header::parse(bytes).ok().map(|h| h.method);
            Ok(Unpacked { data, method })
        }
        Err(err) if err.is_format_error() => {
            log::warn!("unpack: {err}; treating {} bytes as raw payload", bytes.len());
            let end = declared_len.min(bytes.len());
            Ok(Unpacked {
                data: bytes[..end].to_vec(),
                method: None,
            })
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_compressible() {
        let data = b"0123456789".repeat(50);
        let packed = pack(&data, &LzssConfig::STANDARD).unwrap();

        assert_eq!(packed.method, Method::Windowed);
        assert_eq!(packed.original_len, 500);
        assert!(packed.bytes.len() < data.len());
        assert!(packed.ratio() < 1.0);
        assert_eq!(&packed.bytes[1..4], b"3;1");
    }

    #[test]
    fn test_pack_falls_back_to_stored() {
        let data = b"abc";
        let packed = pack(data, &LzssConfig::STANDARD).unwrap();

        assert_eq!(packed.method, Method::Stored);
        assert_eq!(packed.bytes.len(), 8 + 3);
        assert_eq!(&packed.bytes[1..4], b"3;0");
    }

    #[test]
    fn test_pack_without_compression() {
        let data = vec![0u8; 1000];
        let config = LzssConfig::new().with_try_compress(false);
        let packed = pack(&data, &config).unwrap();
        assert_eq!(packed.method, Method::Stored);
        assert_eq!(packed.bytes.len(), 1008);
    }

    #[test]
    fn test_pack_empty() {
        let packed = pack(b"", &LzssConfig::STANDARD).unwrap();
        assert_eq!(packed.method, Method::Stored);
        assert_eq!(packed.ratio(), 1.0);
        let unpacked = unpack(&packed.bytes, 0, &LzssConfig::STANDARD).unwrap();
        assert!(unpacked.data.is_empty());
    }

    #[test]
    fn test_stored_body_is_xored() {
        let out = encode_stored(&[0x00, 0x72, 0xFF], &LzssConfig::STANDARD).unwrap();
        assert_eq!(out, [0x20, b'3', b';', b'0', 3, 0, 0, 0, 0x72, 0x00, 0x8D]);
    }

    #[test]
    fn test_unpack_roundtrip_both_methods() {
        let config = LzssConfig::STANDARD;
        for data in [b"tiny".to_vec(), b"repeat me ".repeat(40)] {
            let packed = pack(&data, &config).unwrap();
            let unpacked = unpack(&packed.bytes, data.len(), &config).unwrap();
            assert_eq!(unpacked.data, data);
            assert_eq!(unpacked.method, Some(packed.method));
            assert!(unpacked.was_framed());
        }
    }

    #[test]
    fn test_unpack_opaque_payload() {
        let raw = b"\x89PNG\r\n\x1a\n rest of an image";
        let unpacked = unpack(raw, 12, &LzssConfig::STANDARD).unwrap();
        assert_eq!(unpacked.data, &raw[..12]);
        assert_eq!(unpacked.method, None);

        let short = unpack(b"ab", 10, &LzssConfig::STANDARD).unwrap();
        assert_eq!(short.data, b"ab");
        assert!(!short.was_framed());
    }

    #[test]
    fn test_unpack_propagates_truncation() {
        let data = b"xyzxyzxyzxyzxyzxyz".to_vec();
        let packed = LzssEncoder::default().encode(&data).unwrap();
        let cut = &packed[..packed.len() - 1];
        let err = unpack(cut, data.len(), &LzssConfig::STANDARD).unwrap_err();
        assert!(matches!(err, OxiDatError::Truncated { .. }));
    }
}
