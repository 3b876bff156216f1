//! LZSS decoder (decompression).
//!
//! Decoding stops as soon as either the requested number of bytes has been
//! produced or the input runs out at a token boundary. Both are normal
//! endings: a short final group pads its control byte with match bits that
//! have no data behind them, and only the input running dry stops the
//! decoder from chasing them when the caller asks for more than the stream
//! holds. Input that ends halfway through a match token is an error.

use crate::config::LzssConfig;
use crate::control::FlagQueue;
use crate::header::{HEADER_SIZE, Header, Method};
use crate::observer::{NoopObserver, Observer, TokenEvent};
use crate::token::{MAX_MATCH, TokenKind, unpack_match};
use crate::window::Window;
use oxidat_core::error::{OxiDatError, Result};

/// Phase of the windowed decoding loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderPhase {
    /// Take the next control bit, reading a new control byte if needed.
    ReadControl,
    /// Emit one literal byte.
    EmitLiteral,
    /// Replay one window match.
    EmitMatch,
}

/// LZSS decoder for `"3;1"` and `"3;0"` streams.
#[derive(Debug, Clone, Default)]
pub struct LzssDecoder {
    config: LzssConfig,
}

impl LzssDecoder {
    /// Create a new decoder.
    pub fn new(config: LzssConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &LzssConfig {
        &self.config
    }

    /// Decode a stream using the length recorded in its header.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let header = Header::parse(data)?;
        self.decode_observed(data, header.original_len(), &mut NoopObserver)
    }

    /// Decode a stream, producing at most `expected_size` bytes.
    ///
    /// `expected_size` takes precedence over the header's length field,
    /// which lets callers that keep their own size record use it.
    ///
    /// # Errors
    ///
    /// - [`OxiDatError::UnknownTag`] / [`OxiDatError::HeaderTooShort`] when
    ///   `data` is not a stream of this format
    /// - [`OxiDatError::Truncated`] when the input ends inside a match token
    pub fn decode_with_len(&self, data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
        self.decode_observed(data, expected_size, &mut NoopObserver)
    }

    /// Like [`decode_with_len`](Self::decode_with_len), reporting every
    /// control byte and token to `observer`.
    pub fn decode_observed(
        &self,
        data: &[u8],
        expected_size: usize,
        observer: &mut dyn Observer,
    ) -> Result<Vec<u8>> {
        let header = Header::parse(data)?;

        let output = match header.method {
            Method::Stored => self.decode_stored(data, expected_size),
            Method::Windowed => self.decode_windowed(data, expected_size, observer)?,
        };

        log::debug!(
            "lzss: decoded {} stream of {} bytes into {} bytes (expected {})",
            header.method,
            data.len(),
            output.len(),
            expected_size
        );

        Ok(output)
    }

    fn decode_stored(&self, data: &[u8], expected_size: usize) -> Vec<u8> {
        let key = self.config.xor_key;
        data[HEADER_SIZE..]
            .iter()
            .take(expected_size)
            .map(|&b| b ^ key)
            .collect()
    }

    fn decode_windowed(
        &self,
        data: &[u8],
        expected_size: usize,
        observer: &mut dyn Observer,
    ) -> Result<Vec<u8>> {
        let key = self.config.xor_key;
        let body_len = data.len() - HEADER_SIZE;

        // Two data bytes expand to at most MAX_MATCH output bytes; a forged
        // length field must not drive the allocation.
        let capacity = expected_size.min(body_len.saturating_mul(MAX_MATCH / 2));
        let mut output = Vec::with_capacity(capacity);

        let mut window = Window::new();
        let mut flags = FlagQueue::new();
        let mut phase = DecoderPhase::ReadControl;
        let mut pos = HEADER_SIZE;
        // A group's control byte is reported once its tokens have been.
        let mut pending_control: Option<(usize, u8)> = None;

        while output.len() < expected_size {
            phase = match phase {
                DecoderPhase::ReadControl => match flags.next_kind() {
                    Some(TokenKind::Literal) => DecoderPhase::EmitLiteral,
                    Some(TokenKind::Match) => DecoderPhase::EmitMatch,
                    None => {
                        let Some(&byte) = data.get(pos) else {
                            break;
                        };
                        if let Some((at, value)) = pending_control.replace((pos, byte)) {
                            observer.on_control(at, value);
                        }
                        flags.refill(byte ^ key);
                        pos += 1;
                        DecoderPhase::ReadControl
                    }
                },
                DecoderPhase::EmitLiteral => {
                    let Some(&byte) = data.get(pos) else {
                        break;
                    };
                    let value = byte ^ key;
                    observer.on_token(&TokenEvent::Literal { offset: pos, value });
                    pos += 1;

                    output.push(value);
                    window.push(value);
                    DecoderPhase::ReadControl
                }
                DecoderPhase::EmitMatch => {
                    let Some(&[lo, hi]) = data.get(pos..pos + 2) else {
                        if pos < data.len() {
                            return Err(OxiDatError::truncated(pos, output.len(), expected_size));
                        }
                        break;
                    };
                    let (distance, length) = unpack_match([lo ^ key, hi ^ key]);
                    observer.on_token(&TokenEvent::Match {
                        offset: pos,
                        distance,
                        length,
                    });
                    pos += 2;

                    let length = length.min(expected_size - output.len());
                    window.copy_match(distance, length, &mut output);
                    DecoderPhase::ReadControl
                }
            };
        }

        if let Some((at, value)) = pending_control {
            observer.on_control(at, value);
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::LzssEncoder;
    use crate::observer::StatsObserver;
    use crate::token::pack_match;

    const KEY: u8 = 0x72;

    /// Build a windowed stream from un-XORed body bytes.
    fn windowed(original_len: u32, body: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        Header::new(Method::Windowed, original_len).write_to(&mut out);
        out.extend(body.iter().map(|b| b ^ KEY));
        out
    }

    #[test]
    fn test_decode_literals() {
        let stream = windowed(3, &[0b0000_0111, b'a', b'b', b'c']);
        let decoder = LzssDecoder::default();
        assert_eq!(decoder.decode(&stream).unwrap(), b"abc");
    }

    #[test]
    fn test_decode_self_referential_match() {
        // One literal at 0xFEE, then a match reading from 0xFEE for 18 bytes:
        // every copied byte is the one written just before it.
        let [lo, hi] = pack_match(0xFEE, 18);
        let stream = windowed(19, &[0b0000_0001, 0xAA, lo, hi]);
        let decoded = LzssDecoder::default().decode(&stream).unwrap();
        assert_eq!(decoded, vec![0xAA; 19]);
    }

    #[test]
    fn test_decode_match_from_zeroed_window() {
        // Slots never written hold zero.
        let [lo, hi] = pack_match(0x000, 5);
        let stream = windowed(5, &[0b0000_0000, lo, hi]);
        assert_eq!(LzssDecoder::default().decode(&stream).unwrap(), [0; 5]);
    }

    #[test]
    fn test_decode_stops_at_expected_size() {
        let [lo, hi] = pack_match(0xFEE, 18);
        let stream = windowed(19, &[0b0000_0001, b'z', lo, hi]);
        let decoder = LzssDecoder::default();
        assert_eq!(decoder.decode_with_len(&stream, 7).unwrap(), b"zzzzzzz");
        assert_eq!(decoder.decode_with_len(&stream, 0).unwrap(), b"");
    }

    #[test]
    fn test_decode_stops_at_exhaustion() {
        // Declared 100 bytes, stream holds 2; trailing padding bits are
        // match-shaped but have no data.
        let stream = windowed(100, &[0b0000_0011, b'o', b'k']);
        assert_eq!(LzssDecoder::default().decode(&stream).unwrap(), b"ok");
    }

    #[test]
    fn test_decode_truncated_match() {
        let stream = windowed(10, &[0b0000_0001, b'x', 0xEE]);
        let err = LzssDecoder::default().decode(&stream).unwrap_err();
        assert!(matches!(
            err,
            OxiDatError::Truncated {
                offset: 10,
                produced: 1,
                expected: 10
            }
        ));
    }

    #[test]
    fn test_decode_header_only() {
        let stream = windowed(0, &[]);
        assert!(LzssDecoder::default().decode(&stream).unwrap().is_empty());

        // Declared length with no body is exhaustion, not an error.
        let stream = windowed(42, &[]);
        assert!(LzssDecoder::default().decode(&stream).unwrap().is_empty());
    }

    #[test]
    fn test_decode_stored() {
        let mut stream = Vec::new();
        Header::new(Method::Stored, 4).write_to(&mut stream);
        stream.extend(b"data!!".iter().map(|b| b ^ KEY));

        let decoder = LzssDecoder::default();
        assert_eq!(decoder.decode(&stream).unwrap(), b"data");
        assert_eq!(decoder.decode_with_len(&stream, 100).unwrap(), b"data!!");
    }

    #[test]
    fn test_decode_unknown_tag() {
        let stream = [0x20, b'L', b'Z', b'4', 1, 0, 0, 0, 0xFF];
        let err = LzssDecoder::default().decode(&stream).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_decode_ignores_flag_byte() {
        let mut stream = windowed(1, &[0b1, b'q']);
        stream[0] = 0xC3;
        assert_eq!(LzssDecoder::default().decode(&stream).unwrap(), b"q");
    }

    #[test]
    fn test_decode_observer_mirrors_encoder() {
        let input = b"abracadabra abracadabra abracadabra".to_vec();
        let encoder = LzssEncoder::default();

        let mut enc_stats = StatsObserver::new();
        let stream = encoder.encode_observed(&input, &mut enc_stats).unwrap();

        let mut dec_stats = StatsObserver::new();
        let decoded = LzssDecoder::default()
            .decode_observed(&stream, input.len(), &mut dec_stats)
            .unwrap();

        assert_eq!(decoded, input);
        assert_eq!(enc_stats, dec_stats);
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Control(usize, u8),
        Token(TokenEvent),
    }

    #[derive(Default)]
    struct EventLog(Vec<Event>);

    impl Observer for EventLog {
        fn on_control(&mut self, offset: usize, value: u8) {
            self.0.push(Event::Control(offset, value));
        }

        fn on_token(&mut self, event: &TokenEvent) {
            self.0.push(Event::Token(*event));
        }
    }

    #[test]
    fn test_decode_reports_control_after_its_tokens() {
        let stream = windowed(3, &[0b0000_0111, b'a', b'b', b'c']);
        let mut log = EventLog::default();
        LzssDecoder::default()
            .decode_observed(&stream, 3, &mut log)
            .unwrap();

        assert_eq!(log.0.len(), 4);
        assert_eq!(
            log.0[0],
            Event::Token(TokenEvent::Literal {
                offset: 9,
                value: b'a'
            })
        );
        assert_eq!(log.0[3], Event::Control(8, 0b0000_0111 ^ KEY));
    }

    #[test]
    fn test_decode_event_order_matches_encoder() {
        // Several full groups plus a short final one.
        let input = b"she sells sea shells by the sea shore, she sells sea shells".to_vec();

        let mut enc_log = EventLog::default();
        let stream = LzssEncoder::default()
            .encode_observed(&input, &mut enc_log)
            .unwrap();

        let mut dec_log = EventLog::default();
        LzssDecoder::default()
            .decode_observed(&stream, input.len(), &mut dec_log)
            .unwrap();

        assert!(enc_log.0.iter().filter(|e| matches!(e, Event::Control(..))).count() > 2);
        assert_eq!(enc_log.0, dec_log.0);
    }
}
