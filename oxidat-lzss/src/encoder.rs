//! Windowed LZSS encoder (compression).

use crate::config::LzssConfig;
use crate::control::ControlWriter;
use crate::header::{HEADER_SIZE, Header, Method};
use crate::observer::{NoopObserver, Observer, TokenEvent};
use crate::token::{MAX_MATCH, MIN_MATCH, Token};
use crate::window::Window;
use oxidat_core::error::{OxiDatError, Result};

/// LZSS encoder producing `"3;1"` streams.
///
/// The encoder holds only configuration; every call builds its own window,
/// so one encoder can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct LzssEncoder {
    config: LzssConfig,
}

impl LzssEncoder {
    /// Create a new encoder.
    pub fn new(config: LzssConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &LzssConfig {
        &self.config
    }

    /// Encode `input` into a windowed stream.
    ///
    /// # Errors
    ///
    /// Fails only for inputs longer than `u32::MAX` bytes, which the header
    /// cannot describe.
    pub fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.encode_observed(input, &mut NoopObserver)
    }

    /// Encode `input`, reporting every control byte and token to `observer`.
    ///
    /// # Algorithm
    ///
    /// 1. Write the 8-byte header (flag, `"3;1"`, original length)
    /// 2. At each input position with at least 3 bytes of history, find the
    ///    longest earlier run (up to 18 bytes) equal to the upcoming bytes
    /// 3. Emit a match for runs of 3 or more, otherwise a literal
    /// 4. Push the consumed bytes into the window
    /// 5. Frame tokens in groups of 8 behind a control byte
    pub fn encode_observed(&self, input: &[u8], observer: &mut dyn Observer) -> Result<Vec<u8>> {
        let original_len =
            u32::try_from(input.len()).map_err(|_| OxiDatError::input_too_large(input.len()))?;
        let key = self.config.xor_key;

        let mut out = Vec::with_capacity(HEADER_SIZE + input.len() + input.len() / 8 + 1);
        Header::new(Method::Windowed, original_len)
            .with_flag(self.config.flag_byte)
            .write_to(&mut out);

        let mut window = Window::new();
        let mut control = ControlWriter::new(key);
        let mut cursor = 0;

        while cursor < input.len() {
            let found = if window.filled() >= MIN_MATCH {
                self.find_match(input, cursor)
            } else {
                None
            };

            let token = match found {
                Some((start, length)) => Token::Match {
                    distance: window.slot_for(cursor, start),
                    length: length as u8,
                },
                None => Token::Literal(input[cursor]),
            };

            control.record(&mut out, token.kind());
            let offset = out.len();
            token.write_to(&mut out, key);
            observer.on_token(&match token {
                Token::Literal(value) => TokenEvent::Literal { offset, value },
                Token::Match { distance, length } => TokenEvent::Match {
                    offset,
                    distance,
                    length: usize::from(length),
                },
            });

            let consumed = token.expanded_len();
            window.push_slice(&input[cursor..cursor + consumed]);
            cursor += consumed;

            if control.is_full() {
                if let Some((at, value)) = control.close(&mut out) {
                    observer.on_control(at, value);
                }
            }
        }

        if let Some((at, value)) = control.close(&mut out) {
            observer.on_control(at, value);
        }

        log::debug!(
            "lzss: encoded {} bytes into {} bytes",
            input.len(),
            out.len()
        );

        Ok(out)
    }

    /// Find the longest earlier run equal to the bytes at `cursor`.
    ///
    /// Candidates never extend into the lookahead (`start + len <= cursor`).
    /// Among equally long candidates the earliest start wins.
    ///
    /// Returns `(start, length)` for runs of at least [`MIN_MATCH`] bytes.
    fn find_match(&self, input: &[u8], cursor: usize) -> Option<(usize, usize)> {
        let search_start = cursor.saturating_sub(self.config.effective_search_span());
        let max_len = MAX_MATCH.min(input.len() - cursor);
        let lookahead = &input[cursor..cursor + max_len];

        let mut best_len = 0;
        let mut best_start = 0;

        // Simple brute-force search over the bounded span
        for start in search_start..cursor {
            let limit = max_len.min(cursor - start);
            let len = input[start..start + limit]
                .iter()
                .zip(lookahead)
                .take_while(|(a, b)| a == b)
                .count();

            if len > best_len {
                best_len = len;
                best_start = start;
                if len == max_len {
                    break;
                }
            }
        }

        (best_len >= MIN_MATCH).then_some((best_start, best_len))
    }
}
