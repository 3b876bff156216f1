//! Control-byte framing.
//!
//! Tokens travel in groups of up to eight. Each group is preceded by one
//! control byte whose bit `k` (LSB first) is 1 when token `k` is a literal
//! and 0 when it is a match. Unused bits of a short final group stay 0.

use crate::token::TokenKind;

/// Number of tokens described by one control byte.
pub const GROUP_SIZE: u8 = 8;

/// Builds control bytes while the encoder appends token data.
///
/// The control byte slot is reserved in the output when a group opens and
/// patched once the group closes, so token data can be written straight
/// into the output buffer.
#[derive(Debug)]
pub struct ControlWriter {
    key: u8,
    slot: usize,
    mask: u8,
    count: u8,
    open: bool,
}

impl ControlWriter {
    /// Create a writer that XORs closed control bytes with `key`.
    pub fn new(key: u8) -> Self {
        Self {
            key,
            slot: 0,
            mask: 0,
            count: 0,
            open: false,
        }
    }

    /// Record the next token's kind, opening a group if needed.
    ///
    /// Must be called before the token's data bytes are written.
    pub fn record(&mut self, out: &mut Vec<u8>, kind: TokenKind) {
        if !self.open {
            self.slot = out.len();
            out.push(0);
            self.mask = 0;
            self.count = 0;
            self.open = true;
        }
        if kind == TokenKind::Literal {
            self.mask |= 1 << self.count;
        }
        self.count += 1;
    }

    /// Whether the open group already holds eight tokens.
    pub fn is_full(&self) -> bool {
        self.open && self.count == GROUP_SIZE
    }

    /// Close the open group, writing its control byte.
    ///
    /// Returns the offset and the emitted (XORed) value of the control
    /// byte, or `None` if no group was open.
    pub fn close(&mut self, out: &mut [u8]) -> Option<(usize, u8)> {
        if !self.open {
            return None;
        }
        self.open = false;
        let value = self.mask ^ self.key;
        out[self.slot] = value;
        Some((self.slot, value))
    }
}

/// Queue of pending control bits on the decoding side.
///
/// Bits left in the current group are counted explicitly, so no sentinel
/// bit is needed to detect an empty queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagQueue {
    bits: u8,
    remaining: u8,
}

impl FlagQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a new control byte is needed before the next token.
    pub fn needs_refill(&self) -> bool {
        self.remaining == 0
    }

    /// Load eight bits from a control byte (already un-XORed).
    pub fn refill(&mut self, control: u8) {
        self.bits = control;
        self.remaining = GROUP_SIZE;
    }

    /// Pop the next token kind, or `None` if the queue is empty.
    pub fn next_kind(&mut self) -> Option<TokenKind> {
        if self.remaining == 0 {
            return None;
        }
        let bit = self.bits & 1;
        self.bits >>= 1;
        self.remaining -= 1;
        Some(if bit == 1 {
            TokenKind::Literal
        } else {
            TokenKind::Match
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_full_group() {
        let mut out = Vec::new();
        let mut writer = ControlWriter::new(0x72);
        for i in 0..8 {
            let kind = if i % 2 == 0 {
                TokenKind::Literal
            } else {
                TokenKind::Match
            };
            writer.record(&mut out, kind);
            out.push(0xEE);
        }
        assert!(writer.is_full());
        assert_eq!(writer.close(&mut out), Some((0, 0b0101_0101 ^ 0x72)));
        assert_eq!(out.len(), 9);
        assert_eq!(writer.close(&mut out), None);
    }

    #[test]
    fn test_writer_short_group_pads_with_zero_bits() {
        let mut out = vec![0xAA; 3];
        let mut writer = ControlWriter::new(0x00);
        writer.record(&mut out, TokenKind::Literal);
        writer.record(&mut out, TokenKind::Literal);
        writer.record(&mut out, TokenKind::Match);
        assert!(!writer.is_full());
        assert_eq!(writer.close(&mut out), Some((3, 0b0000_0011)));
        assert_eq!(out[3], 0b0000_0011);
    }

    #[test]
    fn test_writer_opens_new_group_after_close() {
        let mut out = Vec::new();
        let mut writer = ControlWriter::new(0);
        for _ in 0..8 {
            writer.record(&mut out, TokenKind::Match);
        }
        writer.close(&mut out);
        writer.record(&mut out, TokenKind::Literal);
        assert_eq!(writer.close(&mut out), Some((1, 1)));
    }

    #[test]
    fn test_flag_queue_lsb_first() {
        let mut queue = FlagQueue::new();
        assert!(queue.needs_refill());
        assert_eq!(queue.next_kind(), None);

        queue.refill(0b1000_0001);
        assert!(!queue.needs_refill());
        assert_eq!(queue.next_kind(), Some(TokenKind::Literal));
        for _ in 0..6 {
            assert_eq!(queue.next_kind(), Some(TokenKind::Match));
        }
        assert_eq!(queue.next_kind(), Some(TokenKind::Literal));
        assert!(queue.needs_refill());
        assert_eq!(queue.next_kind(), None);
    }
}
