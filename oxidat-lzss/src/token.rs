//! LZSS tokens and their two-byte match packing.

/// Shortest match worth a token. Anything shorter costs more than literals.
pub const MIN_MATCH: usize = 3;

/// Longest match a token can describe (4-bit length field plus [`MIN_MATCH`]).
pub const MAX_MATCH: usize = 18;

/// Kind of a token, as selected by one control bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Control bit 1.
    Literal,
    /// Control bit 0.
    Match,
}

/// LZSS token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A literal byte.
    Literal(u8),
    /// A copy from the history window.
    Match {
        /// Absolute window slot of the first source byte (12 bits).
        distance: u16,
        /// Number of bytes to copy ([`MIN_MATCH`]..=[`MAX_MATCH`]).
        length: u8,
    },
}

impl Token {
    /// Kind of this token.
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Literal(_) => TokenKind::Literal,
            Self::Match { .. } => TokenKind::Match,
        }
    }

    /// Number of input bytes this token stands for.
    pub fn expanded_len(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::Match { length, .. } => usize::from(*length),
        }
    }

    /// Number of data bytes this token occupies in the stream.
    #[cfg(test)]
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::Match { .. } => 2,
        }
    }

    /// Append the token's data bytes, XORed with `key`.
    pub fn write_to(&self, out: &mut Vec<u8>, key: u8) {
        match *self {
            Self::Literal(byte) => out.push(byte ^ key),
            Self::Match { distance, length } => {
                let [lo, hi] = pack_match(distance, usize::from(length));
                out.push(lo ^ key);
                out.push(hi ^ key);
            }
        }
    }
}

/// Pack a match into its two data bytes (before XOR).
///
/// The first byte is the low 8 bits of the 12-bit slot. The second holds
/// slot bits 8..12 in its high nibble and `length - 3` in its low nibble.
pub fn pack_match(distance: u16, length: usize) -> [u8; 2] {
    let lo = (distance & 0xFF) as u8;
    let hi = (((distance >> 4) & 0xF0) as u8) | ((length.wrapping_sub(MIN_MATCH) & 0x0F) as u8);
    [lo, hi]
}

/// Inverse of [`pack_match`]: returns `(distance, length)`.
pub fn unpack_match(bytes: [u8; 2]) -> (u16, usize) {
    let [lo, hi] = bytes;
    let distance = u16::from(lo) | (u16::from(hi & 0xF0) << 4);
    let length = usize::from(hi & 0x0F) + MIN_MATCH;
    (distance, length)
}
