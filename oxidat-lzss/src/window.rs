//! The 4 KB history window shared in lockstep by encoder and decoder.

use oxidat_core::RingBuffer;

/// Window capacity in bytes.
pub const WINDOW_SIZE: usize = 4096;

/// Initial write cursor. Both sides must start here or match slots diverge.
pub const WINDOW_START: usize = 0xFEE;

/// Upper bound on how far back the encoder searches.
pub const MAX_SEARCH_SPAN: usize = WINDOW_SIZE - 8;

/// History window addressed by absolute slot.
///
/// One window lives for exactly one encode or decode call.
#[derive(Debug, Clone)]
pub struct Window {
    ring: RingBuffer,
}

impl Window {
    /// Create a zero-filled window with the cursor at [`WINDOW_START`].
    pub fn new() -> Self {
        Self {
            ring: RingBuffer::with_start(WINDOW_SIZE, WINDOW_START),
        }
    }

    /// Slot the next byte will be written to.
    pub fn pos(&self) -> usize {
        self.ring.position()
    }

    /// Number of bytes of valid history (saturates at [`WINDOW_SIZE`]).
    pub fn filled(&self) -> usize {
        self.ring.len()
    }

    /// Append one byte of history.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.ring.push(byte);
    }

    /// Append several bytes of history in order.
    pub fn push_slice(&mut self, bytes: &[u8]) {
        self.ring.push_slice(bytes);
    }

    /// Byte currently stored at an absolute slot.
    #[inline]
    pub fn read(&self, index: usize) -> u8 {
        self.ring.read(index)
    }

    /// Slot holding input byte `match_start` while the encoder sits at `cursor`.
    ///
    /// This is the value a match token carries as its distance.
    pub fn slot_for(&self, cursor: usize, match_start: usize) -> u16 {
        // Masked to 12 bits, so the cast cannot truncate.
        self.ring.slot_behind(cursor - match_start) as u16
    }

    /// Replay a match: copy `length` bytes from slot `distance` onwards,
    /// appending them to both the window and `output`.
    pub fn copy_match(&mut self, distance: u16, length: usize, output: &mut Vec<u8>) {
        self.ring.copy_from_slot(usize::from(distance), length, output);
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}
