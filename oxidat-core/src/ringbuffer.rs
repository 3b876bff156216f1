//! Ring buffer (sliding window) addressed by absolute slot.
//!
//! Classic LZSS variants of the Okumura family do not describe a match as
//! "N bytes back from here". They name the slot of the history buffer where
//! the source bytes live. Encoder and decoder therefore have to drive two
//! buffers through exactly the same sequence of writes, starting from the
//! same cursor, and this type makes both the cursor and the slots explicit.
//!
//! All index arithmetic is masked, so no operation on a [`RingBuffer`] can
//! fail or go out of bounds.

/// A fixed-capacity circular history buffer with an explicit write cursor.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    /// The underlying buffer.
    buffer: Vec<u8>,
    /// Current write position (next byte will be written here).
    position: usize,
    /// Number of bytes written (up to capacity).
    size: usize,
    /// Mask for efficient modulo (capacity - 1).
    mask: usize,
}

impl RingBuffer {
    /// Create a new zero-filled ring buffer with the cursor at slot 0.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of 2 or is zero.
    pub fn new(capacity: usize) -> Self {
        Self::with_start(capacity, 0)
    }

    /// Create a new zero-filled ring buffer with the cursor at `start`.
    ///
    /// `start` is reduced modulo the capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of 2 or is zero.
    pub fn with_start(capacity: usize, start: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        assert!(
            capacity.is_power_of_two(),
            "Capacity must be a power of 2, got {}",
            capacity
        );

        let mask = capacity - 1;
        Self {
            buffer: vec![0; capacity],
            position: start & mask,
            size: 0,
            mask,
        }
    }

    /// Get the capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Get the number of bytes written so far, saturating at capacity.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Check if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Check if every slot holds written history.
    #[cfg(test)]
    pub fn is_full(&self) -> bool {
        self.size == self.buffer.len()
    }

    /// Get the current write position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Write a single byte at the cursor and advance it.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.buffer[self.position] = byte;
        self.position = (self.position + 1) & self.mask;
        if self.size < self.buffer.len() {
            self.size += 1;
        }
    }

    /// Write multiple bytes in order.
    pub fn push_slice(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.push(byte);
        }
    }

    /// Read the byte stored at an absolute slot.
    ///
    /// `index` is reduced modulo the capacity.
    #[inline]
    pub fn read(&self, index: usize) -> u8 {
        self.buffer[index & self.mask]
    }

    /// Slot index `back` writes behind the cursor.
    ///
    /// `back == 1` is the slot of the most recently written byte.
    pub fn slot_behind(&self, back: usize) -> usize {
        self.position.wrapping_sub(back) & self.mask
    }

    /// Copy `length` bytes starting at absolute slot `index`.
    ///
    /// Each copied byte is written back at the cursor before the next one
    /// is read, so a source range that runs into the cursor repeats the
    /// bytes this same copy just produced. Copied bytes are appended to
    /// `output`.
    pub fn copy_from_slot(&mut self, index: usize, length: usize, output: &mut Vec<u8>) {
        output.reserve(length);
        for offset in 0..length {
            let byte = self.read(index.wrapping_add(offset));
            self.push(byte);
            output.push(byte);
        }
    }

    /// Get the last N bytes written.
    #[cfg(test)]
    pub fn last_bytes(&self, count: usize) -> Vec<u8> {
        let count = count.min(self.size);
        (0..count)
            .map(|i| self.read(self.slot_behind(count - i)))
            .collect()
    }
}
