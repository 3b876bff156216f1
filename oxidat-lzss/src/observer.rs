//! Diagnostic hooks into the encoder and decoder.
//!
//! An [`Observer`] sees every control byte and every token as it passes
//! through the stream. Observers are purely passive: nothing they do can
//! change the bytes produced.

use crate::token::TokenKind;
use std::fmt;
use std::io::{self, Write};

/// Only every n-th literal is written to a trace.
const LITERAL_SAMPLE: usize = 8;

/// A token as seen in the compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenEvent {
    /// A literal byte.
    Literal {
        /// Stream offset of the data byte.
        offset: usize,
        /// Decoded (un-XORed) byte value.
        value: u8,
    },
    /// A window match.
    Match {
        /// Stream offset of the first of the two data bytes.
        offset: usize,
        /// Absolute window slot.
        distance: u16,
        /// Number of bytes copied.
        length: usize,
    },
}

impl TokenEvent {
    /// Kind of the token.
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Literal { .. } => TokenKind::Literal,
            Self::Match { .. } => TokenKind::Match,
        }
    }

    /// Stream offset of the token's data.
    #[cfg(test)]
    pub fn offset(&self) -> usize {
        match *self {
            Self::Literal { offset, .. } | Self::Match { offset, .. } => offset,
        }
    }
}

impl fmt::Display for TokenEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Literal { offset, value } => write!(f, "[RAW]  @0x{offset:04X}: 0x{value:02X}"),
            Self::Match {
                offset,
                distance,
                length,
            } => write!(f, "[LZ77] @0x{offset:04X}: d=0x{distance:03X} l={length}"),
        }
    }
}

/// Receives stream events from the encoder or decoder.
///
/// Both sides report in the same order: every token of a group first,
/// then the group's control byte. The encoder only knows a control byte
/// once its group closes, and the decoder holds its report back to match.
pub trait Observer {
    /// A control byte at `offset` with its emitted (XORed) `value`.
    fn on_control(&mut self, offset: usize, value: u8) {
        let _ = (offset, value);
    }

    /// A token.
    fn on_token(&mut self, event: &TokenEvent) {
        let _ = event;
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// An absent observer sees nothing.
impl<O: Observer> Observer for Option<O> {
    fn on_control(&mut self, offset: usize, value: u8) {
        if let Some(inner) = self {
            inner.on_control(offset, value);
        }
    }

    fn on_token(&mut self, event: &TokenEvent) {
        if let Some(inner) = self {
            inner.on_token(event);
        }
    }
}

/// A pair forwards every event to both, first `A` then `B`.
impl<A: Observer, B: Observer> Observer for (A, B) {
    fn on_control(&mut self, offset: usize, value: u8) {
        self.0.on_control(offset, value);
        self.1.on_control(offset, value);
    }

    fn on_token(&mut self, event: &TokenEvent) {
        self.0.on_token(event);
        self.1.on_token(event);
    }
}

/// Counts groups and tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsObserver {
    /// Control bytes seen.
    pub control_groups: usize,
    /// Match tokens seen.
    pub matches: usize,
    /// Literal tokens seen.
    pub literals: usize,
    /// Bytes produced by match tokens.
    pub matched_bytes: usize,
}

impl StatsObserver {
    /// Create a zeroed counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total tokens seen.
    pub fn tokens(&self) -> usize {
        self.matches + self.literals
    }
}

impl Observer for StatsObserver {
    fn on_control(&mut self, _offset: usize, _value: u8) {
        self.control_groups += 1;
    }

    fn on_token(&mut self, event: &TokenEvent) {
        match *event {
            TokenEvent::Literal { .. } => self.literals += 1,
            TokenEvent::Match { length, .. } => {
                self.matches += 1;
                self.matched_bytes += length;
            }
        }
    }
}

impl fmt::Display for StatsObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Control groups: {}", self.control_groups)?;
        writeln!(f, "LZ77 blocks:    {}", self.matches)?;
        write!(f, "Raw bytes:      {}", self.literals)
    }
}

/// Forwards events to the `log` facade at trace level.
///
/// Literal lines are sampled (one in [`LITERAL_SAMPLE`]) to keep traces of
/// poorly-compressible data readable.
#[derive(Debug, Default)]
pub struct LogObserver {
    groups: usize,
    literals: usize,
}

impl LogObserver {
    /// Create a new log observer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Observer for LogObserver {
    fn on_control(&mut self, offset: usize, value: u8) {
        self.groups += 1;
        log::trace!(
            "[CTRL] Group {} @0x{:04X} (0x{:02X})",
            self.groups,
            offset,
            value
        );
    }

    fn on_token(&mut self, event: &TokenEvent) {
        if event.kind() == TokenKind::Literal {
            let sampled = self.literals % LITERAL_SAMPLE == 0;
            self.literals += 1;
            if !sampled {
                return;
            }
        }
        log::trace!("{event}");
    }
}

/// Writes a compression log in the `.clog` text layout.
///
/// A banner, one line per control group, match and sampled literal, then
/// a summary of the counts once [`finish`](Self::finish) is called.
/// The first write error is kept and reported by `finish`.
#[derive(Debug)]
pub struct TraceWriter<W: Write> {
    out: W,
    stats: StatsObserver,
    error: Option<io::Error>,
}

impl<W: Write> TraceWriter<W> {
    /// Start a log on `out`.
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "=== Compression Log ===")?;
        Ok(Self {
            out,
            stats: StatsObserver::new(),
            error: None,
        })
    }

    /// Counts so far.
    pub fn stats(&self) -> &StatsObserver {
        &self.stats
    }

    /// Write the summary and hand back the writer.
    pub fn finish(mut self) -> io::Result<(W, StatsObserver)> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        write!(self.out, "\n=== Summary ===\n{}\n", self.stats)?;
        self.out.flush()?;
        Ok((self.out, self.stats))
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if self.error.is_none() {
            if let Err(err) = writeln!(self.out, "{args}") {
                self.error = Some(err);
            }
        }
    }
}

impl<W: Write> Observer for TraceWriter<W> {
    fn on_control(&mut self, offset: usize, value: u8) {
        self.stats.on_control(offset, value);
        let group = self.stats.control_groups;
        self.line(format_args!("[CTRL] Group {group} @0x{offset:04X} (0x{value:02X})"));
    }

    fn on_token(&mut self, event: &TokenEvent) {
        let skip =
            event.kind() == TokenKind::Literal && self.stats.literals % LITERAL_SAMPLE != 0;
        self.stats.on_token(event);
        if !skip {
            self.line(format_args!("{event}"));
        }
    }
}
