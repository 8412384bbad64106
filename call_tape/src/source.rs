// Copyright 2026 the Call Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Byte sources feeding the trace parser.
//!
//! Capture containers are typically block-compressed and live outside this
//! crate; the parser only needs the small random-access surface modeled by
//! [`ByteSource`]. [`MemorySource`] implements it over an owned buffer for
//! embedders (and tests) that load a capture whole.

use alloc::vec::Vec;

/// A synchronous, seekable stream of capture bytes.
///
/// End of stream is not an error: [`read_byte`](Self::read_byte) returns
/// `None`, and [`read`](Self::read)/[`skip`](Self::skip) truncate silently.
/// The parser tolerates EOF at every read boundary, so implementations must
/// never panic on reads past the end.
pub trait ByteSource {
    /// Reads the next byte, or `None` at end of stream.
    fn read_byte(&mut self) -> Option<u8>;

    /// Reads up to `buf.len()` bytes into `buf` and returns how many were
    /// read. Short reads happen only at end of stream.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Advances the stream by at most `len` bytes.
    fn skip(&mut self, len: u64);

    /// Returns the current byte offset from the start of the stream.
    fn offset(&self) -> u64;

    /// Repositions the stream.
    ///
    /// Only offsets previously observed via [`offset`](Self::offset) need to
    /// be reachable; seeking past the end clamps to the end.
    fn seek(&mut self, offset: u64);
}

/// A [`ByteSource`] over an owned in-memory buffer.
///
/// # Example
/// ```
/// use call_tape::source::{ByteSource, MemorySource};
///
/// let mut source = MemorySource::new([0x07, 0x2a]);
/// assert_eq!(source.read_byte(), Some(0x07));
/// assert_eq!(source.offset(), 1);
/// source.seek(0);
/// assert_eq!(source.read_byte(), Some(0x07));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    bytes: Vec<u8>,
    pos: usize,
}

impl MemorySource {
    /// Creates a source over `bytes`, positioned at the start.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            pos: 0,
        }
    }

    /// Consumes the source and returns the underlying buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}

impl ByteSource for MemorySource {
    fn read_byte(&mut self) -> Option<u8> {
        let b = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        let rest = &self.bytes[self.pos..];
        let n = buf.len().min(rest.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        n
    }

    fn skip(&mut self, len: u64) {
        let rest = (self.bytes.len() - self.pos) as u64;
        self.pos += len.min(rest) as usize;
    }

    fn offset(&self) -> u64 {
        self.pos as u64
    }

    fn seek(&mut self, offset: u64) {
        self.pos = (offset as usize).min(self.bytes.len());
    }
}
