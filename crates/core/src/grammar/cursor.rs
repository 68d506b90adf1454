//! Byte cursor over an in-memory RTF document.
//!
//! All token matchers follow a bounded-probe-then-rewind discipline: they
//! read a fixed maximal window for their token kind, match against it, and
//! either seek to exactly the end of the match or seek back to the position
//! held before the probe. The cursor makes both moves cheap.

/// A seekable cursor over the document bytes, exclusively owned by one parse.
#[derive(Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    barrier: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            barrier: 0,
        }
    }

    /// Current byte offset.
    pub fn tell(&self) -> usize {
        self.pos
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True when the cursor has consumed every byte.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Read up to `n` bytes and advance. Returns a short slice at end of
    /// input and an empty slice when no bytes remain.
    pub fn read(&mut self, n: usize) -> &'a [u8] {
        let end = (self.pos + n).min(self.buf.len());
        let out = &self.buf[self.pos..end];
        self.pos = end;
        out
    }

    /// Read up to `n` bytes without advancing.
    pub fn peek(&self, n: usize) -> &'a [u8] {
        let end = (self.pos + n).min(self.buf.len());
        &self.buf[self.pos..end]
    }

    /// Seek to an absolute offset, clamped to the buffer length.
    pub fn seek_to(&mut self, pos: usize) {
        self.pos = pos.min(self.buf.len());
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, delta: isize) {
        let pos = self.pos as isize + delta;
        self.pos = pos.clamp(0, self.buf.len() as isize) as usize;
    }

    /// Forbid the escape look-behind from crossing `pos`. Called after raw
    /// payload bytes are consumed: a payload ending in backslashes must not
    /// escape the structural byte that follows it.
    pub fn set_escape_barrier(&mut self, pos: usize) {
        self.barrier = pos.min(self.buf.len());
    }

    /// Whether the byte at `pos` is escaped: preceded by an odd-length run of
    /// backslashes. An even run means the backslashes pair up into literal
    /// `\\` sequences and the byte at `pos` keeps its structural meaning.
    /// The count stops at the escape barrier.
    pub fn is_escaped_at(&self, pos: usize) -> bool {
        let mut count = 0usize;
        let mut i = pos;
        while i > self.barrier && self.buf[i - 1] == b'\\' {
            count += 1;
            i -= 1;
        }
        count % 2 == 1
    }
}
