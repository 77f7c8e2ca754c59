// SPDX-License-Identifier: Apache-2.0

//! The byte-source capability the decoders consume.
//!
//! A [`Reader`] is a cursor over a byte source: look at the current byte,
//! optionally look one byte ahead, advance, and report exhaustion. Adapters
//! differ only in how `ended`/`peek` are realized; the decoders are
//! source-agnostic.

/// Minimal capability over a byte source.
///
/// Methods take `&mut self` because stream-backed adapters fetch lazily.
pub trait Reader {
    /// The byte at the cursor, without consuming it. Returns the `0`
    /// sentinel once input is exhausted.
    fn current(&mut self) -> u8;

    /// One-byte lookahead past [`Self::current`], `0` at or past the end.
    /// Only the comment scanner needs this; it is never called without a
    /// preceding `current`.
    fn peek(&mut self) -> u8;

    /// Advances the cursor by one byte; a no-op past the end.
    fn advance(&mut self);

    /// True once no further bytes are available. Adapters that cannot know
    /// (sentinel-terminated sources) report false and rely on `current`
    /// returning `0`.
    fn ended(&mut self) -> bool;
}

/// End-of-input as the textual decoder sees it: either the source says so,
/// or the zero sentinel showed up.
pub(crate) fn is_ended<R: Reader>(r: &mut R) -> bool {
    r.current() == 0 || r.ended()
}

/// Reader over an in-memory byte slice with a known length.
///
/// The only adapter the zero-copy decode paths accept, since its backing
/// buffer is stable for the whole parse.
#[derive(Debug)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far. After a successful decode the cursor sits
    /// exactly past the one value that was parsed.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Reader for SliceReader<'_> {
    fn current(&mut self) -> u8 {
        self.data.get(self.pos).copied().unwrap_or(0)
    }

    fn peek(&mut self) -> u8 {
        self.data
            .get(self.pos.wrapping_add(1))
            .copied()
            .unwrap_or(0)
    }

    fn advance(&mut self) {
        if self.pos < self.data.len() {
            self.pos += 1;
        }
    }

    fn ended(&mut self) -> bool {
        self.pos >= self.data.len()
    }
}

/// Reader over any byte iterator, the begin/end range adapter.
///
/// Keeps a two-byte window so `peek` works on plain iterators.
#[derive(Debug)]
pub struct IterReader<I> {
    iter: I,
    cur: Option<u8>,
    ahead: Option<u8>,
}

impl<I: Iterator<Item = u8>> IterReader<I> {
    pub fn new(mut iter: I) -> Self {
        let cur = iter.next();
        let ahead = iter.next();
        Self { iter, cur, ahead }
    }
}

impl<I: Iterator<Item = u8>> Reader for IterReader<I> {
    fn current(&mut self) -> u8 {
        self.cur.unwrap_or(0)
    }

    fn peek(&mut self) -> u8 {
        self.ahead.unwrap_or(0)
    }

    fn advance(&mut self) {
        self.cur = self.ahead.take();
        self.ahead = self.iter.next();
    }

    fn ended(&mut self) -> bool {
        self.cur.is_none()
    }
}

/// Reader over a NUL-terminated buffer.
///
/// `ended` always reports false; termination relies entirely on the zero
/// sentinel, so this adapter is only suitable for the textual decoder and
/// for sources that actually terminate.
#[derive(Debug)]
pub struct CStrReader<'a> {
    /// Includes the trailing NUL, so the cursor can rest on it forever.
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> CStrReader<'a> {
    pub fn new(s: &'a core::ffi::CStr) -> Self {
        Self {
            bytes: s.to_bytes_with_nul(),
            pos: 0,
        }
    }
}

impl Reader for CStrReader<'_> {
    fn current(&mut self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    fn peek(&mut self) -> u8 {
        self.bytes
            .get(self.pos.wrapping_add(1))
            .copied()
            .unwrap_or(0)
    }

    fn advance(&mut self) {
        // Stop on the NUL, never past it.
        if self.pos.wrapping_add(1) < self.bytes.len() {
            self.pos += 1;
        }
    }

    fn ended(&mut self) -> bool {
        false
    }
}

/// Blocking single-byte stream reader.
///
/// Reads one byte at a time and treats a short read (or an I/O error) as
/// end-of-input. Fetches lazily so that `peek` never blocks before the
/// current byte has been looked at.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoReader<R> {
    inner: R,
    /// Outer `None`: not fetched yet. Inner `None`: the stream ended.
    cur: Option<Option<u8>>,
    ahead: Option<Option<u8>>,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> IoReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cur: None,
            ahead: None,
        }
    }

    /// Hands the underlying stream back, e.g. to keep reading past the
    /// decoded value.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_one(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.inner.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }

    fn fill_cur(&mut self) {
        if self.cur.is_none() {
            let b = self.read_one();
            self.cur = Some(b);
        }
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> Reader for IoReader<R> {
    fn current(&mut self) -> u8 {
        self.fill_cur();
        self.cur.unwrap_or(None).unwrap_or(0)
    }

    fn peek(&mut self) -> u8 {
        self.fill_cur();
        if self.ahead.is_none() {
            let b = self.read_one();
            self.ahead = Some(b);
        }
        self.ahead.unwrap_or(None).unwrap_or(0)
    }

    fn advance(&mut self) {
        // Consume the current byte even if nobody looked at it.
        self.fill_cur();
        self.cur = self.ahead.take();
    }

    fn ended(&mut self) -> bool {
        self.fill_cur();
        self.cur == Some(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_reader_walks_and_stops() {
        let mut r = SliceReader::new(b"ab");
        assert_eq!(r.current(), b'a');
        assert_eq!(r.peek(), b'b');
        assert!(!r.ended());
        r.advance();
        assert_eq!(r.current(), b'b');
        assert_eq!(r.peek(), 0);
        r.advance();
        assert!(r.ended());
        assert_eq!(r.current(), 0);
        assert_eq!(r.position(), 2);
        // Advancing past the end is a no-op.
        r.advance();
        assert_eq!(r.position(), 2);
    }

    #[test]
    fn slice_reader_empty() {
        let mut r = SliceReader::new(b"");
        assert!(r.ended());
        assert_eq!(r.current(), 0);
        assert_eq!(r.peek(), 0);
    }

    #[test]
    fn iter_reader_lookahead() {
        let mut r = IterReader::new(b"xyz".iter().copied());
        assert_eq!(r.current(), b'x');
        assert_eq!(r.peek(), b'y');
        r.advance();
        r.advance();
        assert_eq!(r.current(), b'z');
        assert_eq!(r.peek(), 0);
        assert!(!r.ended());
        r.advance();
        assert!(r.ended());
        assert_eq!(r.current(), 0);
    }

    #[test]
    fn cstr_reader_rests_on_sentinel() {
        let s = core::ffi::CStr::from_bytes_with_nul(b"hi\0").unwrap();
        let mut r = CStrReader::new(s);
        assert_eq!(r.current(), b'h');
        assert_eq!(r.peek(), b'i');
        r.advance();
        r.advance();
        assert_eq!(r.current(), 0);
        // Sentinel-terminated sources never report ended.
        assert!(!r.ended());
        r.advance();
        assert_eq!(r.current(), 0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn io_reader_single_byte_reads() {
        let mut r = IoReader::new(std::io::Cursor::new(b"ok".to_vec()));
        assert!(!r.ended());
        assert_eq!(r.current(), b'o');
        assert_eq!(r.peek(), b'k');
        r.advance();
        assert_eq!(r.current(), b'k');
        r.advance();
        assert!(r.ended());
        assert_eq!(r.current(), 0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn io_reader_advance_without_look() {
        // Bytes are consumed in order even when current() was never called.
        let mut r = IoReader::new(std::io::Cursor::new(b"abc".to_vec()));
        r.advance();
        assert_eq!(r.current(), b'b');
        r.advance();
        assert_eq!(r.current(), b'c');
    }

    #[cfg(feature = "std")]
    #[test]
    fn io_reader_nul_bytes_are_data() {
        // Unlike sentinel sources, a stream can carry NUL bytes; only
        // ended() is authoritative here.
        let mut r = IoReader::new(std::io::Cursor::new(vec![0u8, 7u8]));
        assert!(!r.ended());
        assert_eq!(r.current(), 0);
        r.advance();
        assert_eq!(r.current(), 7);
        r.advance();
        assert!(r.ended());
    }
}
