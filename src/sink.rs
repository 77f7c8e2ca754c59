// SPDX-License-Identifier: Apache-2.0

//! String accumulation: the writer capability of the decoders.
//!
//! A sink collects the content bytes of one string (key or value) and
//! materializes a [`Str`]. [`CopySink`] always duplicates into the arena;
//! [`SliceSink`] borrows the raw span of a stable input slice and only
//! falls back to copying when the first escape makes the decoded content
//! diverge from the input.

use crate::arena::Arena;
use crate::error::DecodeError;
use crate::value::Str;

/// Accumulates one string at a time.
///
/// Positions are offsets of the decoder's byte counter. Between `begin(pos)`
/// and `finish(pos)` every literal content byte is reported through `push`
/// in input order, so a position-tracking sink may ignore `push` entirely
/// and reconstruct content from spans; substituted bytes go through
/// `push_unescaped` with the position just past the two-byte escape.
pub(crate) trait StringSink<'a> {
    fn begin(&mut self, arena: &mut Arena<'a>, pos: usize);

    fn push(&mut self, arena: &mut Arena<'a>, b: u8) -> Result<(), DecodeError>;

    fn push_unescaped(
        &mut self,
        arena: &mut Arena<'a>,
        b: u8,
        pos: usize,
    ) -> Result<(), DecodeError>;

    /// Seals the string. `pos` is the offset just past the last content
    /// byte (excluding any closing delimiter).
    fn finish(&mut self, arena: &mut Arena<'a>, pos: usize) -> Result<Str<'a>, DecodeError>;
}

/// Sink that duplicates every string into arena-owned storage. Used for
/// sources whose bytes are transient (iterators, streams).
#[derive(Debug, Default)]
pub(crate) struct CopySink {
    mark: usize,
}

impl CopySink {
    pub(crate) fn new() -> Self {
        Self { mark: 0 }
    }
}

impl<'a> StringSink<'a> for CopySink {
    fn begin(&mut self, arena: &mut Arena<'a>, _pos: usize) {
        self.mark = arena.bytes_mark();
    }

    fn push(&mut self, arena: &mut Arena<'a>, b: u8) -> Result<(), DecodeError> {
        arena.push_byte(b)
    }

    fn push_unescaped(
        &mut self,
        arena: &mut Arena<'a>,
        b: u8,
        _pos: usize,
    ) -> Result<(), DecodeError> {
        arena.push_byte(b)
    }

    fn finish(&mut self, arena: &mut Arena<'a>, _pos: usize) -> Result<Str<'a>, DecodeError> {
        arena.finish_bytes(self.mark).map(Str::Owned)
    }
}

/// Zero-copy sink over a stable input slice.
///
/// While the content matches the input verbatim nothing is written; the
/// string finishes as a borrowed span. The first escape switches to copy
/// mode: the span seen so far moves into the arena and the rest follows,
/// span by span, on each later escape and at finish.
#[derive(Debug)]
pub(crate) struct SliceSink<'a> {
    input: &'a [u8],
    start: usize,
    last_copied: usize,
    copying: bool,
    mark: usize,
}

impl<'a> SliceSink<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            start: 0,
            last_copied: 0,
            copying: false,
            mark: 0,
        }
    }

    fn copy_span(
        &mut self,
        arena: &mut Arena<'a>,
        end: usize,
    ) -> Result<(), DecodeError> {
        let span = self
            .input
            .get(self.last_copied..end)
            .ok_or(DecodeError::InvalidInput)?;
        arena.push_slice(span)
    }
}

impl<'a> StringSink<'a> for SliceSink<'a> {
    fn begin(&mut self, _arena: &mut Arena<'a>, pos: usize) {
        self.start = pos;
        self.last_copied = pos;
        self.copying = false;
    }

    fn push(&mut self, _arena: &mut Arena<'a>, _b: u8) -> Result<(), DecodeError> {
        // Literal bytes are covered by span copies keyed on positions.
        Ok(())
    }

    fn push_unescaped(
        &mut self,
        arena: &mut Arena<'a>,
        b: u8,
        pos: usize,
    ) -> Result<(), DecodeError> {
        // The backslash sits two bytes before the position past the escape.
        let backslash = pos.checked_sub(2).ok_or(DecodeError::InvalidInput)?;
        if !self.copying {
            self.copying = true;
            self.mark = arena.bytes_mark();
        }
        self.copy_span(arena, backslash)?;
        arena.push_byte(b)?;
        self.last_copied = pos;
        Ok(())
    }

    fn finish(&mut self, arena: &mut Arena<'a>, pos: usize) -> Result<Str<'a>, DecodeError> {
        if self.copying {
            self.copy_span(arena, pos)?;
            arena.finish_bytes(self.mark).map(Str::Owned)
        } else {
            self.input
                .get(self.start..pos)
                .map(Str::Borrowed)
                .ok_or(DecodeError::InvalidInput)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_sink_owns_everything() {
        let mut arena = Arena::new();
        let mut sink = CopySink::new();
        sink.begin(&mut arena, 0);
        for b in b"abc" {
            sink.push(&mut arena, *b).unwrap();
        }
        let s = sink.finish(&mut arena, 3).unwrap();
        assert!(matches!(s, Str::Owned(_)));
        assert_eq!(arena.str_bytes(s), b"abc");
    }

    #[test]
    fn slice_sink_borrows_when_clean() {
        let input = b"say hello";
        let mut arena = Arena::new();
        let mut sink = SliceSink::new(input);
        sink.begin(&mut arena, 4);
        for (i, b) in input[4..].iter().enumerate() {
            let _ = i;
            sink.push(&mut arena, *b).unwrap();
        }
        let s = sink.finish(&mut arena, input.len()).unwrap();
        assert!(matches!(s, Str::Borrowed(b"hello")));
        // Nothing was charged to the arena.
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn slice_sink_copies_on_escape() {
        // Content of r"he\nllo" starting at offset 0.
        let input = b"he\\nllo";
        let mut arena = Arena::new();
        let mut sink = SliceSink::new(input);
        sink.begin(&mut arena, 0);
        sink.push(&mut arena, b'h').unwrap();
        sink.push(&mut arena, b'e').unwrap();
        // Decoder consumed the two escape bytes; position is now 4.
        sink.push_unescaped(&mut arena, b'\n', 4).unwrap();
        for b in b"llo" {
            sink.push(&mut arena, *b).unwrap();
        }
        let s = sink.finish(&mut arena, input.len()).unwrap();
        assert!(matches!(s, Str::Owned(_)));
        assert_eq!(arena.str_bytes(s), b"he\nllo");
    }

    #[test]
    fn slice_sink_strings_are_independent() {
        let input = b"a\\tb c";
        let mut arena = Arena::new();
        let mut sink = SliceSink::new(input);

        sink.begin(&mut arena, 0);
        sink.push(&mut arena, b'a').unwrap();
        sink.push_unescaped(&mut arena, b'\t', 3).unwrap();
        sink.push(&mut arena, b'b').unwrap();
        let first = sink.finish(&mut arena, 4).unwrap();

        sink.begin(&mut arena, 5);
        sink.push(&mut arena, b'c').unwrap();
        let second = sink.finish(&mut arena, 6).unwrap();

        assert_eq!(arena.str_bytes(first), b"a\tb");
        assert!(matches!(second, Str::Borrowed(b"c")));
    }

    #[test]
    fn slice_sink_reports_exhaustion() {
        let input = b"x\\ny";
        let mut arena = Arena::with_capacity(0);
        let mut sink = SliceSink::new(input);
        sink.begin(&mut arena, 0);
        sink.push(&mut arena, b'x').unwrap();
        assert_eq!(
            sink.push_unescaped(&mut arena, b'\n', 3),
            Err(DecodeError::NoMemory)
        );
    }
}
