// SPDX-License-Identifier: Apache-2.0

//! Recursive-descent decoder for the textual grammar.
//!
//! The grammar is a superset of JSON: strings may use single or double
//! quotes, object keys and scalar values may be unquoted runs of
//! `[0-9A-Za-z_+\-.]`, and `/* ... */` / `// ...` comments may appear
//! anywhere whitespace may. Bare tokens are captured as [`Value::Raw`];
//! deciding whether one means a number, boolean or null is deferred to the
//! value accessors.
//!
//! One call decodes exactly one complete value and consumes nothing past
//! it. Recursion into container elements is bounded by a depth budget that
//! is decremented before and restored after every descent, so adversarial
//! nesting fails with [`DecodeError::TooDeep`] instead of overflowing the
//! native stack.

use crate::arena::Arena;
use crate::error::DecodeError;
use crate::escape::unescape;
use crate::reader::{is_ended, Reader, SliceReader};
use crate::scan::skip_spaces_and_comments;
use crate::sink::{CopySink, SliceSink, StringSink};
use crate::value::{Str, Value};

/// Default depth budget for nested containers.
pub const DEFAULT_NESTING_LIMIT: u8 = 10;

/// Decodes one value from a stable in-memory buffer, borrowing string
/// content out of it wherever no escape forces a copy.
pub fn from_slice<'a>(arena: &mut Arena<'a>, input: &'a [u8]) -> Result<Value<'a>, DecodeError> {
    from_slice_with_limit(arena, input, DEFAULT_NESTING_LIMIT)
}

/// [`from_slice`] with an explicit nesting limit.
pub fn from_slice_with_limit<'a>(
    arena: &mut Arena<'a>,
    input: &'a [u8],
    nesting_limit: u8,
) -> Result<Value<'a>, DecodeError> {
    let mut reader = SliceReader::new(input);
    JsonDecoder::new(arena, &mut reader, SliceSink::new(input), nesting_limit).parse()
}

/// Decodes one value from any [`Reader`]; every string is duplicated into
/// the arena. The reader is borrowed so the caller can keep consuming the
/// source after the decoded value.
pub fn from_reader<'a, R: Reader>(
    arena: &mut Arena<'a>,
    reader: &mut R,
) -> Result<Value<'a>, DecodeError> {
    from_reader_with_limit(arena, reader, DEFAULT_NESTING_LIMIT)
}

/// [`from_reader`] with an explicit nesting limit.
pub fn from_reader_with_limit<'a, R: Reader>(
    arena: &mut Arena<'a>,
    reader: &mut R,
    nesting_limit: u8,
) -> Result<Value<'a>, DecodeError> {
    JsonDecoder::new(arena, reader, CopySink::new(), nesting_limit).parse()
}

struct JsonDecoder<'a, 'r, R, S> {
    arena: &'r mut Arena<'a>,
    reader: &'r mut R,
    sink: S,
    /// Remaining depth budget; reaching zero before a descent is TooDeep.
    nesting: u8,
    /// Bytes consumed so far; feeds span positions to the sink.
    pos: usize,
}

impl<'a, 'r, R: Reader, S: StringSink<'a>> JsonDecoder<'a, 'r, R, S> {
    fn new(arena: &'r mut Arena<'a>, reader: &'r mut R, sink: S, nesting: u8) -> Self {
        Self {
            arena,
            reader,
            sink,
            nesting,
            pos: 0,
        }
    }

    fn advance(&mut self) {
        self.reader.advance();
        self.pos = self.pos.wrapping_add(1);
    }

    /// Consumes `c` if it is the current byte.
    fn eat(&mut self, c: u8) -> bool {
        if self.reader.current() == c {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_ended(&mut self) -> bool {
        is_ended(self.reader)
    }

    fn skip(&mut self) -> Result<(), DecodeError> {
        let n = skip_spaces_and_comments(self.reader)?;
        self.pos = self.pos.wrapping_add(n);
        Ok(())
    }

    fn parse(&mut self) -> Result<Value<'a>, DecodeError> {
        self.skip()?;
        log::trace!("value starts at byte {}", self.pos);
        match self.reader.current() {
            b'[' => self.parse_array(),
            b'{' => self.parse_object(),
            _ => self.parse_value(),
        }
    }

    fn parse_array(&mut self) -> Result<Value<'a>, DecodeError> {
        if self.nesting == 0 {
            return Err(DecodeError::TooDeep);
        }
        let array = self.arena.new_array()?;

        if !self.eat(b'[') {
            return Err(DecodeError::InvalidInput);
        }
        self.skip()?;

        if self.eat(b']') {
            return Ok(Value::Array(array));
        }

        loop {
            self.nesting -= 1;
            let element = self.parse();
            self.nesting += 1;
            self.arena.array_push(array, element?)?;

            self.skip()?;

            if self.eat(b']') {
                return Ok(Value::Array(array));
            }
            if !self.eat(b',') {
                return Err(DecodeError::InvalidInput);
            }
        }
    }

    fn parse_object(&mut self) -> Result<Value<'a>, DecodeError> {
        if self.nesting == 0 {
            return Err(DecodeError::TooDeep);
        }
        let object = self.arena.new_object()?;

        if !self.eat(b'{') {
            return Err(DecodeError::InvalidInput);
        }
        self.skip()?;

        if self.eat(b'}') {
            return Ok(Value::Object(object));
        }

        loop {
            let key = self.parse_string()?;
            self.skip()?;
            if !self.eat(b':') {
                return Err(DecodeError::InvalidInput);
            }

            self.nesting -= 1;
            let value = self.parse();
            self.nesting += 1;
            self.arena.object_set(object, key, value?)?;

            self.skip()?;

            if self.eat(b'}') {
                return Ok(Value::Object(object));
            }
            if !self.eat(b',') {
                return Err(DecodeError::InvalidInput);
            }
            self.skip()?;
        }
    }

    fn parse_value(&mut self) -> Result<Value<'a>, DecodeError> {
        let quoted = is_quote(self.reader.current());
        let s = self.parse_string()?;
        Ok(if quoted {
            Value::String(s)
        } else {
            Value::Raw(s)
        })
    }

    fn parse_string(&mut self) -> Result<Str<'a>, DecodeError> {
        if self.is_ended() {
            return Err(DecodeError::IncompleteInput);
        }
        let first = self.reader.current();

        if is_quote(first) {
            let delim = first;
            self.advance();
            self.sink.begin(self.arena, self.pos);
            loop {
                let c = self.reader.current();
                self.advance();
                if c == delim {
                    break;
                }
                if self.is_ended() {
                    return Err(DecodeError::IncompleteInput);
                }
                if c == b'\\' {
                    let unescaped =
                        unescape(self.reader.current()).ok_or(DecodeError::InvalidInput)?;
                    self.advance();
                    self.sink.push_unescaped(self.arena, unescaped, self.pos)?;
                } else {
                    self.sink.push(self.arena, c)?;
                }
            }
            // The closing delimiter was consumed; content ends before it.
            let end = self.pos.wrapping_sub(1);
            self.sink.finish(self.arena, end)
        } else if is_bare(first) {
            self.sink.begin(self.arena, self.pos);
            let mut c = first;
            loop {
                self.advance();
                self.sink.push(self.arena, c)?;
                c = self.reader.current();
                if !is_bare(c) {
                    break;
                }
            }
            self.sink.finish(self.arena, self.pos)
        } else {
            Err(DecodeError::InvalidInput)
        }
    }
}

fn is_quote(c: u8) -> bool {
    c == b'"' || c == b'\''
}

/// The bare-token alphabet: numbers, `true`/`false`/`null` and any other
/// unquoted identifier are all spelled from these bytes.
fn is_bare(c: u8) -> bool {
    matches!(c, b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' | b'_' | b'+' | b'-' | b'.')
}
