// SPDX-License-Identifier: Apache-2.0

//! Decoder for the MessagePack-compatible binary encoding.
//!
//! Structurally the same machine as the textual decoder: a leading tag
//! byte selects the value kind, containers carry their element count up
//! front, and the recursive descent is bounded by the same depth budget.
//! Multi-byte length and value fields are big-endian, read byte-at-a-time
//! through the [`Reader`], so truncation anywhere surfaces as
//! [`DecodeError::IncompleteInput`] and a reserved tag as
//! [`DecodeError::InvalidInput`].
//!
//! `bin` payloads decode as string values; the data model keeps bytes and
//! text in the same representation and [`Value::as_str`] applies the UTF-8
//! distinction lazily. Unsigned 64-bit integers above `i64::MAX` fall back
//! to [`Value::Float`], losing precision but never failing.
//!
//! Sentinel-terminated readers cannot delimit binary input; use a
//! length-aware or stream reader here.

use crate::arena::Arena;
use crate::error::DecodeError;
use crate::json::DEFAULT_NESTING_LIMIT;
use crate::reader::{Reader, SliceReader};
use crate::sink::{CopySink, SliceSink, StringSink};
use crate::value::{Str, Value};

/// Decodes one value from a stable in-memory buffer; string and binary
/// payloads borrow out of it.
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
    MsgPackDecoder::new(arena, &mut reader, SliceSink::new(input), nesting_limit).parse()
}

/// Decodes one value from any length-aware [`Reader`], duplicating all
/// payloads into the arena.
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
    MsgPackDecoder::new(arena, reader, CopySink::new(), nesting_limit).parse()
}

struct MsgPackDecoder<'a, 'r, R, S> {
    arena: &'r mut Arena<'a>,
    reader: &'r mut R,
    sink: S,
    nesting: u8,
    pos: usize,
}

impl<'a, 'r, R: Reader, S: StringSink<'a>> MsgPackDecoder<'a, 'r, R, S> {
    fn new(arena: &'r mut Arena<'a>, reader: &'r mut R, sink: S, nesting: u8) -> Self {
        Self {
            arena,
            reader,
            sink,
            nesting,
            pos: 0,
        }
    }

    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        if self.reader.ended() {
            return Err(DecodeError::IncompleteInput);
        }
        let b = self.reader.current();
        self.reader.advance();
        self.pos = self.pos.wrapping_add(1);
        Ok(b)
    }

    fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes([self.read_byte()?, self.read_byte()?]))
    }

    fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes([
            self.read_byte()?,
            self.read_byte()?,
            self.read_byte()?,
            self.read_byte()?,
        ]))
    }

    fn read_u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_be_bytes([
            self.read_byte()?,
            self.read_byte()?,
            self.read_byte()?,
            self.read_byte()?,
            self.read_byte()?,
            self.read_byte()?,
            self.read_byte()?,
            self.read_byte()?,
        ]))
    }

    fn parse(&mut self) -> Result<Value<'a>, DecodeError> {
        let tag = self.read_byte()?;
        match tag {
            // positive fixint
            0x00..=0x7f => Ok(Value::Integer(i64::from(tag))),
            // fixmap / fixarray / fixstr
            0x80..=0x8f => self.parse_map((tag & 0x0f) as usize),
            0x90..=0x9f => self.parse_array((tag & 0x0f) as usize),
            0xa0..=0xbf => self.parse_string((tag & 0x1f) as usize).map(Value::String),
            0xc0 => Ok(Value::Null),
            0xc2 => Ok(Value::Bool(false)),
            0xc3 => Ok(Value::Bool(true)),
            // bin 8/16/32
            0xc4 => {
                let n = self.read_byte()? as usize;
                self.parse_string(n).map(Value::String)
            }
            0xc5 => {
                let n = self.read_u16()? as usize;
                self.parse_string(n).map(Value::String)
            }
            0xc6 => {
                let n = self.read_u32()? as usize;
                self.parse_string(n).map(Value::String)
            }
            // float 32/64
            0xca => Ok(Value::Float(f64::from(f32::from_bits(self.read_u32()?)))),
            0xcb => Ok(Value::Float(f64::from_bits(self.read_u64()?))),
            // uint 8/16/32/64
            0xcc => Ok(Value::Integer(i64::from(self.read_byte()?))),
            0xcd => Ok(Value::Integer(i64::from(self.read_u16()?))),
            0xce => Ok(Value::Integer(i64::from(self.read_u32()?))),
            0xcf => {
                let v = self.read_u64()?;
                Ok(match i64::try_from(v) {
                    Ok(n) => Value::Integer(n),
                    Err(_) => Value::Float(v as f64),
                })
            }
            // int 8/16/32/64
            0xd0 => Ok(Value::Integer(i64::from(self.read_byte()? as i8))),
            0xd1 => Ok(Value::Integer(i64::from(self.read_u16()? as i16))),
            0xd2 => Ok(Value::Integer(i64::from(self.read_u32()? as i32))),
            0xd3 => Ok(Value::Integer(self.read_u64()? as i64)),
            // str 8/16/32
            0xd9 => {
                let n = self.read_byte()? as usize;
                self.parse_string(n).map(Value::String)
            }
            0xda => {
                let n = self.read_u16()? as usize;
                self.parse_string(n).map(Value::String)
            }
            0xdb => {
                let n = self.read_u32()? as usize;
                self.parse_string(n).map(Value::String)
            }
            // array 16/32, map 16/32
            0xdc => {
                let n = self.read_u16()? as usize;
                self.parse_array(n)
            }
            0xdd => {
                let n = self.read_u32()? as usize;
                self.parse_array(n)
            }
            0xde => {
                let n = self.read_u16()? as usize;
                self.parse_map(n)
            }
            0xdf => {
                let n = self.read_u32()? as usize;
                self.parse_map(n)
            }
            // negative fixint
            0xe0..=0xff => Ok(Value::Integer(i64::from(tag as i8))),
            // 0xc1 and the ext family
            _ => {
                log::warn!("unrecognized tag byte 0x{tag:02x}");
                Err(DecodeError::InvalidInput)
            }
        }
    }

    fn parse_array(&mut self, len: usize) -> Result<Value<'a>, DecodeError> {
        if self.nesting == 0 {
            return Err(DecodeError::TooDeep);
        }
        let array = self.arena.new_array()?;
        for _ in 0..len {
            self.nesting -= 1;
            let element = self.parse();
            self.nesting += 1;
            self.arena.array_push(array, element?)?;
        }
        Ok(Value::Array(array))
    }

    fn parse_map(&mut self, len: usize) -> Result<Value<'a>, DecodeError> {
        if self.nesting == 0 {
            return Err(DecodeError::TooDeep);
        }
        let object = self.arena.new_object()?;
        for _ in 0..len {
            let key = self.parse_key()?;

            self.nesting -= 1;
            let value = self.parse();
            self.nesting += 1;
            self.arena.object_set(object, key, value?)?;
        }
        Ok(Value::Object(object))
    }

    /// Map keys must be strings; any other kind at key position is invalid.
    fn parse_key(&mut self) -> Result<Str<'a>, DecodeError> {
        let tag = self.read_byte()?;
        let len = match tag {
            0xa0..=0xbf => (tag & 0x1f) as usize,
            0xd9 => self.read_byte()? as usize,
            0xda => self.read_u16()? as usize,
            0xdb => self.read_u32()? as usize,
            _ => return Err(DecodeError::InvalidInput),
        };
        self.parse_string(len)
    }

    fn parse_string(&mut self, len: usize) -> Result<Str<'a>, DecodeError> {
        self.sink.begin(self.arena, self.pos);
        for _ in 0..len {
            let b = self.read_byte()?;
            self.sink.push(self.arena, b)?;
        }
        self.sink.finish(self.arena, self.pos)
    }
}
