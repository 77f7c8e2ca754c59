// SPDX-License-Identifier: Apache-2.0

//! The tagged value produced by decoding.
//!
//! A [`Value`] is cheap to copy (tag plus payload) and never heap-allocated
//! on its own: containers live in the [`Arena`] behind handles, and string
//! payloads are either borrowed from the source buffer or arena-owned
//! duplicates. A value must not outlive the arena that owns its containers
//! or owned strings, nor the source buffer behind a borrowed string.

use crate::arena::{Arena, ArrayId, ObjectId, Span};
use crate::token::{classify, Scalar};

/// A decoded string, zero-copy where the source allows it.
///
/// `Borrowed` is only produced by slice-based decoding and stays valid for
/// as long as the original input buffer; `Owned` points into the arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Str<'a> {
    /// Span of the original source buffer.
    Borrowed(&'a [u8]),
    /// Duplicate copied into the arena.
    Owned(Span),
}

/// One decoded value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    /// A quoted (JSON) or length-prefixed (MessagePack) string.
    String(Str<'a>),
    /// An unquoted bare token, kept as its literal bytes. Whether it means a
    /// number, a boolean or null is decided lazily by the accessors.
    Raw(Str<'a>),
    Array(ArrayId),
    Object(ObjectId),
}

impl<'a> Value<'a> {
    /// True for an explicit null or a bare `null` token.
    pub fn is_null(&self, arena: &Arena<'a>) -> bool {
        match self {
            Value::Null => true,
            Value::Raw(s) => matches!(classify(arena.str_bytes(*s)), Scalar::Null),
            _ => false,
        }
    }

    pub fn as_bool(&self, arena: &Arena<'a>) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Raw(s) => match classify(arena.str_bytes(*s)) {
                Scalar::Bool(b) => Some(b),
                _ => None,
            },
            _ => None,
        }
    }

    /// Integer reading; floats truncate, numeric bare tokens classify first.
    pub fn as_i64(&self, arena: &Arena<'a>) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Float(f) => Some(*f as i64),
            Value::Raw(s) => match classify(arena.str_bytes(*s)) {
                Scalar::Integer(n) => Some(n),
                Scalar::Float(f) => Some(f as i64),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_f64(&self, arena: &Arena<'a>) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Raw(s) => match classify(arena.str_bytes(*s)) {
                Scalar::Integer(n) => Some(n as f64),
                Scalar::Float(f) => Some(f),
                _ => None,
            },
            _ => None,
        }
    }

    /// The literal bytes of a string or bare token, delimiters and escapes
    /// already resolved.
    pub fn as_bytes<'s>(&self, arena: &'s Arena<'a>) -> Option<&'s [u8]>
    where
        'a: 's,
    {
        match self {
            Value::String(s) | Value::Raw(s) => Some(arena.str_bytes(*s)),
            _ => None,
        }
    }

    /// [`Self::as_bytes`] narrowed to UTF-8.
    pub fn as_str<'s>(&self, arena: &'s Arena<'a>) -> Option<&'s str>
    where
        'a: 's,
    {
        core::str::from_utf8(self.as_bytes(arena)?).ok()
    }

    pub fn as_array(&self) -> Option<ArrayId> {
        match self {
            Value::Array(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Value::Object(id) => Some(*id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw<'a>(bytes: &'a [u8]) -> Value<'a> {
        Value::Raw(Str::Borrowed(bytes))
    }

    #[test]
    fn raw_tokens_classify_lazily() {
        let arena = Arena::new();
        assert!(raw(b"null").is_null(&arena));
        assert_eq!(raw(b"true").as_bool(&arena), Some(true));
        assert_eq!(raw(b"false").as_bool(&arena), Some(false));
        assert_eq!(raw(b"42").as_i64(&arena), Some(42));
        assert_eq!(raw(b"-7").as_i64(&arena), Some(-7));
        assert_eq!(raw(b"1.5").as_f64(&arena), Some(1.5));
        assert_eq!(raw(b"hello").as_i64(&arena), None);
        assert_eq!(raw(b"hello").as_bool(&arena), None);
        assert!(!raw(b"nullx").is_null(&arena));
    }

    #[test]
    fn typed_values_convert() {
        let arena = Arena::new();
        assert_eq!(Value::Integer(3).as_f64(&arena), Some(3.0));
        assert_eq!(Value::Float(3.9).as_i64(&arena), Some(3));
        assert_eq!(Value::Bool(true).as_bool(&arena), Some(true));
        assert!(Value::Null.is_null(&arena));
        assert_eq!(Value::Null.as_i64(&arena), None);
    }

    #[test]
    fn string_accessors() {
        let arena = Arena::new();
        let v = Value::String(Str::Borrowed(b"abc"));
        assert_eq!(v.as_bytes(&arena), Some(b"abc".as_ref()));
        assert_eq!(v.as_str(&arena), Some("abc"));
        assert_eq!(v.as_i64(&arena), None);

        let invalid = Value::String(Str::Borrowed(&[0x80]));
        assert_eq!(invalid.as_str(&arena), None);
        assert!(invalid.as_bytes(&arena).is_some());
    }
}
