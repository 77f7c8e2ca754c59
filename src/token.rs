// SPDX-License-Identifier: Apache-2.0

//! Classification of bare tokens.
//!
//! The textual decoder stores unquoted tokens as their literal bytes and
//! defers meaning to this pure function, keeping the numeric grammar out of
//! the parsing loop.

/// What a bare token turned out to be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    /// Not a recognized literal or number; an identifier-like token.
    Other,
}

/// Classifies the captured bytes of a bare token.
///
/// `null`, `true` and `false` are matched exactly; otherwise the token is
/// read as an integer first and as a float second. Tokens containing bytes
/// outside the numeric alphabet are `Other` without attempting a parse, so
/// spellings like `infinity` never classify as numbers.
pub fn classify(token: &[u8]) -> Scalar {
    match token {
        b"null" => return Scalar::Null,
        b"true" => return Scalar::Bool(true),
        b"false" => return Scalar::Bool(false),
        _ => {}
    }
    if token.is_empty() || !token.iter().all(|b| is_numeric_byte(*b)) {
        return Scalar::Other;
    }
    let Ok(text) = core::str::from_utf8(token) else {
        return Scalar::Other;
    };
    if let Ok(n) = text.parse::<i64>() {
        return Scalar::Integer(n);
    }
    if let Ok(f) = text.parse::<f64>() {
        return Scalar::Float(f);
    }
    Scalar::Other
}

fn is_numeric_byte(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E')
}
