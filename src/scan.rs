// SPDX-License-Identifier: Apache-2.0

//! Whitespace and comment skipping for the textual grammar.
//!
//! Comments are decoration the grammar allows anywhere whitespace is
//! allowed: `/* ... */` blocks and `// ...` line comments. An unterminated
//! comment is indistinguishable from real content still in flight, so
//! running out of input mid-comment is [`DecodeError::IncompleteInput`].

use crate::error::DecodeError;
use crate::reader::{is_ended, Reader};

/// Skips whitespace and comments, leaving the cursor exactly on the first
/// significant byte. Returns the number of bytes consumed so the caller can
/// keep its own offset in sync.
pub(crate) fn skip_spaces_and_comments<R: Reader>(r: &mut R) -> Result<usize, DecodeError> {
    let mut consumed = 0usize;
    loop {
        if is_ended(r) {
            return Err(DecodeError::IncompleteInput);
        }
        match r.current() {
            b' ' | b'\t' | b'\r' | b'\n' => {
                r.advance();
                consumed += 1;
            }
            b'/' => match r.peek() {
                b'*' => {
                    r.advance();
                    r.advance();
                    consumed = consumed.wrapping_add(2 + skip_block_comment(r)?);
                }
                b'/' => {
                    r.advance();
                    r.advance();
                    consumed = consumed.wrapping_add(2 + skip_line_comment(r)?);
                }
                // A lone '/' is never a legal token.
                _ => return Err(DecodeError::InvalidInput),
            },
            _ => return Ok(consumed),
        }
    }
}

/// Consumes up to and including the closing `*/`.
fn skip_block_comment<R: Reader>(r: &mut R) -> Result<usize, DecodeError> {
    let mut consumed = 0usize;
    let mut was_star = false;
    loop {
        if is_ended(r) {
            return Err(DecodeError::IncompleteInput);
        }
        let c = r.current();
        r.advance();
        consumed += 1;
        if was_star && c == b'/' {
            return Ok(consumed);
        }
        was_star = c == b'*';
    }
}

/// Consumes up to but not including the terminating newline; the outer loop
/// eats the newline as whitespace.
fn skip_line_comment<R: Reader>(r: &mut R) -> Result<usize, DecodeError> {
    let mut consumed = 0usize;
    loop {
        if is_ended(r) {
            return Err(DecodeError::IncompleteInput);
        }
        if r.current() == b'\n' {
            return Ok(consumed);
        }
        r.advance();
        consumed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::SliceReader;

    fn skip(input: &[u8]) -> Result<(usize, u8), DecodeError> {
        let mut r = SliceReader::new(input);
        let n = skip_spaces_and_comments(&mut r)?;
        Ok((n, r.current()))
    }

    #[test]
    fn plain_whitespace() {
        assert_eq!(skip(b"   \t\r\n x"), Ok((7, b'x')));
        assert_eq!(skip(b"x"), Ok((0, b'x')));
    }

    #[test]
    fn block_comment() {
        assert_eq!(skip(b"/* c */x"), Ok((7, b'x')));
        assert_eq!(skip(b" /* * / ** */ y"), Ok((14, b'y')));
        // Stars inside the comment do not close it early.
        assert_eq!(skip(b"/****/z"), Ok((6, b'z')));
    }

    #[test]
    fn line_comment() {
        // The newline itself is consumed by the outer whitespace loop.
        assert_eq!(skip(b"// note\nx"), Ok((8, b'x')));
        assert_eq!(skip(b"//\ny"), Ok((3, b'y')));
    }

    #[test]
    fn comment_runs_back_to_back() {
        assert_eq!(skip(b"/* a */ // b\n /* c */x"), Ok((21, b'x')));
    }

    #[test]
    fn lone_slash_is_invalid() {
        assert_eq!(skip(b"/x"), Err(DecodeError::InvalidInput));
        assert_eq!(skip(b"/"), Err(DecodeError::InvalidInput));
    }

    #[test]
    fn exhaustion_is_incomplete() {
        assert_eq!(skip(b""), Err(DecodeError::IncompleteInput));
        assert_eq!(skip(b"   "), Err(DecodeError::IncompleteInput));
        assert_eq!(skip(b"/* open"), Err(DecodeError::IncompleteInput));
        assert_eq!(skip(b"/* nearly *"), Err(DecodeError::IncompleteInput));
        assert_eq!(skip(b"// no newline"), Err(DecodeError::IncompleteInput));
    }
}
