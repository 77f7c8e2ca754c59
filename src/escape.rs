// SPDX-License-Identifier: Apache-2.0

//! Fixed escape table for quoted strings.

/// Maps the byte following a backslash to its raw value, or `None` for an
/// escape the grammar does not know.
pub(crate) fn unescape(c: u8) -> Option<u8> {
    match c {
        b'"' => Some(b'"'),
        b'\'' => Some(b'\''),
        b'/' => Some(b'/'),
        b'\\' => Some(b'\\'),
        b'b' => Some(0x08),
        b'f' => Some(0x0C),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::unescape;

    #[test]
    fn known_escapes() {
        assert_eq!(unescape(b'n'), Some(b'\n'));
        assert_eq!(unescape(b't'), Some(b'\t'));
        assert_eq!(unescape(b'r'), Some(b'\r'));
        assert_eq!(unescape(b'b'), Some(0x08));
        assert_eq!(unescape(b'f'), Some(0x0C));
        assert_eq!(unescape(b'"'), Some(b'"'));
        assert_eq!(unescape(b'\''), Some(b'\''));
        assert_eq!(unescape(b'/'), Some(b'/'));
        assert_eq!(unescape(b'\\'), Some(b'\\'));
    }

    #[test]
    fn unknown_escapes_are_rejected() {
        assert_eq!(unescape(b'x'), None);
        assert_eq!(unescape(b'u'), None);
        assert_eq!(unescape(b'0'), None);
        assert_eq!(unescape(0), None);
    }
}
