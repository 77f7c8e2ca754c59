// SPDX-License-Identifier: Apache-2.0

/// Errors that can occur while decoding a document.
///
/// Success is represented by `Result::Ok`; these four kinds are the complete
/// set of failure statuses for both the textual and the binary decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended before a value completed. The bytes seen so far were
    /// not wrong; a streaming caller may wait for more data and retry with
    /// the full input.
    IncompleteInput,
    /// A byte sequence that can never be valid at that position.
    InvalidInput,
    /// The nesting guard tripped: containers were nested deeper than the
    /// configured limit.
    TooDeep,
    /// The arena could not satisfy an allocation. The caller may retry the
    /// whole parse with a larger arena.
    NoMemory,
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::IncompleteInput => write!(f, "input ended before a value completed"),
            DecodeError::InvalidInput => write!(f, "invalid input"),
            DecodeError::TooDeep => write!(f, "nesting limit exceeded"),
            DecodeError::NoMemory => write!(f, "arena exhausted"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}
