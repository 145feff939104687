//! The crate's errors.
//!
//! Resolution itself never fails loudly: a site that does not produce a color
//! simply yields `None`. The errors here come from the two places where a
//! caller can hand the crate bad input, a hex literal and a document edit.

use std::ops::Range;

/// A malformed hex color literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HexFormatError {
    /// A string with a digit count other than 3, 4, 6 or 8.
    InvalidLength(usize),
    /// A string with a character that is not a hexadecimal digit.
    InvalidDigit(char),
    /// An integer that does not fit 32 bits, or is negative.
    OutOfRange(i64),
}

impl std::fmt::Display for HexFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLength(length) => {
                write!(f, "hex color has {} digits, expected 3, 4, 6 or 8", length)
            }
            Self::InvalidDigit(c) => write!(f, "'{}' is not a hexadecimal digit", c),
            Self::OutOfRange(value) => write!(f, "{:#x} does not fit a packed color", value),
        }
    }
}

impl std::error::Error for HexFormatError {}

/// A text edit that cannot be applied to a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditError {
    /// The range ends past the end of the document, or starts after it ends.
    OutOfBounds {
        /// The offending range.
        range: Range<usize>,
        /// The length of the document in bytes.
        length: usize,
    },
    /// One end of the range splits a UTF-8 sequence.
    NotCharBoundary(usize),
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBounds { range, length } => write!(
                f,
                "edit range {}..{} does not fit a document of {} bytes",
                range.start, range.end, length
            ),
            Self::NotCharBoundary(offset) => {
                write!(f, "offset {} is not on a character boundary", offset)
            }
        }
    }
}

impl std::error::Error for EditError {}

/// Kotlin source that could not be turned into a syntax tree.
#[derive(Debug)]
pub enum ParseError {
    /// The Kotlin grammar is incompatible with the linked parser runtime.
    Language(tree_sitter::LanguageError),
    /// The parser gave up without producing a tree.
    Cancelled,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Language(err) => write!(f, "could not load the Kotlin grammar: {}", err),
            Self::Cancelled => write!(f, "parsing was cancelled"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Language(err) => Some(err),
            Self::Cancelled => None,
        }
    }
}

impl From<tree_sitter::LanguageError> for ParseError {
    fn from(err: tree_sitter::LanguageError) -> Self {
        Self::Language(err)
    }
}
