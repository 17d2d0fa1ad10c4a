//! Error types for the SZ42 library.
//!
//! Conversion between notations fails with a [`DecodingError`], loading a
//! key fails with a [`KeyFormatError`]. Both fold into the crate-level
//! [`Sz42Error`]. Wheel rule violations are not errors: they are reported
//! by [`crate::rules`] as plain values.

use crate::baudot::Notation;

/// A character or symbol that cannot be converted between notations.
///
/// Every variant carries the 0-based symbol position at which decoding
/// stopped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodingError {
    /// A symbol outside the 5-bit range was handed to an encoder.
    #[error("cannot convert symbol {symbol:08b} at position {position} to {notation} notation")]
    InvalidSymbol {
        /// The offending symbol value.
        symbol: u8,
        /// Index of the symbol in the input.
        position: usize,
        /// The notation that was being produced.
        notation: Notation,
    },
    /// A character with no meaning in readable notation for the current shift.
    #[error(
        "invalid character {character:?} in readable notation at position {position} (figure shift: {figure_shift})"
    )]
    InvalidReadableChar {
        /// The offending character.
        character: char,
        /// Index of the character in the input.
        position: usize,
        /// Whether the decoder was in figure mode.
        figure_shift: bool,
    },
    /// A character outside the British alphabet.
    #[error("invalid character {character:?} in British notation at position {position}")]
    InvalidBritishChar {
        /// The offending character.
        character: char,
        /// Index of the character in the input.
        position: usize,
    },
}

/// A malformed key text.
///
/// Line numbers are 1-based, columns 0-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyFormatError {
    /// The key does not consist of 12 pattern lines and one position line.
    #[error("key must have {expected} lines, found {found}")]
    WrongLineCount {
        /// Required number of lines.
        expected: usize,
        /// Number of lines present.
        found: usize,
    },
    /// A pattern line does not match its wheel's length.
    #[error("pattern of wheel {wheel} on line {line} must have {expected} pins, found {found}")]
    WrongPatternLength {
        /// Line of the pattern.
        line: usize,
        /// Wheel the line belongs to.
        wheel: &'static str,
        /// Length of the wheel.
        expected: usize,
        /// Length of the line.
        found: usize,
    },
    /// A pattern line contains something other than `x` or `.`.
    #[error("invalid pin {character:?} for wheel {wheel} at line {line}, column {column}")]
    InvalidPin {
        /// Line of the pattern.
        line: usize,
        /// Column of the character.
        column: usize,
        /// Wheel the line belongs to.
        wheel: &'static str,
        /// The offending character.
        character: char,
    },
    /// The position line is not three `|`-separated groups.
    #[error("position line {line} must have 3 groups separated by '|', found {found}")]
    WrongGroupCount {
        /// Line of the positions.
        line: usize,
        /// Number of groups present.
        found: usize,
    },
    /// A position group holds the wrong number of `:`-separated entries.
    #[error("position group {group} must have {expected} entries, found {found}")]
    WrongPositionCount {
        /// Name of the group (`chi`, `psi` or `mu`).
        group: &'static str,
        /// Number of wheels in the group.
        expected: usize,
        /// Number of entries present.
        found: usize,
    },
    /// A start position is not a non-negative integer.
    #[error("start position {value:?} of wheel {wheel} is not a number")]
    InvalidPosition {
        /// Wheel the entry belongs to.
        wheel: &'static str,
        /// The text of the entry.
        value: String,
    },
    /// A start position does not fit on its wheel.
    #[error("start position {position} of wheel {wheel} must be below {length}")]
    PositionOutOfRange {
        /// Wheel the entry belongs to.
        wheel: &'static str,
        /// The parsed position.
        position: usize,
        /// Length of the wheel.
        length: usize,
    },
}

/// Errors produced by the SZ42 library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Sz42Error {
    /// Input or output text could not be converted.
    #[error(transparent)]
    Decoding(#[from] DecodingError),
    /// A key text could not be loaded.
    #[error(transparent)]
    KeyFormat(#[from] KeyFormatError),
    /// A bounded key generator ran out of attempts for one wheel.
    #[error("no valid pattern for wheel {wheel} after {attempts} attempts")]
    GenerationExhausted {
        /// The wheel that could not be generated.
        wheel: &'static str,
        /// The attempt bound that was reached.
        attempts: usize,
    },
}
