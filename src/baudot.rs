//! Baudot code: conversion between text notations and 5-bit symbols.
//!
//! Three notations are supported:
//!
//! - **Raw plaintext**: natural-language text. Encoding folds case, replaces
//!   accented letters with their closest Baudot equivalents and inserts the
//!   letter/figure shift symbols a teleprinter operator would have typed.
//!   Decoding replays the shifts and drops the non-printing symbols.
//! - **Readable notation**: one visible character per symbol with reserved
//!   characters for the control symbols, so no information is lost while
//!   figure-shifted text stays legible.
//! - **British notation**: the single-character alphabet used at Bletchley
//!   Park, where `/ 9 3 4 + 8` stand for null, space, carriage return,
//!   line feed, figure shift and letter shift.

use std::fmt;

use crate::error::DecodingError;
use crate::utils::bits;

// ──────── Control symbols ────────

const SYM_NUL: u8 = 0;
const SYM_CR: u8 = 2;
const SYM_SP: u8 = 4;
const SYM_LF: u8 = 8;
const SYM_FIGS: u8 = 27;
const SYM_LTRS: u8 = 31;

// ──────── Readable notation ────────

const READABLE_NUL: char = '_';
const READABLE_CR: char = '#';
const READABLE_SP: char = ' ';
const READABLE_LF: char = '|';
const READABLE_FIGS: char = '<';
const READABLE_LTRS: char = '>';

/// Letter-mode characters by symbol value, control symbols included.
///
/// Slots 2 and 8 hold line feed and carriage return, the reverse of
/// [`SYM_CR`] and [`SYM_LF`]. The control symbols are matched before any
/// lookup, so these slots are never read. [`BRITISH_LETTERS`] keeps the same
/// order, which makes symbol 8 print as `3` and symbol 2 as `4`.
const READABLE_LETTERS: &[u8; 32] = b"_E|A SIU#DRJNFCKTZLWHYPQOBG<MXV>";

/// British notation by symbol value. Letters agree with readable notation.
const BRITISH_LETTERS: &[u8; 32] = b"/E4A9SIU3DRJNFCKTZLWHYPQOBG+MXV8";

/// Figure-mode characters by symbol value.
///
/// `@` and `*` stand in for the unprintable ENQ (who are you) and BEL.
/// `$` marks the control symbols, which never print as figures.
const FIGURES: [char; 32] = [
    '$', '3', '$', '-', '$', '\'', '8', '7', '$', '@', '4', '*', ',', '!', ':', '(', '5', '+',
    ')', '2', '£', '6', '0', '1', '9', '?', '&', '$', '.', '/', ';', '$',
];

const FIGURE_PLACEHOLDER: char = '$';

// ──────── Raw plaintext folding ────────

/// Letters accepted in raw plaintext, after upper-casing.
const RAW_LETTERS: &str =
    " ABCDEFGHIJKLMNOPQRSTUVWXYZÀÁÃÅΆĄÂªªÇČÐĎΛĚÊÈÉĘËĮÎÌÍÏŁŇŃÑØÒÓÔŐÕΘº°ǪΦÞŘŔŠ§ŤÚŰÙÛŮ×ÝŻŽŹ\t";

/// Readable letter for each entry of [`RAW_LETTERS`].
const RAW_LETTERS_MAP: &str =
    " ABCDEFGHIJKLMNOPQRSTUVWXYZAAAAAAAAACCDDDEEEEEEIIIIILNNNOOOOOOOOOOPPRRSSTUUUUUXYZZZ ";

/// Figures accepted in raw plaintext.
const RAW_FIGURES: &str = "3-'87@4*,!:(5+)2£6019?&./;{}[]<>~%–—_=$#|«»’^“”·\u{328}\"\\";

/// Figure character for each entry of [`RAW_FIGURES`].
const RAW_FIGURES_MAP: &str = "3-'87@4*,!:(5+)2£6019?&./;()()()&&----£&/''''''.,'/";

/// Characters above this code point are dropped from raw plaintext.
const RAW_MAX_CODE_POINT: u32 = 65000;

/// The three text notations of Baudot code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Notation {
    /// Natural-language text.
    #[default]
    Raw,
    /// One visible character per symbol.
    Readable,
    /// Bletchley Park notation.
    British,
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Raw => write!(f, "raw plaintext"),
            Notation::Readable => write!(f, "readable"),
            Notation::British => write!(f, "British"),
        }
    }
}

/// Converter between text notations and 5-bit symbols.
///
/// The two flags only affect encoding of raw plaintext; all other
/// conversions are fixed.
///
/// # Examples
///
/// ```
/// use lorenz_sz42::{BaudotCodec, Notation};
///
/// let codec = BaudotCodec::new();
/// assert_eq!(codec.raw_to_readable("Page 12"), "PAGE <12");
///
/// let symbols = codec.decode("Page 12", Notation::Raw).unwrap();
/// assert_eq!(codec.encode(&symbols, Notation::British).unwrap(), "PAGE9+QW");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BaudotCodec {
    /// Emit a letter shift before every space, not only after figures.
    pub letter_shift_before_space: bool,
    /// Emit every inserted shift symbol twice.
    pub double_shift: bool,
}

impl BaudotCodec {
    /// Creates a codec with both raw-plaintext options disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the letter shift before every space.
    pub fn with_letter_shift_before_space(mut self, enabled: bool) -> Self {
        self.letter_shift_before_space = enabled;
        self
    }

    /// Enables or disables doubled shift symbols.
    pub fn with_double_shift(mut self, enabled: bool) -> Self {
        self.double_shift = enabled;
        self
    }

    /// Converts text in `notation` to symbols.
    ///
    /// # Errors
    /// Returns a [`DecodingError`] naming the first character that has no
    /// symbol in `notation`. Raw plaintext never fails: unsupported
    /// characters are dropped.
    pub fn decode(&self, text: &str, notation: Notation) -> Result<Vec<u8>, DecodingError> {
        match notation {
            Notation::Raw => self.from_raw_plaintext(text),
            Notation::Readable => Self::from_readable_notation(text),
            Notation::British => Self::from_british_notation(text),
        }
    }

    /// Converts symbols to text in `notation`.
    ///
    /// # Errors
    /// Returns [`DecodingError::InvalidSymbol`] for the first symbol that
    /// does not fit in five bits.
    pub fn encode(&self, symbols: &[u8], notation: Notation) -> Result<String, DecodingError> {
        match notation {
            Notation::Raw => Self::to_raw_plaintext(symbols),
            Notation::Readable => Self::to_readable_notation(symbols),
            Notation::British => Self::to_british_notation(symbols),
        }
    }

    // ──────── Raw plaintext ────────

    /// Renders raw plaintext in readable notation.
    ///
    /// German `ß`, `Ä`, `Ö` and `Ü` become `SS`, `AE`, `OE` and `UE`, the text
    /// is upper-cased, other accented letters and typographic symbols fold
    /// to their closest Baudot character, and shift symbols are inserted
    /// wherever the case mode changes. Characters without an equivalent are
    /// dropped.
    pub fn raw_to_readable(&self, text: &str) -> String {
        let text = text
            .replace('ß', "SS")
            .to_uppercase()
            .replace('Ä', "AE")
            .replace('Ö', "OE")
            .replace('Ü', "UE");

        let mut out = String::with_capacity(text.len());
        let mut figure_shift = false;

        for c in text.chars() {
            if c as u32 > RAW_MAX_CODE_POINT {
                continue;
            }
            match c {
                ' ' => {
                    if figure_shift || self.letter_shift_before_space {
                        self.push_shift(&mut out, READABLE_LTRS);
                    }
                    figure_shift = false;
                    out.push(READABLE_SP);
                }
                '\n' | '\r' => {
                    if figure_shift {
                        self.push_shift(&mut out, READABLE_LTRS);
                        figure_shift = false;
                    }
                    out.push(if c == '\n' { READABLE_LF } else { READABLE_CR });
                }
                _ => {
                    if let Some(letter) = fold(c, RAW_LETTERS, RAW_LETTERS_MAP) {
                        if figure_shift {
                            self.push_shift(&mut out, READABLE_LTRS);
                            figure_shift = false;
                        }
                        out.push(letter);
                    } else if let Some(figure) = fold(c, RAW_FIGURES, RAW_FIGURES_MAP) {
                        if !figure_shift {
                            self.push_shift(&mut out, READABLE_FIGS);
                            figure_shift = true;
                        }
                        out.push(figure);
                    }
                }
            }
        }
        out
    }

    /// Converts raw plaintext to symbols via [`raw_to_readable`](Self::raw_to_readable).
    ///
    /// # Errors
    /// Only fails if the folding tables produce a character that readable
    /// notation rejects, which the tables are built to rule out.
    #[allow(clippy::wrong_self_convention)]
    pub fn from_raw_plaintext(&self, text: &str) -> Result<Vec<u8>, DecodingError> {
        Self::from_readable_notation(&self.raw_to_readable(text))
    }

    /// Converts symbols to raw plaintext.
    ///
    /// Shift symbols, null and carriage return do not print; line feed and
    /// space print as themselves.
    ///
    /// # Errors
    /// Returns [`DecodingError::InvalidSymbol`] for a symbol above 31.
    pub fn to_raw_plaintext(symbols: &[u8]) -> Result<String, DecodingError> {
        let mut out = String::with_capacity(symbols.len());
        let mut figure_shift = false;
        for (position, &symbol) in symbols.iter().enumerate() {
            match symbol {
                SYM_FIGS => figure_shift = true,
                SYM_LTRS => figure_shift = false,
                SYM_CR | SYM_NUL => {}
                SYM_LF => out.push('\n'),
                SYM_SP => out.push(' '),
                _ => {
                    check_symbol(symbol, position, Notation::Raw)?;
                    out.push(printable(symbol, figure_shift));
                }
            }
        }
        Ok(out)
    }

    // ──────── Readable notation ────────

    /// Converts readable notation to symbols.
    ///
    /// # Errors
    /// Returns [`DecodingError::InvalidReadableChar`] for a character that
    /// has no symbol in the current shift mode.
    pub fn from_readable_notation(text: &str) -> Result<Vec<u8>, DecodingError> {
        let mut symbols = Vec::with_capacity(text.len());
        let mut figure_shift = false;
        for (position, c) in text.chars().enumerate() {
            let symbol = match c {
                READABLE_SP => SYM_SP,
                READABLE_NUL => SYM_NUL,
                READABLE_LF => SYM_LF,
                READABLE_CR => SYM_CR,
                READABLE_LTRS => {
                    figure_shift = false;
                    SYM_LTRS
                }
                READABLE_FIGS => {
                    figure_shift = true;
                    SYM_FIGS
                }
                _ => {
                    let index = if figure_shift {
                        figure_index(c)
                    } else {
                        byte_index(READABLE_LETTERS, c)
                    };
                    index.ok_or(DecodingError::InvalidReadableChar {
                        character: c,
                        position,
                        figure_shift,
                    })?
                }
            };
            symbols.push(symbol);
        }
        Ok(symbols)
    }

    /// Converts symbols to readable notation.
    ///
    /// # Errors
    /// Returns [`DecodingError::InvalidSymbol`] for a symbol above 31.
    pub fn to_readable_notation(symbols: &[u8]) -> Result<String, DecodingError> {
        let mut out = String::with_capacity(symbols.len());
        let mut figure_shift = false;
        for (position, &symbol) in symbols.iter().enumerate() {
            let c = match symbol {
                SYM_FIGS => {
                    figure_shift = true;
                    READABLE_FIGS
                }
                SYM_LTRS => {
                    figure_shift = false;
                    READABLE_LTRS
                }
                SYM_CR => READABLE_CR,
                SYM_LF => READABLE_LF,
                SYM_SP => READABLE_SP,
                SYM_NUL => READABLE_NUL,
                _ => {
                    check_symbol(symbol, position, Notation::Readable)?;
                    printable(symbol, figure_shift)
                }
            };
            out.push(c);
        }
        Ok(out)
    }

    // ──────── British notation ────────

    /// Converts British notation to symbols.
    ///
    /// # Errors
    /// Returns [`DecodingError::InvalidBritishChar`] for a character outside
    /// the British alphabet.
    pub fn from_british_notation(text: &str) -> Result<Vec<u8>, DecodingError> {
        text.chars()
            .enumerate()
            .map(|(position, c)| {
                byte_index(BRITISH_LETTERS, c).ok_or(DecodingError::InvalidBritishChar {
                    character: c,
                    position,
                })
            })
            .collect()
    }

    /// Converts symbols to British notation.
    ///
    /// # Errors
    /// Returns [`DecodingError::InvalidSymbol`] for a symbol above 31.
    pub fn to_british_notation(symbols: &[u8]) -> Result<String, DecodingError> {
        symbols
            .iter()
            .enumerate()
            .map(|(position, &symbol)| {
                check_symbol(symbol, position, Notation::British)?;
                Ok(BRITISH_LETTERS[symbol as usize] as char)
            })
            .collect()
    }

    /// Appends a shift character, twice if doubled shifts are enabled.
    fn push_shift(&self, out: &mut String, shift: char) {
        out.push(shift);
        if self.double_shift {
            out.push(shift);
        }
    }
}

/// Looks `c` up in `from` and returns the character at the same index of `to`.
fn fold(c: char, from: &str, to: &str) -> Option<char> {
    let index = from.chars().position(|x| x == c)?;
    to.chars().nth(index)
}

/// Returns the index of an ASCII character in a 32-entry table.
fn byte_index(table: &[u8; 32], c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    table.iter().position(|&b| b == c as u8).map(|i| i as u8)
}

/// Returns the symbol that prints `c` in figure mode.
fn figure_index(c: char) -> Option<u8> {
    if c == FIGURE_PLACEHOLDER {
        return None;
    }
    FIGURES.iter().position(|&f| f == c).map(|i| i as u8)
}

/// Returns the printed character of a non-control symbol.
fn printable(symbol: u8, figure_shift: bool) -> char {
    if figure_shift {
        FIGURES[symbol as usize]
    } else {
        READABLE_LETTERS[symbol as usize] as char
    }
}

fn check_symbol(symbol: u8, position: usize, notation: Notation) -> Result<(), DecodingError> {
    if bits::is_symbol(symbol) {
        Ok(())
    } else {
        Err(DecodingError::InvalidSymbol {
            symbol,
            position,
            notation,
        })
    }
}
