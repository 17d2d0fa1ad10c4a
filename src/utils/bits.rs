//! Bit access for 5-bit teleprinter symbols.
//!
//! Impulse `n` of a Baudot symbol (1-based, as printed on tape) is bit
//! `n - 1` of the symbol value, so impulse 5 is the most significant bit.

/// Number of impulses in a teleprinter symbol.
pub const IMPULSES: usize = 5;

/// Largest valid symbol value.
pub const SYMBOL_MASK: u8 = 0b0001_1111;

/// Returns bit `index` (0-based) of `symbol`.
///
/// # Parameters
/// - `symbol`: The symbol to read.
/// - `index`: Bit index (0..5).
pub fn bit(symbol: u8, index: usize) -> bool {
    (symbol >> index) & 1 == 1
}

/// Returns impulse 5 of `symbol`, the bit used by the two-back limitations.
pub fn bit5(symbol: u8) -> bool {
    bit(symbol, IMPULSES - 1)
}

/// Assembles a symbol from per-impulse bits, bit `i` taken from `bits[i]`.
pub fn assemble(bits: impl IntoIterator<Item = bool>) -> u8 {
    bits.into_iter()
        .take(IMPULSES)
        .enumerate()
        .fold(0u8, |acc, (i, b)| acc | (u8::from(b) << i))
}

/// Returns true if `symbol` fits in five bits.
pub fn is_symbol(symbol: u8) -> bool {
    symbol <= SYMBOL_MASK
}
