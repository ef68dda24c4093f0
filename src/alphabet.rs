//! The base36 symbol set used to spell rank values.
//!
//! Symbols are `0-9` followed by `a-z`, mapped to the values `0..36`.
//! Symbol order equals value order, so comparing two equal-length
//! strings byte-by-byte is the same as comparing the numbers they encode.

use crate::error::ValueError;

/// Number of symbols in the alphabet.
pub const SIZE: usize = 36;

const SYMBOLS: &[u8; SIZE] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Value of the lowest symbol.
pub const MIN_VALUE: u8 = 0;

/// Value of the highest symbol.
pub const MAX_VALUE: u8 = (SIZE - 1) as u8;

/// Value of the middle symbol.
pub const MID_VALUE: u8 = (SIZE / 2) as u8;

/// Marker stored in the lookup table for bytes outside the alphabet.
const NOT_FOUND: u8 = u8::MAX;

/// Byte to value lookup, built at compile time.
const VALUES: [u8; 256] = {
    let mut table = [NOT_FOUND; 256];
    let mut i = 0;
    while i < SIZE {
        table[SYMBOLS[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// The lowest symbol, `'0'`.
#[inline]
pub fn min() -> u8 {
    return SYMBOLS[MIN_VALUE as usize];
}

/// The highest symbol, `'z'`.
#[inline]
pub fn max() -> u8 {
    return SYMBOLS[MAX_VALUE as usize];
}

/// The middle symbol, `'i'`.
#[inline]
pub fn mid() -> u8 {
    return SYMBOLS[MID_VALUE as usize];
}

/// Convert a value in `0..36` to its symbol.
///
/// # Panics
///
/// Panics if `value` is out of range. Callers only ever pass digits
/// produced by base36 arithmetic, so this is a contract violation.
#[inline]
pub fn to_char(value: u8) -> u8 {
    assert!(
        (value as usize) < SIZE,
        "alphabet: value {} out of range [0, {})",
        value,
        SIZE
    );
    return SYMBOLS[value as usize];
}

/// Convert a symbol to its value, or `None` if it is not in the alphabet.
#[inline]
pub fn to_value(symbol: u8) -> Option<u8> {
    let value = VALUES[symbol as usize];
    if value == NOT_FOUND {
        return None;
    }
    return Some(value);
}

/// Whether `symbol` belongs to the alphabet.
#[inline]
pub fn is_valid(symbol: u8) -> bool {
    return VALUES[symbol as usize] != NOT_FOUND;
}

/// Check every byte of `s`, reporting the first one outside the alphabet.
///
/// Non-ASCII input is reported at the byte offset where its character starts.
pub fn validate(s: &str) -> Result<(), ValueError> {
    for (position, symbol) in s.char_indices() {
        if !symbol.is_ascii() || !is_valid(symbol as u8) {
            return Err(ValueError::InvalidSymbol { symbol, position });
        }
    }
    return Ok(());
}
