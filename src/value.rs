//! Fixed-radix rank values and their arithmetic.
//!
//! A value is a non-empty string of base36 digits, at most
//! [`MAX_LENGTH`] long. Values of different lengths compare as if the
//! shorter one were right-padded with `'0'`, so `"aaa"` and `"aaa000"`
//! are the same position. Midpoints are computed over arbitrary
//! precision integers: a 128 digit value needs about 662 bits.
//!
//! Complexity:
//! - compare: O(n)
//! - between: O(n) per precision step, at most one extra step
//! - increment / decrement: O(n)

use std::cmp::Ordering;
use std::fmt;
use std::fmt::Write;
use std::hash::Hash;
use std::hash::Hasher;
use std::iter;
use std::str::FromStr;

use num_bigint::BigUint;
use smallvec::SmallVec;

use crate::alphabet;
use crate::error::RankError;
use crate::error::ValueError;

/// Length of freshly created values.
pub const DEFAULT_LENGTH: usize = 6;

/// Longest value `between` may produce.
pub const MAX_LENGTH: usize = 128;

const RADIX: u32 = alphabet::SIZE as u32;
const MIN_DIGIT: u8 = alphabet::MIN_VALUE;
const MAX_DIGIT: u8 = alphabet::MAX_VALUE;

/// Digit values (not symbols), most significant first.
/// Inline capacity covers the default length plus a few extensions.
pub(crate) type Digits = SmallVec<[u8; 16]>;

/// An immutable position in the ranking space.
#[derive(Clone)]
pub struct RankValue {
    digits: Digits,
}

impl RankValue {
    fn filled(digit: u8, length: usize) -> RankValue {
        return RankValue {
            digits: smallvec::smallvec![digit; length],
        };
    }

    /// Parse and validate a value string.
    pub fn parse(s: &str) -> Result<RankValue, ValueError> {
        if s.is_empty() {
            return Err(ValueError::Empty);
        }
        alphabet::validate(s)?;
        if s.len() > MAX_LENGTH {
            return Err(ValueError::TooLong {
                length: s.len(),
                max: MAX_LENGTH,
            });
        }
        let digits = s
            .bytes()
            .filter_map(alphabet::to_value)
            .collect();
        return Ok(RankValue { digits });
    }

    /// The lowest value of `length` digits, all `'0'`.
    pub fn min_value(length: usize) -> RankValue {
        return RankValue::filled(MIN_DIGIT, length);
    }

    /// The highest value of `length` digits, all `'z'`.
    pub fn max_value(length: usize) -> RankValue {
        return RankValue::filled(MAX_DIGIT, length);
    }

    /// The middle value of `length` digits, all `'i'`.
    pub fn mid_value(length: usize) -> RankValue {
        return RankValue::filled(alphabet::MID_VALUE, length);
    }

    /// Number of digits. Grows as `between` consumes precision.
    #[inline]
    pub fn len(&self) -> usize {
        return self.digits.len();
    }

    /// Whether every digit is `'0'`: the floor of the ranking space.
    pub fn is_min(&self) -> bool {
        return self.digits.iter().all(|d| *d == MIN_DIGIT);
    }

    /// Whether every digit is `'z'`: the ceiling at this length.
    pub fn is_max(&self) -> bool {
        return self.digits.iter().all(|d| *d == MAX_DIGIT);
    }

    /// The integer this value encodes at its own length.
    pub(crate) fn integer(&self) -> BigUint {
        return to_integer(self.digits.iter().copied());
    }

    /// Digits right-padded with zeros up to `length`.
    fn padded(&self, length: usize) -> impl Iterator<Item = u8> + '_ {
        return self
            .digits
            .iter()
            .copied()
            .chain(iter::repeat(MIN_DIGIT))
            .take(length.max(self.len()));
    }

    /// A value strictly between `self` and `other`, in either order.
    ///
    /// The result is the floor of the mean of both operands at their
    /// common padded length. If no integer lies strictly between them at
    /// that length, one more digit of precision is added. Trailing zeros
    /// are trimmed, but never below the shorter operand's length.
    pub fn between(&self, other: &RankValue) -> Result<RankValue, RankError> {
        let (lower, upper) = match self.cmp(other) {
            Ordering::Equal => return Err(RankError::EqualValues),
            Ordering::Less => (self, other),
            Ordering::Greater => (other, self),
        };

        let mut length = lower.len().max(upper.len());
        let mut lo = to_integer(lower.padded(length));
        let mut hi = to_integer(upper.padded(length));

        loop {
            let mid = (&lo + &hi) / 2u32;
            if mid != lo {
                let mut digits = from_integer(&mid, length);
                trim_trailing_zeros(&mut digits, lower.len().min(upper.len()));
                return Ok(RankValue { digits });
            }
            if length + 1 > MAX_LENGTH {
                return Err(RankError::Exhausted);
            }
            // Appending a '0' digit multiplies by the radix.
            lo *= RADIX;
            hi *= RADIX;
            length += 1;
            tracing::trace!(length, "extending rank precision");
        }
    }

    /// One unit above `self` at the same length.
    /// Saturates at the all-`'z'` value so the length never changes.
    pub fn increment(&self) -> RankValue {
        let mut digits = self.digits.clone();
        if self.is_max() {
            return RankValue { digits };
        }
        for digit in digits.iter_mut().rev() {
            if *digit == MAX_DIGIT {
                *digit = MIN_DIGIT;
            } else {
                *digit += 1;
                break;
            }
        }
        return RankValue { digits };
    }

    /// One unit below `self` at the same length.
    /// Clamps at the all-`'0'` value, never going negative.
    pub fn decrement(&self) -> RankValue {
        let mut digits = self.digits.clone();
        if self.is_min() {
            return RankValue { digits };
        }
        for digit in digits.iter_mut().rev() {
            if *digit == MIN_DIGIT {
                *digit = MAX_DIGIT;
            } else {
                *digit -= 1;
                break;
            }
        }
        return RankValue { digits };
    }
}

/// Interpret base36 digits as a non-negative integer.
pub(crate) fn to_integer(digits: impl IntoIterator<Item = u8>) -> BigUint {
    let mut n = BigUint::default();
    for digit in digits {
        n *= RADIX;
        n += u32::from(digit);
    }
    return n;
}

/// Render `n` as exactly `length` digits, left-padding with zeros.
pub(crate) fn from_integer(n: &BigUint, length: usize) -> Digits {
    let mut digits: Digits = n.to_radix_be(RADIX).into_iter().collect();
    // to_radix_be renders zero as a single digit.
    if digits.len() == 1 && digits[0] == MIN_DIGIT {
        digits.clear();
    }
    debug_assert!(digits.len() <= length, "{} digits do not fit in {}", digits.len(), length);
    if digits.len() < length {
        let fill = length - digits.len();
        digits.insert_many(0, iter::repeat(MIN_DIGIT).take(fill));
    }
    return digits;
}

/// Build a value from already-rendered digits.
pub(crate) fn from_digits(digits: Digits) -> RankValue {
    return RankValue { digits };
}

fn trim_trailing_zeros(digits: &mut Digits, keep: usize) {
    while digits.len() > keep && digits.last() == Some(&MIN_DIGIT) {
        digits.pop();
    }
}

impl PartialEq for RankValue {
    fn eq(&self, other: &Self) -> bool {
        return self.cmp(other) == Ordering::Equal;
    }
}

impl Eq for RankValue {}

impl PartialOrd for RankValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        return Some(self.cmp(other));
    }
}

impl Ord for RankValue {
    fn cmp(&self, other: &Self) -> Ordering {
        let length = self.len().max(other.len());
        return self.padded(length).cmp(other.padded(length));
    }
}

impl Hash for RankValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Trailing zeros do not change the position, so they must not
        // change the hash either.
        let end = self
            .digits
            .iter()
            .rposition(|d| *d != MIN_DIGIT)
            .map_or(0, |i| i + 1);
        self.digits[..end].hash(state);
    }
}

impl fmt::Display for RankValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in &self.digits {
            f.write_char(alphabet::to_char(*digit) as char)?;
        }
        return Ok(());
    }
}

impl fmt::Debug for RankValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "RankValue({})", self);
    }
}

impl FromStr for RankValue {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        return RankValue::parse(s);
    }
}
