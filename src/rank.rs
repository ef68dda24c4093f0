//! Ranks: a bucket paired with a value, in the wire form `"{bucket}|{value}"`.
//!
//! Ranks order by bucket first, then by value. Every operation returns a
//! new rank; nothing is mutated in place, so ranks can be shared freely
//! across threads.
//!
//! # Generating ranks
//!
//! ```
//! use lexorank::Rank;
//!
//! let first = Rank::initial();
//! assert_eq!(first.to_string(), "0|iiiiii");
//!
//! let second = first.next();
//! let middle = Rank::between(&first, &second).unwrap();
//! assert!(first < middle && middle < second);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::bucket::Bucket;
use crate::error::RankError;
use crate::value::DEFAULT_LENGTH;
use crate::value::MAX_LENGTH;
use crate::value::RankValue;

/// Delimiter between the bucket and the value.
pub const SEPARATOR: char = '|';

/// An immutable, totally ordered rank.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank {
    // Field order drives the derived ordering: bucket, then value.
    bucket: Bucket,
    value: RankValue,
}

impl Rank {
    /// Pair a bucket with a value.
    pub fn new(bucket: Bucket, value: RankValue) -> Rank {
        return Rank { bucket, value };
    }

    /// Parse a wire string `"{bucket}|{value}"`.
    ///
    /// Exactly one separator is allowed. No whitespace is trimmed.
    pub fn parse(s: &str) -> Result<Rank, RankError> {
        let mut parts = s.split(SEPARATOR);
        let (Some(bucket), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(RankError::InvalidFormat { input: s.to_string() });
        };
        let bucket = Bucket::parse(bucket)?;
        let value = RankValue::parse(value)?;
        return Ok(Rank { bucket, value });
    }

    /// The starting rank for an empty list: bucket 0, `"iiiiii"`.
    pub fn initial() -> Rank {
        return Rank::new(Bucket::Zero, RankValue::mid_value(DEFAULT_LENGTH));
    }

    /// The lowest default-length rank in bucket 0.
    pub fn min() -> Rank {
        return Rank::new(Bucket::Zero, RankValue::min_value(DEFAULT_LENGTH));
    }

    /// The highest default-length rank in bucket 0.
    pub fn max() -> Rank {
        return Rank::new(Bucket::Zero, RankValue::max_value(DEFAULT_LENGTH));
    }

    /// A rank strictly between `a` and `b`, which must share a bucket.
    pub fn between(a: &Rank, b: &Rank) -> Result<Rank, RankError> {
        if a.bucket != b.bucket {
            return Err(RankError::CrossBucket {
                left: a.bucket,
                right: b.bucket,
            });
        }
        let value = a.value.between(&b.value)?;
        return Ok(Rank::new(a.bucket, value));
    }

    /// A rank for the gap between optional neighbors.
    ///
    /// - neither: [`Rank::initial`]
    /// - only `next`: strictly before `next`
    /// - only `prev`: strictly after `prev`
    /// - both: [`Rank::between`]
    ///
    /// A lone neighbor already at the floor or ceiling of the ranking
    /// space leaves no gap, which is reported as [`RankError::Exhausted`].
    ///
    /// The read-compute-write cycle around this call is not atomic: two
    /// callers looking at the same neighbors get the same rank. See
    /// [`crate::insert`] for the retry protocol that resolves this.
    pub fn generate_between(prev: Option<&Rank>, next: Option<&Rank>) -> Result<Rank, RankError> {
        return match (prev, next) {
            (None, None) => Ok(Rank::initial()),
            (Some(prev), None) => {
                let rank = prev.next();
                if rank == *prev {
                    return Err(RankError::Exhausted);
                }
                Ok(rank)
            }
            (None, Some(next)) => {
                let rank = next.previous();
                if rank == *next {
                    return Err(RankError::Exhausted);
                }
                Ok(rank)
            }
            (Some(prev), Some(next)) => Rank::between(prev, next),
        };
    }

    /// A rank strictly after this one in the same bucket.
    ///
    /// Takes the midpoint between this value and the all-`'z'` value of
    /// the same length, so repeated appends converge on the ceiling
    /// while staying short. At the ceiling the bound gains one digit. If
    /// the midpoint would exceed the maximum length the value is
    /// incremented instead. The all-`'z'` value of maximum length has
    /// nothing above it and is returned unchanged.
    pub fn next(&self) -> Rank {
        let length = self.value.len();
        let bound = if self.value.is_max() {
            if length >= MAX_LENGTH {
                return self.clone();
            }
            RankValue::max_value(length + 1)
        } else {
            RankValue::max_value(length)
        };
        let value = self
            .value
            .between(&bound)
            .unwrap_or_else(|_| self.value.increment());
        return Rank::new(self.bucket, value);
    }

    /// A rank strictly before this one in the same bucket.
    ///
    /// Takes the midpoint between the all-`'0'` value and this value,
    /// falling back to a decrement when precision runs out. The
    /// all-`'0'` value is the floor and is returned unchanged.
    pub fn previous(&self) -> Rank {
        if self.value.is_min() {
            return self.clone();
        }
        let floor = RankValue::min_value(self.value.len());
        let value = floor
            .between(&self.value)
            .unwrap_or_else(|_| self.value.decrement());
        return Rank::new(self.bucket, value);
    }

    /// The bucket this rank lives in.
    #[inline]
    pub fn bucket(&self) -> Bucket {
        return self.bucket;
    }

    /// The value part, without the bucket.
    #[inline]
    pub fn value(&self) -> &RankValue {
        return &self.value;
    }

    /// Length of the value part. A fresh rank has length 6.
    #[inline]
    pub fn len(&self) -> usize {
        return self.value.len();
    }

    /// The length at which `between` starts reporting exhaustion.
    #[inline]
    pub fn max_len(&self) -> usize {
        return MAX_LENGTH;
    }

    /// Whether the value length has reached `threshold` (a fraction in
    /// `(0, 1]`) of the maximum length. A threshold of 0.75 triggers at
    /// length 96. This only reports; nothing is enforced.
    pub fn needs_rebalance(&self, threshold: f64) -> bool {
        return self.len() as f64 >= threshold * MAX_LENGTH as f64;
    }

    /// The same value in the next bucket (0 -> 1 -> 2 -> 0).
    pub fn in_next_bucket(&self) -> Rank {
        return Rank::new(self.bucket.next(), self.value.clone());
    }

    /// The same value in the previous bucket (0 -> 2 -> 1 -> 0).
    pub fn in_previous_bucket(&self) -> Rank {
        return Rank::new(self.bucket.previous(), self.value.clone());
    }
}

impl Default for Rank {
    fn default() -> Rank {
        return Rank::initial();
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}{}{}", self.bucket, SEPARATOR, self.value);
    }
}

impl fmt::Debug for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "Rank({})", self);
    }
}

impl FromStr for Rank {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        return Rank::parse(s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueError;

    fn rank(s: &str) -> Rank {
        return Rank::parse(s).unwrap();
    }

    #[test]
    fn parse_valid() {
        let cases = [
            ("0|iiiiii", Bucket::Zero, "iiiiii"),
            ("1|abc123", Bucket::One, "abc123"),
            ("2|000000", Bucket::Two, "000000"),
            ("0|zzzzzz", Bucket::Zero, "zzzzzz"),
            ("0|abcdef01234567890a", Bucket::Zero, "abcdef01234567890a"),
        ];
        for (input, bucket, value) in cases {
            let parsed = rank(input);
            assert_eq!(parsed.bucket(), bucket);
            assert_eq!(parsed.value().to_string(), value);
            assert_eq!(parsed.to_string(), input);
        }
    }

    #[test]
    fn parse_invalid() {
        let format = |s: &str| RankError::InvalidFormat { input: s.to_string() };
        assert_eq!(Rank::parse(""), Err(format("")));
        assert_eq!(Rank::parse("0iiiiii"), Err(format("0iiiiii")));
        assert_eq!(Rank::parse("0|aaa|bbb"), Err(format("0|aaa|bbb")));
        assert_eq!(
            Rank::parse("3|iiiiii"),
            Err(RankError::InvalidBucket { input: "3".to_string() })
        );
        assert_eq!(
            Rank::parse("a|iiiiii"),
            Err(RankError::InvalidBucket { input: "a".to_string() })
        );
        assert_eq!(
            Rank::parse("0|AAAAAA"),
            Err(RankError::InvalidValue(ValueError::InvalidSymbol { symbol: 'A', position: 0 }))
        );
        assert_eq!(
            Rank::parse("0|abc!de"),
            Err(RankError::InvalidValue(ValueError::InvalidSymbol { symbol: '!', position: 3 }))
        );
        assert_eq!(Rank::parse("0|"), Err(RankError::InvalidValue(ValueError::Empty)));
        assert!(Rank::parse(" 0|iiiiii").is_err());
        assert!(Rank::parse("0|iiiiii ").is_err());
    }

    #[test]
    fn from_str_delegates_to_parse() {
        let parsed: Rank = "2|abc123".parse().unwrap();
        assert_eq!(parsed.bucket(), Bucket::Two);
        assert_eq!(parsed.value().to_string(), "abc123");
        assert!("nope".parse::<Rank>().is_err());
    }

    #[test]
    fn anchors() {
        assert_eq!(Rank::initial().to_string(), "0|iiiiii");
        assert_eq!(Rank::min().to_string(), "0|000000");
        assert_eq!(Rank::max().to_string(), "0|zzzzzz");
        assert_eq!(Rank::default(), Rank::initial());
        assert_eq!(Rank::initial().len(), 6);
        assert_eq!(Rank::initial().max_len(), 128);
    }

    #[test]
    fn between_same_bucket() {
        let mid = Rank::between(&rank("0|aaaaaa"), &rank("0|zzzzzz")).unwrap();
        assert_eq!(mid.to_string(), "0|n55554");

        let cases = [
            ("0|aaaaaa", "0|zzzzzz"),
            ("0|zzzzzz", "0|aaaaaa"),
            ("0|aaaaaa", "0|aaaaab"),
            ("1|0", "1|1"),
            ("2|abc", "2|abd"),
        ];
        for (a, b) in cases {
            let (a, b) = (rank(a), rank(b));
            let mid = Rank::between(&a, &b).unwrap();
            let (lo, hi) = if a < b { (&a, &b) } else { (&b, &a) };
            assert!(*lo < mid, "{mid:?} not above {lo:?}");
            assert!(mid < *hi, "{mid:?} not below {hi:?}");
            assert_eq!(mid.bucket(), a.bucket());
        }
    }

    #[test]
    fn between_rejects_equal_and_cross_bucket() {
        let a = rank("0|abcdef");
        assert_eq!(Rank::between(&a, &a), Err(RankError::EqualValues));
        assert_eq!(
            Rank::between(&a, &rank("1|abcdef")),
            Err(RankError::CrossBucket { left: Bucket::Zero, right: Bucket::One })
        );
    }

    #[test]
    fn generate_between_cases() {
        let middle = rank("0|iiiiii");
        assert_eq!(Rank::generate_between(None, None).unwrap(), Rank::initial());
        assert_eq!(Rank::generate_between(Some(&middle), None).unwrap().to_string(), "0|r99998");
        assert_eq!(Rank::generate_between(None, Some(&middle)).unwrap().to_string(), "0|999999");
        assert_eq!(
            Rank::generate_between(Some(&rank("0|cccccc")), Some(&rank("0|ffffff")))
                .unwrap()
                .to_string(),
            "0|dvvvvv"
        );
    }

    #[test]
    fn generate_between_reports_saturation() {
        let floor = rank("0|000000");
        assert_eq!(Rank::generate_between(None, Some(&floor)), Err(RankError::Exhausted));

        let ceiling = Rank::new(Bucket::Zero, RankValue::max_value(MAX_LENGTH));
        assert_eq!(Rank::generate_between(Some(&ceiling), None), Err(RankError::Exhausted));
    }

    #[test]
    fn next_and_previous_known_values() {
        let start = Rank::initial();
        assert_eq!(start.next().to_string(), "0|r99998");
        assert_eq!(start.next().next().to_string(), "0|vmmmml");
        assert_eq!(start.previous().to_string(), "0|999999");
        assert_eq!(start.previous().previous().to_string(), "0|4mmmmm");
    }

    #[test]
    fn next_chain_is_ascending() {
        let mut current = Rank::initial();
        for _ in 0..200 {
            let next = current.next();
            assert!(next > current, "{next:?} should be > {current:?}");
            assert_eq!(next.bucket(), current.bucket());
            current = next;
        }
    }

    #[test]
    fn previous_chain_is_descending() {
        let mut current = Rank::initial();
        for _ in 0..200 {
            let previous = current.previous();
            assert!(previous < current, "{previous:?} should be < {current:?}");
            assert_eq!(previous.bucket(), current.bucket());
            current = previous;
        }
    }

    #[test]
    fn next_at_ceiling_extends_by_one_digit() {
        assert_eq!(rank("0|zzzzzz").next().to_string(), "0|zzzzzzh");
        assert_eq!(rank("1|z").next().to_string(), "1|zh");
    }

    #[test]
    fn floor_and_ceiling_saturate() {
        let floor = rank("0|000000");
        assert_eq!(floor.previous(), floor);
        assert_eq!(floor.previous().to_string(), "0|000000");
        assert_eq!(rank("2|0").previous().to_string(), "2|0");

        let ceiling = Rank::new(Bucket::One, RankValue::max_value(MAX_LENGTH));
        assert_eq!(ceiling.next(), ceiling);
    }

    #[test]
    fn exhausted_midpoint_falls_back_to_unit_step() {
        let mut almost = "z".repeat(MAX_LENGTH - 1);
        almost.push('y');
        let next = rank(&format!("0|{almost}")).next();
        assert_eq!(next.value(), &RankValue::max_value(MAX_LENGTH));
        assert_eq!(next.len(), MAX_LENGTH);

        let mut above_floor = "0".repeat(MAX_LENGTH - 1);
        above_floor.push('1');
        let previous = rank(&format!("0|{above_floor}")).previous();
        assert!(previous.value().is_min());
        assert_eq!(previous.len(), MAX_LENGTH);
    }

    #[test]
    fn bucket_migration_keeps_value() {
        let start = Rank::initial();
        let moved = start.in_next_bucket();
        assert_eq!(moved.bucket(), Bucket::One);
        assert_eq!(moved.value(), start.value());

        let moved = start.in_previous_bucket();
        assert_eq!(moved.bucket(), Bucket::Two);
        assert_eq!(moved.value(), start.value());
        assert_eq!(start.to_string(), "0|iiiiii");
    }

    #[test]
    fn ordering() {
        assert_eq!(rank("0|iiiiii").cmp(&rank("0|iiiiii")), std::cmp::Ordering::Equal);
        assert!(rank("0|aaaaaa") < rank("0|zzzzzz"));
        assert!(rank("0|zzzzzz") < rank("1|aaaaaa"));
        assert!(rank("2|aaaaaa") > rank("1|zzzzzz"));
        assert_eq!(rank("0|aaa"), rank("0|aaa000"));
    }

    #[test]
    fn sort() {
        let mut ranks: Vec<Rank> = ["0|zzzzzz", "1|aaaaaa", "0|aaaaaa", "0|iiiiii", "2|aaaaaa"]
            .into_iter()
            .map(rank)
            .collect();
        ranks.sort();
        let sorted: Vec<String> = ranks.iter().map(|r| r.to_string()).collect();
        assert_eq!(sorted, ["0|aaaaaa", "0|iiiiii", "0|zzzzzz", "1|aaaaaa", "2|aaaaaa"]);
    }

    #[test]
    fn needs_rebalance() {
        let fresh = Rank::initial();
        assert!(!fresh.needs_rebalance(0.75));
        assert!(fresh.needs_rebalance(0.01));

        let long = rank(&format!("0|{}", "a".repeat(96)));
        assert!(long.needs_rebalance(0.75));
        assert!(!long.needs_rebalance(0.76));
    }
}
