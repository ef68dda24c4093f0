//! Bulk redistribution of ranks into a fresh bucket.
//!
//! When values grow long (or `between` reports exhaustion), the whole
//! list is rewritten into another bucket with short, evenly spaced
//! values. Readers keep using the old bucket until the migration is
//! done.
//!
//! ```
//! use lexorank::{Bucket, Rank, rebalance};
//!
//! let first = Rank::initial();
//! let ranks = [first.clone(), first.next(), first.next().next()];
//! let fresh = rebalance(&ranks, Bucket::One);
//! let wire: Vec<String> = fresh.iter().map(|r| r.to_string()).collect();
//! assert_eq!(wire, ["1|8zzzzz", "1|hzzzzy", "1|qzzzzx"]);
//! ```

use num_bigint::BigUint;

use crate::bucket::Bucket;
use crate::rank::Rank;
use crate::value;
use crate::value::DEFAULT_LENGTH;
use crate::value::MAX_LENGTH;
use crate::value::RankValue;

/// Digits added each time the default length is too short to space the input.
const WIDEN_BY: usize = 2;

/// Redistribute `ranks` evenly across the key space of `bucket`.
///
/// `ranks` must already be sorted ascending. The output has the same
/// length and order. With `n` ranks, the space between the all-`'0'`
/// and all-`'z'` values of the default length is split into `n + 1`
/// equal steps and the i-th rank gets `min + step * (i + 1)`. If the
/// step would be zero the length is widened by two digits.
pub fn rebalance(ranks: &[Rank], bucket: Bucket) -> Vec<Rank> {
    debug_assert!(
        ranks.windows(2).all(|pair| pair[0] <= pair[1]),
        "rebalance input must be sorted"
    );

    let count = ranks.len();
    if count == 0 {
        return Vec::new();
    }

    let (length, min, step) = spacing(count);

    tracing::debug!(
        count,
        length,
        widened = length > DEFAULT_LENGTH,
        %bucket,
        "rebalancing ranks"
    );

    let mut result = Vec::with_capacity(count);
    let mut offset = min;
    for _ in 0..count {
        offset += &step;
        let digits = value::from_integer(&offset, length);
        result.push(Rank::new(bucket, value::from_digits(digits)));
    }
    return result;
}

/// Pick the value length and the even step for `count` ranks.
///
/// Returns `(length, min, step)`. Starts at the default length and
/// widens until the step is non-zero or the maximum length is reached.
fn spacing(count: usize) -> (usize, BigUint, BigUint) {
    let divisor = BigUint::from(count) + 1u32;
    let mut length = DEFAULT_LENGTH;
    loop {
        let min = RankValue::min_value(length).integer();
        let max = RankValue::max_value(length).integer();
        let step = (&max - &min) / &divisor;
        if step != BigUint::default() || length + WIDEN_BY > MAX_LENGTH {
            return (length, min, step);
        }
        length += WIDEN_BY;
    }
}

/// Rebalance into the bucket after the one `ranks` currently live in.
///
/// The live bucket is taken from the first rank. Empty input yields
/// empty output.
pub fn rebalance_into_next(ranks: &[Rank]) -> Vec<Rank> {
    let Some(first) = ranks.first() else {
        return Vec::new();
    };
    return rebalance(ranks, first.bucket().next());
}
