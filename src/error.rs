//! Error types for rank parsing, generation and insertion.
//!
//! All failures are returned by value. The only panic in the crate is
//! [`crate::alphabet::to_char`] on an out-of-range digit.

use crate::bucket::Bucket;

/// Why a rank value string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// The value had no symbols.
    #[error("rank value must not be empty")]
    Empty,

    /// A symbol outside the base36 alphabet was found.
    #[error("invalid character {symbol:?} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    /// The value is longer than the maximum precision.
    #[error("rank value length {length} exceeds maximum {max}")]
    TooLong { length: usize, max: usize },
}

/// Errors from parsing or deriving ranks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankError {
    /// The wire string is not `"{bucket}|{value}"`.
    #[error("invalid rank format {input:?}, expected \"{{bucket}}|{{value}}\"")]
    InvalidFormat { input: String },

    /// The bucket part is not `0`, `1` or `2`.
    #[error("invalid bucket {input:?}, must be 0, 1, or 2")]
    InvalidBucket { input: String },

    /// The value part is empty, too long, or contains a bad symbol.
    #[error("invalid rank value: {0}")]
    InvalidValue(#[from] ValueError),

    /// `between` was asked to bridge two buckets.
    #[error("cannot compute midpoint across buckets {left} and {right}")]
    CrossBucket { left: Bucket, right: Bucket },

    /// `between` was given two equal values. Not an exhaustion signal.
    #[error("cannot compute midpoint of equal rank values")]
    EqualValues,

    /// No value fits between the operands within the maximum length.
    /// Recover by rebalancing into a fresh bucket.
    #[error("rank exhausted, rebalancing required")]
    Exhausted,
}

/// Errors from the insert retry loop.
///
/// `E` is the storage error type returned by the caller's callbacks.
#[derive(Debug, thiserror::Error)]
pub enum InsertError<E>
where
    E: std::error::Error + 'static,
{
    /// Reading neighbors failed. Never retried.
    #[error("neighbors: {0}")]
    Neighbors(#[source] E),

    /// Computing a candidate rank failed, typically [`RankError::Exhausted`].
    #[error("gen rank: {0}")]
    Generate(#[source] RankError),

    /// Every write attempt conflicted.
    #[error("max retries exceeded after {attempts} attempts: last error: {last}")]
    MaxRetriesExceeded {
        attempts: usize,
        #[source]
        last: E,
    },
}

impl<E> InsertError<E>
where
    E: std::error::Error + 'static,
{
    /// Whether the failure came from the attempt budget running out.
    pub fn is_max_retries_exceeded(&self) -> bool {
        return matches!(self, InsertError::MaxRetriesExceeded { .. });
    }

    /// Whether the underlying rank space between the neighbors is used up.
    pub fn is_exhausted(&self) -> bool {
        return matches!(self, InsertError::Generate(RankError::Exhausted));
    }
}
