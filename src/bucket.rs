//! The three rotating rank namespaces.
//!
//! One bucket is live at a time. Rebalancing writes fresh values into
//! the next bucket while readers keep using the live one, then the
//! next bucket becomes live.

use std::fmt;

use crate::error::RankError;

/// Number of buckets in the rotation.
pub const BUCKET_COUNT: u8 = 3;

/// One of the three buckets `0`, `1`, `2`. Ordered by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Bucket {
    #[default]
    Zero = 0,
    One = 1,
    Two = 2,
}

impl Bucket {
    /// All buckets in index order.
    pub const ALL: [Bucket; 3] = [Bucket::Zero, Bucket::One, Bucket::Two];

    /// The bucket for an index, wrapping modulo three.
    #[inline]
    pub fn from_index(index: u8) -> Bucket {
        return Bucket::ALL[(index % BUCKET_COUNT) as usize];
    }

    /// The numeric index of this bucket.
    #[inline]
    pub fn index(self) -> u8 {
        return self as u8;
    }

    /// The next bucket in the rotation (0 -> 1 -> 2 -> 0).
    #[inline]
    pub fn next(self) -> Bucket {
        return Bucket::from_index(self.index() + 1);
    }

    /// The previous bucket in the rotation (0 -> 2 -> 1 -> 0).
    #[inline]
    pub fn previous(self) -> Bucket {
        return Bucket::from_index(self.index() + BUCKET_COUNT - 1);
    }

    /// Parse the single-digit bucket part of a wire string.
    pub fn parse(s: &str) -> Result<Bucket, RankError> {
        return match s {
            "0" => Ok(Bucket::Zero),
            "1" => Ok(Bucket::One),
            "2" => Ok(Bucket::Two),
            _ => Err(RankError::InvalidBucket { input: s.to_string() }),
        };
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.index());
    }
}
