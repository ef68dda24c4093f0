//! The read-compute-write insert cycle with retry on conflict.
//!
//! Generating a rank is pure, but inserting one is not: two writers that
//! read the same neighbors compute the same rank. The store is expected
//! to reject the loser (usually through a UNIQUE constraint on the rank
//! column). The protocol then re-reads the neighbors, which now include
//! the winner, and tries again.
//!
//! Each attempt:
//! 1. Read the current neighbors. An error here is fatal.
//! 2. Compute a rank with [`Rank::generate_between`]. An error here is fatal.
//! 3. Try to write it. Success returns the rank; failure retries from 1.
//!
//! The core supplies no locking and no timeouts. Callbacks that block
//! must handle cancellation themselves.

use crate::error::InsertError;
use crate::rank::Rank;

/// The ranks on either side of the insert position. `None` means the
/// position is at that end of the list.
pub type Neighbors = (Option<Rank>, Option<Rank>);

/// A store the insert protocol can read neighbors from and write to.
///
/// Implementors must re-read on every `neighbors` call so concurrent
/// writes become visible, and must report a duplicate rank from
/// `try_insert` as an error.
pub trait RankStore {
    /// The storage error type.
    type Error: std::error::Error + 'static;

    /// Read the current neighbors of the insert position.
    fn neighbors(&mut self) -> Result<Neighbors, Self::Error>;

    /// Persist a row with `rank`, failing on conflict.
    fn try_insert(&mut self, rank: &Rank) -> Result<(), Self::Error>;
}

/// Tuning for [`InsertProtocol`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InsertConfig {
    /// Total write attempts before giving up. Zero is treated as one.
    pub max_retries: usize,
    /// Fraction of the maximum length at which a freshly written rank
    /// is logged as due for rebalancing.
    pub rebalance_threshold: f64,
}

impl Default for InsertConfig {
    fn default() -> InsertConfig {
        return InsertConfig {
            max_retries: 3,
            rebalance_threshold: 0.75,
        };
    }
}

impl InsertConfig {
    /// The default configuration: 3 attempts, 0.75 threshold.
    pub fn new() -> InsertConfig {
        return InsertConfig::default();
    }

    /// Set the attempt budget.
    pub fn with_max_retries(mut self, max_retries: usize) -> InsertConfig {
        self.max_retries = max_retries;
        return self;
    }

    /// Set the rebalance warning threshold.
    pub fn with_rebalance_threshold(mut self, threshold: f64) -> InsertConfig {
        self.rebalance_threshold = threshold;
        return self;
    }

    /// The attempt budget actually used, at least one.
    #[inline]
    pub fn attempts(&self) -> usize {
        return self.max_retries.max(1);
    }
}

/// Runs the insert cycle against a [`RankStore`] or a pair of callbacks.
#[derive(Clone, Debug, Default)]
pub struct InsertProtocol {
    config: InsertConfig,
}

impl InsertProtocol {
    /// Create a protocol with the given configuration.
    pub fn new(config: InsertConfig) -> InsertProtocol {
        return InsertProtocol { config };
    }

    /// The configuration in use.
    pub fn config(&self) -> &InsertConfig {
        return &self.config;
    }

    /// Insert a new rank into `store`, retrying on write conflicts.
    pub fn insert<S: RankStore>(&self, store: &mut S) -> Result<Rank, InsertError<S::Error>> {
        let attempts = self.config.attempts();
        let mut attempt = 0;
        loop {
            attempt += 1;

            let (prev, next) = store.neighbors().map_err(InsertError::Neighbors)?;
            let rank = Rank::generate_between(prev.as_ref(), next.as_ref())
                .map_err(InsertError::Generate)?;

            let err = match store.try_insert(&rank) {
                Ok(()) => {
                    if rank.needs_rebalance(self.config.rebalance_threshold) {
                        tracing::warn!(
                            %rank,
                            length = rank.len(),
                            threshold = self.config.rebalance_threshold,
                            "rank length crossed rebalance threshold"
                        );
                    }
                    return Ok(rank);
                }
                Err(err) => err,
            };

            if attempt >= attempts {
                tracing::warn!(attempts, error = %err, "rank insert gave up after conflicts");
                return Err(InsertError::MaxRetriesExceeded { attempts, last: err });
            }
            tracing::debug!(attempt, %rank, error = %err, "rank write conflicted, retrying");
        }
    }

    /// Insert using a neighbor-read callback and a write callback.
    pub fn run<E, N, W>(&self, neighbors: N, write: W) -> Result<Rank, InsertError<E>>
    where
        E: std::error::Error + 'static,
        N: FnMut() -> Result<Neighbors, E>,
        W: FnMut(&Rank) -> Result<(), E>,
    {
        let mut callbacks = Callbacks { neighbors, write };
        return self.insert(&mut callbacks);
    }
}

/// Insert with the default configuration and `max_retries` attempts.
///
/// ```
/// use lexorank::{Rank, insert_between};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("unique constraint violation")]
/// struct Conflict;
///
/// let last = Rank::initial();
/// let rank = insert_between(
///     || Ok::<_, Conflict>((Some(last.clone()), None)),
///     |_rank| Ok(()),
///     3,
/// )
/// .unwrap();
/// assert!(rank > last);
/// ```
pub fn insert_between<E, N, W>(neighbors: N, write: W, max_retries: usize) -> Result<Rank, InsertError<E>>
where
    E: std::error::Error + 'static,
    N: FnMut() -> Result<Neighbors, E>,
    W: FnMut(&Rank) -> Result<(), E>,
{
    let config = InsertConfig::default().with_max_retries(max_retries);
    return InsertProtocol::new(config).run(neighbors, write);
}

/// Adapts a callback pair to [`RankStore`].
struct Callbacks<N, W> {
    neighbors: N,
    write: W,
}

impl<E, N, W> RankStore for Callbacks<N, W>
where
    E: std::error::Error + 'static,
    N: FnMut() -> Result<Neighbors, E>,
    W: FnMut(&Rank) -> Result<(), E>,
{
    type Error = E;

    fn neighbors(&mut self) -> Result<Neighbors, E> {
        return (self.neighbors)();
    }

    fn try_insert(&mut self, rank: &Rank) -> Result<(), E> {
        return (self.write)(rank);
    }
}
