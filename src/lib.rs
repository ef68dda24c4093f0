//! Lexorank - sortable string keys for ordered lists.
//!
//! A rank is a string like `"0|hzzzzz"` that sorts lexicographically.
//! Moving or inserting an item only writes that item's rank; neighbors
//! are never renumbered. Ranks carry one of three buckets so a list can
//! be rebalanced into a fresh bucket while the live one stays readable.
//!
//! Every type is immutable and every operation returns a new value, so
//! ranks are safe to share across threads without locks.
//!
//! # Quick Start
//!
//! ```
//! use lexorank::Rank;
//!
//! let first = Rank::initial();
//! assert_eq!(first.to_string(), "0|iiiiii");
//!
//! // Append, prepend and insert between.
//! let last = Rank::generate_between(Some(&first), None).unwrap();
//! let head = Rank::generate_between(None, Some(&first)).unwrap();
//! let middle = Rank::generate_between(Some(&first), Some(&last)).unwrap();
//! assert!(head < first && first < middle && middle < last);
//!
//! // Ranks round-trip through their wire form.
//! let parsed: Rank = middle.to_string().parse().unwrap();
//! assert_eq!(parsed, middle);
//! ```
//!
//! # Rebalancing
//!
//! When [`Rank::between`] returns [`RankError::Exhausted`], values have
//! grown too long. Use [`rebalance`] to rewrite a sorted list into short,
//! evenly spaced values in another bucket. [`Rank::needs_rebalance`]
//! reports the problem before it happens.
//!
//! # Inserting against a store
//!
//! Reading neighbors, computing a rank and writing it is not atomic.
//! [`InsertProtocol`] retries the cycle when the store reports a
//! conflict, re-reading neighbors each time.

pub mod adapters;
pub mod alphabet;
pub mod bucket;
pub mod error;
pub mod insert;
pub mod rank;
pub mod rebalance;
pub mod value;

pub use bucket::Bucket;
pub use error::InsertError;
pub use error::RankError;
pub use error::ValueError;
pub use insert::InsertConfig;
pub use insert::InsertProtocol;
pub use insert::Neighbors;
pub use insert::RankStore;
pub use insert::insert_between;
pub use rank::Rank;
pub use rebalance::rebalance;
pub use rebalance::rebalance_into_next;
pub use value::DEFAULT_LENGTH;
pub use value::MAX_LENGTH;
pub use value::RankValue;
