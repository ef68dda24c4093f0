//! Conversions between ranks and external representations.
//!
//! Every adapter delegates to [`crate::Rank::parse`] and the `Display`
//! impl, so malformed input is rejected exactly as `parse` rejects it.
//! Plain text needs no adapter: use `to_string()` and `str::parse`.

#[cfg(feature = "serde")]
mod serde_impls;
#[cfg(feature = "rusqlite")]
mod sql;
