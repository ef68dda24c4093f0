//! SQLite support: a rank is stored in a TEXT column as its wire string.
//!
//! Reading accepts TEXT or a UTF-8 BLOB. Put a UNIQUE constraint on the
//! column so concurrent duplicate inserts fail, which is what
//! [`crate::insert`] relies on to retry.
//!
//! The constraint compares text, not positions. `"0|abc"` and
//! `"0|abc000"` are equal ranks but distinct strings, so both pass it.
//! Writers racing on the same neighbors compute the same string, so
//! the constraint still catches them. Hand-written rows may slip past.

use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSql;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;

use crate::rank::Rank;

impl ToSql for Rank {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        return Ok(ToSqlOutput::from(self.to_string()));
    }
}

impl FromSql for Rank {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let bytes = match value {
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => bytes,
            _ => return Err(FromSqlError::InvalidType),
        };
        let text = std::str::from_utf8(bytes).map_err(|e| FromSqlError::Other(Box::new(e)))?;
        return Rank::parse(text).map_err(|e| FromSqlError::Other(Box::new(e)));
    }
}
