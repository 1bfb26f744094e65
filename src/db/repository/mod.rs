//! Repository layer: collection-scoped store operations.
//!
//! Functions borrow a `Connection`; callers obtain one through
//! `DocumentStore::with_conn`. Identifiers and timestamps are assigned
//! here, on insert, the way a document store would.

mod medication;
mod user;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use super::DatabaseError;

pub use medication::*;
pub use user::*;

/// Current time at the precision the store keeps (milliseconds).
pub(crate) fn store_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(
    collection: &str,
    raw: &str,
) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::InvalidDocument {
            collection: collection.into(),
            reason: format!("bad timestamp {raw:?}: {e}"),
        })
}

/// Map a UNIQUE constraint failure to `DuplicateKey`.
pub(crate) fn unique_violation(
    err: rusqlite::Error,
    collection: &str,
    field: &str,
) -> DatabaseError {
    if let rusqlite::Error::SqliteFailure(ref failure, _) = err {
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return DatabaseError::DuplicateKey {
                collection: collection.into(),
                field: field.into(),
            };
        }
    }
    DatabaseError::Sqlite(err)
}
