//! Document store backed by an embedded SQLite database.
//!
//! Two collections live here: `users` (unique on email) and
//! `medications`. The connection is opened once at startup and shared
//! by every request through `DocumentStore`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::Connection;

use super::DatabaseError;

/// Where the store keeps its data, parsed from the connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

impl StoreLocation {
    /// Parse a connection string.
    ///
    /// Accepted forms: `sqlite::memory:`, `:memory:`, `sqlite://<path>`,
    /// `sqlite:<path>`, `file:<path>`, or a bare filesystem path.
    pub fn parse(uri: &str) -> Result<Self, DatabaseError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(DatabaseError::NotConfigured);
        }
        if uri == ":memory:" || uri == "sqlite::memory:" {
            return Ok(Self::Memory);
        }

        let path = uri
            .strip_prefix("sqlite://")
            .or_else(|| uri.strip_prefix("sqlite:"))
            .or_else(|| uri.strip_prefix("file:"))
            .unwrap_or(uri);

        if path.contains("://") {
            return Err(DatabaseError::Connection {
                uri: uri.to_string(),
                reason: "unsupported store scheme".into(),
            });
        }
        if path.is_empty() {
            return Err(DatabaseError::Connection {
                uri: uri.to_string(),
                reason: "missing database path".into(),
            });
        }

        Ok(Self::File(PathBuf::from(path)))
    }
}

/// Shared handle to the document store.
pub struct DocumentStore {
    conn: Mutex<Connection>,
    location: StoreLocation,
}

impl DocumentStore {
    /// Connect using a connection string. `None` fails with `NotConfigured`.
    pub fn connect(uri: Option<&str>) -> Result<Self, DatabaseError> {
        let uri = uri.ok_or(DatabaseError::NotConfigured)?;
        let location = StoreLocation::parse(uri)?;

        let conn = match &location {
            StoreLocation::Memory => open_memory_database(),
            StoreLocation::File(path) => open_database(path),
        }
        .map_err(|e| match e {
            DatabaseError::Sqlite(inner) => DatabaseError::Connection {
                uri: uri.to_string(),
                reason: inner.to_string(),
            },
            other => other,
        })?;

        tracing::info!(?location, "Connected to document store");

        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    /// In-memory store with migrations applied (tests, demos).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self {
            conn: Mutex::new(open_memory_database()?),
            location: StoreLocation::Memory,
        })
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Run `f` with exclusive access to the connection.
    ///
    /// Never call this across an `.await`: the guard is a std mutex.
    pub fn with_conn<T, F>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> Result<T, DatabaseError>,
    {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        f(&conn)
    }
}

/// Open a SQLite connection to the given path and run migrations
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![(
        1,
        include_str!("../../resources/migrations/001_initial.sql"),
    )];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}

/// Count collections (tables) in the store, for verification
pub fn count_collections(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_initializes_all_collections() {
        let conn = open_memory_database().unwrap();
        // schema_version + users + medications
        assert_eq!(count_collections(&conn).unwrap(), 3);
    }

    #[test]
    fn schema_version_is_current() {
        let conn = open_memory_database().unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn migration_idempotent() {
        let conn = open_memory_database().unwrap();
        assert!(run_migrations(&conn).is_ok());
    }

    #[test]
    fn parses_memory_locations() {
        assert_eq!(StoreLocation::parse(":memory:").unwrap(), StoreLocation::Memory);
        assert_eq!(
            StoreLocation::parse("sqlite::memory:").unwrap(),
            StoreLocation::Memory
        );
    }

    #[test]
    fn parses_file_locations() {
        let expected = StoreLocation::File(PathBuf::from("data/med.db"));
        assert_eq!(StoreLocation::parse("sqlite://data/med.db").unwrap(), expected);
        assert_eq!(StoreLocation::parse("file:data/med.db").unwrap(), expected);
        assert_eq!(StoreLocation::parse("data/med.db").unwrap(), expected);
    }

    #[test]
    fn rejects_foreign_scheme() {
        let err = StoreLocation::parse("mongodb://localhost:27017/meds").unwrap_err();
        assert!(matches!(err, DatabaseError::Connection { .. }));
    }

    #[test]
    fn connect_without_uri_fails() {
        let err = DocumentStore::connect(None).err().unwrap();
        assert!(matches!(err, DatabaseError::NotConfigured));
    }

    #[test]
    fn connect_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let uri = format!("sqlite://{}/no/such/dir/med.db", dir.path().display());
        let err = DocumentStore::connect(Some(&uri)).err().unwrap();
        assert!(matches!(err, DatabaseError::Connection { .. }), "got {err:?}");
    }

    #[test]
    fn store_opens_from_disk_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let uri = format!("sqlite://{}", dir.path().join("med.db").display());

        let store = DocumentStore::connect(Some(&uri)).unwrap();
        let count = store.with_conn(count_collections).unwrap();
        assert_eq!(count, 3);
        drop(store);

        let store = DocumentStore::connect(Some(&uri)).unwrap();
        assert_eq!(store.with_conn(count_collections).unwrap(), 3);
        assert!(matches!(store.location(), StoreLocation::File(_)));
    }
}
