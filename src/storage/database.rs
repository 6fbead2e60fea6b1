//! SQLite-backed durable key-value store.
//!
//! Two logical stores back the application: `timer` holds the single state
//! snapshot, `tasks` holds task records keyed by id. Each operation is one
//! SQLite statement and therefore all-or-nothing; readers never observe a
//! half-written value.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use crate::error::StoreError;

use super::data_dir;

/// The logical stores the database exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Tasks,
    Timer,
}

impl StoreKind {
    fn table(self) -> &'static str {
        match self {
            StoreKind::Tasks => "tasks",
            StoreKind::Timer => "timer",
        }
    }
}

/// SQLite database holding the durable stores.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/pomotick/pomotick.db`, creating the
    /// file and schema as needed.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the
    /// database cannot be opened or migrated.
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::DataDir(e.to_string()))?;
        Self::open(dir.join("pomotick.db"))
    }

    /// Open the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS timer (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS tasks (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))
    }

    /// Read a value. `None` when the key is absent.
    pub fn get(&self, store: StoreKind, key: &str) -> Result<Option<String>, StoreError> {
        let sql = format!("SELECT value FROM {} WHERE key = ?1", store.table());
        let mut stmt = self.conn.prepare(&sql)?;
        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a value, replacing any prior one. Last write wins.
    pub fn put(&self, store: StoreKind, key: &str, value: &str) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT OR REPLACE INTO {} (key, value) VALUES (?1, ?2)",
            store.table()
        );
        self.conn.execute(&sql, params![key, value])?;
        Ok(())
    }

    /// Remove a key. Removing an absent key is not an error.
    pub fn delete(&self, store: StoreKind, key: &str) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE key = ?1", store.table());
        self.conn.execute(&sql, params![key])?;
        Ok(())
    }

    /// All values in a store, ordered by key.
    pub fn get_all(&self, store: StoreKind) -> Result<Vec<String>, StoreError> {
        let sql = format!("SELECT value FROM {} ORDER BY key", store.table());
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut values = Vec::new();
        for row in rows {
            values.push(row?);
        }
        Ok(values)
    }

    /// Drop every record in a store.
    pub fn clear(&self, store: StoreKind) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {}", store.table());
        self.conn.execute(&sql, [])?;
        Ok(())
    }
}
