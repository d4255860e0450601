//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections, and the
//! shared [`Database`] handle the engine components are constructed with.

use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;
use custrack_core::errors::{ExError, ExErrorKind};
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How long a writer waits on a locked database before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path).map_err(from_rusqlite)?;
    configure(&conn)?;
    Ok(conn)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(from_rusqlite)?;
    configure(&conn)?;
    Ok(conn)
}

/// Apply connection settings
pub fn configure(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .map_err(from_rusqlite)?;

    // journal_mode reports the resulting mode as a row
    let _mode: String = conn
        .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
        .map_err(from_rusqlite)?;

    conn.busy_timeout(BUSY_TIMEOUT).map_err(from_rusqlite)?;

    register_fold_case(conn)?;

    Ok(())
}

/// `fold_case(text)`: Unicode lowercase, for case-insensitive search
///
/// SQLite's built-in `lower()` only folds ASCII; search terms are folded with
/// [`str::to_lowercase`] on the Rust side, so columns must use the same rule.
fn register_fold_case(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
    .map_err(from_rusqlite)
}

/// Shared, migrated connection handle
///
/// Cloning is cheap; all clones use the same connection. Callers borrow it
/// through [`Database::with_conn`] for the duration of one operation.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (creating if needed) and migrate the database file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = open(path)?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Migrated in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = open_in_memory()?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already configured connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` with exclusive use of the connection
    ///
    /// # Errors
    ///
    /// Returns a `Concurrency` error if a previous holder panicked, otherwise
    /// whatever `f` returns.
    pub fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut guard = self.conn.lock().map_err(|_| {
            ExError::new(ExErrorKind::Concurrency)
                .with_op("db_lock")
                .with_message("database connection lock poisoned")
        })?;
        f(&mut guard)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}
