//! # accord-db
//!
//! libSQL storage for accord.
//!
//! Holds the license catalogue and rules, the scan inventory (pfiles, upload
//! trees, license findings), compatibility results, and agent run records.
//! Implements the database side of the rule cascade ([`TierLookup`]) and the
//! persistent result sink with its dedup guard ([`DbResultStore`]).
//!
//! [`TierLookup`]: accord_core::rules::TierLookup
//! [`DbResultStore`]: repos::results::DbResultStore

pub mod error;
pub mod helpers;
mod lookup;
mod migrations;
pub mod repos;
mod test_support;

use std::sync::Arc;

use error::DatabaseError;
use libsql::Builder;
use tracing::debug;

/// Milliseconds a handle waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Shared database descriptor.
///
/// Owns the libSQL database and a primary handle used for run bookkeeping.
/// Workers obtain their own handle with [`AccordDb::spawn`]. Cloning is cheap
/// and shares the underlying database.
#[derive(Clone)]
pub struct AccordDb {
    db: Arc<libsql::Database>,
    primary: DbHandle,
}

/// One connection to the database.
///
/// Repository methods live on `DbHandle` (see [`repos`]). A handle is not
/// shared between workers.
#[derive(Clone)]
pub struct DbHandle {
    conn: libsql::Connection,
}

impl AccordDb {
    /// Open a local database at the given path.
    ///
    /// Runs migrations automatically on first open. File-backed databases are
    /// switched to WAL so worker handles can read while another writes.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Arc::new(Builder::new_local(path).build().await?);
        let primary = DbHandle::connect(&db).await?;

        if path != ":memory:" {
            primary
                .conn
                .query("PRAGMA journal_mode = WAL", ())
                .await
                .map_err(|e| DatabaseError::Migration(format!("PRAGMA journal_mode: {e}")))?;
        }

        let accord_db = Self { db, primary };
        accord_db.run_migrations().await?;
        debug!(path, "database opened");
        Ok(accord_db)
    }

    /// Handle used for run bookkeeping and single-threaded work.
    #[must_use]
    pub const fn primary(&self) -> &DbHandle {
        &self.primary
    }

    /// Open a new handle for one worker.
    ///
    /// Each call opens its own connection. Note that every connection to a
    /// `:memory:` database sees a separate, empty database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be opened.
    pub async fn spawn(&self) -> Result<DbHandle, DatabaseError> {
        DbHandle::connect(&self.db).await
    }
}

impl DbHandle {
    async fn connect(db: &libsql::Database) -> Result<Self, DatabaseError> {
        let conn = db.connect()?;

        // Per-connection in SQLite.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
        conn.query(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"), ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;

        Ok(Self { conn })
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
