//! Catalog database connection.
//!
//! The catalog is a single append-only table written by one uploader at a
//! time, so the pool stays small and the connection settings only cover
//! what that workload needs:
//!
//! | Setting                  | Why                                                          |
//! |--------------------------|--------------------------------------------------------------|
//! | `journal_mode = WAL`     | `stash list` can read while an upload is recording assets    |
//! | `synchronous = NORMAL`   | a lost last commit is re-uploaded on the next run            |
//! | `busy_timeout = 5s`      | two `stash` processes on one catalog wait instead of failing |

use exn::ResultExt;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Uploads are sequential: one connection writes, one spare serves reads.
const FILE_CONNECTIONS: u32 = 2;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection pool for the asset catalog, migrated on open.
///
/// Wrap it in a [`Repository`](crate::Repository) to read and write assets.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the catalog file at `path`, including its
    /// parent directory.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Database)?;
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT);
        Self::open(options, FILE_CONNECTIONS).await
    }

    /// Open a private in-memory catalog.
    ///
    /// Not test-gated: other crates use it in their own tests. Limited to a
    /// single connection, since every `:memory:` connection is its own
    /// database.
    pub async fn connect_in_memory() -> Result<Self> {
        Self::open(SqliteConnectOptions::new().filename(":memory:"), 1).await
    }

    async fn open(options: SqliteConnectOptions, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Database)?;
        MIGRATOR.run(&pool).await.or_raise(|| ErrorKind::Migration)?;
        tracing::debug!(max_connections, "Catalog database ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for outstanding connections and close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
