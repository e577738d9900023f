// crates/db/src/lib.rs
// SQLite store for classified commits and their stat buckets.

mod buckets;
pub mod commits;
mod migrations;
pub mod queries;
pub mod recompute;
pub mod reclassify;
pub mod repos;

pub use queries::HumanShare;
pub use recompute::RecomputeReport;
pub use reclassify::{PrReclassification, ReclassifyOutcome};

use provenance_types::TypesError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{ConnectOptions, SqlitePool};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Failed to determine cache directory")]
    NoCacheDir,

    #[error("Failed to create database directory: {0}")]
    CreateDir(#[from] std::io::Error),

    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    #[error("Corrupt stored value: {0}")]
    Corrupt(#[from] TypesError),

    #[error("Store schema version {found} is newer than this build ({known})")]
    SchemaTooNew { found: usize, known: usize },
}

pub type DbResult<T> = Result<T, DbError>;

/// Handle to the provenance store: a small SQLite pool plus the file it
/// lives in.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    db_path: PathBuf,
}

/// Pool connections. Recompute holds one for its whole transaction while
/// readers and the commit ledger share the rest.
const MAX_CONNECTIONS: u32 = 4;

impl Database {
    /// Open (or create) the store at `path`, creating parent directories and
    /// bringing the schema up to date.
    pub async fn new(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30))
            .log_slow_statements(tracing::log::LevelFilter::Warn, Duration::from_secs(5));

        let db = Self::connect(options, path.to_owned()).await?;
        info!(path = %path.display(), "Provenance store opened");
        Ok(db)
    }

    /// Private in-memory store, used by tests.
    ///
    /// Every pool connection shares the same memory database, so a
    /// transaction on one connection is visible to reads on another.
    pub async fn new_in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .shared_cache(true)
            .busy_timeout(Duration::from_secs(5));
        Self::connect(options, PathBuf::new()).await
    }

    /// Open the store at [`default_db_path`].
    pub async fn open_default() -> DbResult<Self> {
        let path = default_db_path()?;
        Self::new(&path).await
    }

    async fn connect(options: SqliteConnectOptions, db_path: PathBuf) -> DbResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;
        let db = Self { pool, db_path };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Schema version recorded in `_migrations`, 0 for a fresh store.
    pub async fn schema_version(&self) -> DbResult<usize> {
        let (version,): (i64,) =
            sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM _migrations")
                .fetch_one(&self.pool)
                .await?;
        Ok(version.max(0) as usize)
    }

    /// Apply every migration newer than the recorded schema version.
    ///
    /// Each migration commits together with its version row, so an
    /// interrupted upgrade resumes at the first unapplied step. A store
    /// written by a newer build is refused rather than read with a schema
    /// this build does not know.
    async fn run_migrations(&self) -> DbResult<()> {
        sqlx::query("CREATE TABLE IF NOT EXISTS _migrations (version INTEGER PRIMARY KEY)")
            .execute(&self.pool)
            .await?;

        let known = migrations::MIGRATIONS.len();
        let current = self.schema_version().await?;
        if current > known {
            return Err(DbError::SchemaTooNew {
                found: current,
                known,
            });
        }

        for (version, sql) in migrations::MIGRATIONS.iter().enumerate().skip(current) {
            let version = version + 1;
            let mut tx = self.pool.begin().await?;
            sqlx::query(sql).execute(&mut *tx).await?;
            sqlx::query("INSERT INTO _migrations (version) VALUES (?1)")
                .bind(version as i64)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            debug!(version, "Applied store migration");
        }

        if current < known {
            info!(from = current, to = known, "Store schema upgraded");
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Path of the store file; empty for in-memory stores.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Returns the default database path: `~/.cache/provenance/provenance.db`
pub fn default_db_path() -> DbResult<PathBuf> {
    dirs::cache_dir()
        .map(|d| d.join("provenance").join("provenance.db"))
        .ok_or(DbError::NoCacheDir)
}

/// Current wall-clock time in epoch milliseconds.
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
