// crates/db/src/repos.rs
// Repository registration and sync lifecycle.

use provenance_types::{Repo, RepoSyncStatus};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::{now_ms, Database, DbResult};

struct RepoRow {
    id: String,
    full_name: String,
    sync_status: String,
    last_synced_at: Option<i64>,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for RepoRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            full_name: row.try_get("full_name")?,
            sync_status: row.try_get("sync_status")?,
            last_synced_at: row.try_get("last_synced_at")?,
        })
    }
}

impl RepoRow {
    fn into_repo(self) -> DbResult<Repo> {
        Ok(Repo {
            id: self.id,
            full_name: self.full_name,
            sync_status: self.sync_status.parse::<RepoSyncStatus>()?,
            last_synced_at: self.last_synced_at,
        })
    }
}

impl Database {
    /// Register a repository, or rename it if the id is already known.
    ///
    /// Sync status is left untouched for existing repositories.
    pub async fn upsert_repo(&self, id: &str, full_name: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO repos (id, full_name, sync_status, created_at)
            VALUES (?1, ?2, 'pending', ?3)
            ON CONFLICT(id) DO UPDATE SET full_name = excluded.full_name
            "#,
        )
        .bind(id)
        .bind(full_name)
        .bind(now_ms())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Update a repository's sync status. Returns `false` if the id is unknown.
    ///
    /// Moving to `Synced` stamps `last_synced_at`.
    pub async fn set_repo_sync_status(&self, id: &str, status: RepoSyncStatus) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE repos SET
                sync_status = ?2,
                last_synced_at = CASE WHEN ?2 = 'synced' THEN ?3 ELSE last_synced_at END
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(now_ms())
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_repo(&self, id: &str) -> DbResult<Option<Repo>> {
        let row: Option<RepoRow> = sqlx::query_as(
            "SELECT id, full_name, sync_status, last_synced_at FROM repos WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        row.map(RepoRow::into_repo).transpose()
    }

    /// Look a repository up by id, falling back to `owner/name`.
    pub async fn find_repo(&self, id_or_name: &str) -> DbResult<Option<Repo>> {
        let row: Option<RepoRow> = sqlx::query_as(
            r#"
            SELECT id, full_name, sync_status, last_synced_at FROM repos
            WHERE id = ?1 OR full_name = ?1
            ORDER BY id = ?1 DESC
            LIMIT 1
            "#,
        )
        .bind(id_or_name)
        .fetch_optional(self.pool())
        .await?;
        row.map(RepoRow::into_repo).transpose()
    }

    /// All repositories, ordered by full name.
    pub async fn list_repos(&self) -> DbResult<Vec<Repo>> {
        let rows: Vec<RepoRow> = sqlx::query_as(
            "SELECT id, full_name, sync_status, last_synced_at FROM repos ORDER BY full_name",
        )
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(RepoRow::into_repo).collect()
    }
}
