// crates/db/src/commits.rs
// Classified commit ledger with incremental per-repository bucket upkeep.

use provenance_types::{Classification, CommitRecord};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::buckets::{self, RepoBucket};
use crate::{now_ms, Database, DbResult};

/// Insert one commit and count it into its weekly and daily buckets.
///
/// Returns `false` without touching any bucket when `(repo_id, sha)` is
/// already recorded.
pub(crate) async fn insert_commit(
    conn: &mut SqliteConnection,
    repo_id: &str,
    commit: &CommitRecord,
) -> DbResult<bool> {
    let week = RepoBucket::Weekly.key_for(commit.committed_at)?;
    let day = RepoBucket::Daily.key_for(commit.committed_at)?;

    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO commits (
            repo_id, sha, committed_at, classification, author_login,
            pr_number, additions, deletions, recorded_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(repo_id)
    .bind(&commit.sha)
    .bind(commit.committed_at)
    .bind(commit.classification.as_str())
    .bind(commit.author_login.as_deref())
    .bind(commit.pr_number)
    .bind(commit.additions)
    .bind(commit.deletions)
    .bind(now_ms())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    for (bucket, key) in [(RepoBucket::Weekly, week), (RepoBucket::Daily, day)] {
        buckets::add_commit(
            conn,
            bucket,
            repo_id,
            key,
            commit.classification,
            commit.additions,
            commit.deletions,
        )
        .await?;
    }
    Ok(true)
}

impl Database {
    /// Record a classified commit. Idempotent on `(repo_id, sha)`.
    ///
    /// Returns `true` if the commit was new.
    pub async fn record_commit(&self, repo_id: &str, commit: &CommitRecord) -> DbResult<bool> {
        let mut tx = self.pool().begin().await?;
        let inserted = insert_commit(&mut tx, repo_id, commit).await?;
        tx.commit().await?;

        debug!(
            repo_id,
            sha = %commit.sha,
            classification = %commit.classification,
            inserted,
            "Recorded commit"
        );
        Ok(inserted)
    }

    /// Record a batch of commits in one transaction. Returns how many were new.
    pub async fn record_commits(&self, repo_id: &str, commits: &[CommitRecord]) -> DbResult<usize> {
        let mut tx = self.pool().begin().await?;
        let mut inserted = 0usize;
        for commit in commits {
            if insert_commit(&mut tx, repo_id, commit).await? {
                inserted += 1;
            }
        }
        tx.commit().await?;

        debug!(
            repo_id,
            total = commits.len(),
            inserted,
            "Recorded commit batch"
        );
        Ok(inserted)
    }

    /// Current classification of a recorded commit.
    pub async fn get_commit_classification(
        &self,
        repo_id: &str,
        sha: &str,
    ) -> DbResult<Option<Classification>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT classification FROM commits WHERE repo_id = ?1 AND sha = ?2")
                .bind(repo_id)
                .bind(sha)
                .fetch_optional(self.pool())
                .await?;
        match row {
            Some((s,)) => Ok(Some(s.parse::<Classification>()?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::DbError;

    // Wednesday 2024-05-15 15:30 UTC
    const TS: i64 = 1_715_787_000_000;
    const WEEK: i64 = 1_715_558_400_000;
    const DAY: i64 = 1_715_731_200_000;

    async fn setup() -> Database {
        let db = Database::new_in_memory().await.unwrap();
        db.upsert_repo("r1", "acme/widgets").await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_record_commit_updates_both_buckets() {
        let db = setup().await;
        let commit = CommitRecord::new("a1", TS, Classification::Claude).with_churn(12, 3);
        assert!(db.record_commit("r1", &commit).await.unwrap());

        let weekly = db.repo_weekly_stats("r1").await.unwrap();
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].week_start, WEEK);
        assert_eq!(weekly[0].totals.counts.claude, 1);
        assert_eq!(weekly[0].totals.additions, 12);
        assert_eq!(weekly[0].totals.deletions, 3);

        let daily = db.repo_daily_stats("r1").await.unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].day_start, DAY);
        assert_eq!(daily[0].totals, weekly[0].totals);
    }

    #[tokio::test]
    async fn test_record_commit_is_idempotent() {
        let db = setup().await;
        let commit = CommitRecord::new("a1", TS, Classification::Human).with_churn(5, 0);
        assert!(db.record_commit("r1", &commit).await.unwrap());
        assert!(!db.record_commit("r1", &commit).await.unwrap());

        let weekly = db.repo_weekly_stats("r1").await.unwrap();
        assert_eq!(weekly[0].totals.counts.human, 1);
        assert_eq!(weekly[0].totals.additions, 5);
    }

    #[tokio::test]
    async fn test_record_commits_accumulates_into_same_bucket() {
        let db = setup().await;
        let commits = vec![
            CommitRecord::new("a1", TS, Classification::Human),
            CommitRecord::new("a2", TS + 3_600_000, Classification::Human),
            CommitRecord::new("a3", TS + 86_400_000, Classification::Dependabot),
            CommitRecord::new("a1", TS, Classification::Human),
        ];
        assert_eq!(db.record_commits("r1", &commits).await.unwrap(), 3);

        let weekly = db.repo_weekly_stats("r1").await.unwrap();
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].totals.counts.human, 2);
        assert_eq!(weekly[0].totals.counts.dependabot, 1);

        let daily = db.repo_daily_stats("r1").await.unwrap();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[1].day_start, DAY + 86_400_000);
    }

    #[tokio::test]
    async fn test_late_columns_start_null_and_count_up() {
        let db = setup().await;
        db.record_commit("r1", &CommitRecord::new("a1", TS, Classification::Codex))
            .await
            .unwrap();
        db.record_commit("r1", &CommitRecord::new("a2", TS, Classification::Codex))
            .await
            .unwrap();

        let gemini: (Option<i64>,) =
            sqlx::query_as("SELECT gemini FROM repo_weekly_stats WHERE repo_id = 'r1'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(gemini.0, None);

        let weekly = db.repo_weekly_stats("r1").await.unwrap();
        assert_eq!(weekly[0].totals.counts.codex, 2);
        assert_eq!(weekly[0].totals.counts.gemini, 0);
    }

    #[tokio::test]
    async fn test_invalid_timestamp_writes_nothing() {
        let db = setup().await;
        let bad = CommitRecord::new("a1", i64::MAX, Classification::Human);
        assert!(matches!(
            db.record_commit("r1", &bad).await,
            Err(DbError::InvalidTimestamp(_))
        ));
        assert_eq!(db.get_commit_classification("r1", "a1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_batch_rolls_back_on_error() {
        let db = setup().await;
        let commits = vec![
            CommitRecord::new("a1", TS, Classification::Human),
            CommitRecord::new("a2", i64::MIN, Classification::Human),
        ];
        assert!(db.record_commits("r1", &commits).await.is_err());
        assert_eq!(db.get_commit_classification("r1", "a1").await.unwrap(), None);
        assert!(db.repo_weekly_stats("r1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_commit_classification() {
        let db = setup().await;
        let commit = CommitRecord::new("a1", TS, Classification::GithubActions)
            .with_author("github-actions[bot]")
            .with_pr(42);
        db.record_commit("r1", &commit).await.unwrap();
        assert_eq!(
            db.get_commit_classification("r1", "a1").await.unwrap(),
            Some(Classification::GithubActions)
        );
    }
}
