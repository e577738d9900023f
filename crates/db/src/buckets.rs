// crates/db/src/buckets.rs
// Column lists, row decoding and in-place updates for the stat bucket tables.

use std::sync::LazyLock;

use provenance_core::{day_start, week_start};
use provenance_types::{
    Classification, ClassificationCounts, GlobalDailyStat, GlobalWeeklyStat, RepoDailyStat,
    RepoWeeklyStat, StatTotals,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::{DbError, DbResult};

/// Count columns in `Classification::ALL` order: `human, copilot, ...`.
pub(crate) static COUNT_COLUMNS: LazyLock<String> = LazyLock::new(|| {
    Classification::ALL
        .iter()
        .map(|c| c.column())
        .collect::<Vec<_>>()
        .join(", ")
});

/// Which per-repository bucket table a commit lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RepoBucket {
    Weekly,
    Daily,
}

impl RepoBucket {
    pub(crate) const BOTH: [RepoBucket; 2] = [RepoBucket::Weekly, RepoBucket::Daily];

    pub(crate) fn table(self) -> &'static str {
        match self {
            RepoBucket::Weekly => "repo_weekly_stats",
            RepoBucket::Daily => "repo_daily_stats",
        }
    }

    pub(crate) fn key_column(self) -> &'static str {
        match self {
            RepoBucket::Weekly => "week_start",
            RepoBucket::Daily => "day_start",
        }
    }

    /// Bucket key for a commit timestamp.
    pub(crate) fn key_for(self, ts_ms: i64) -> DbResult<i64> {
        let key = match self {
            RepoBucket::Weekly => week_start(ts_ms),
            RepoBucket::Daily => day_start(ts_ms),
        };
        key.ok_or(DbError::InvalidTimestamp(ts_ms))
    }
}

/// Decode counts and churn. NULL columns (rows older than the column) read as 0.
pub(crate) fn totals_from_row(row: &SqliteRow) -> Result<StatTotals, sqlx::Error> {
    let mut counts = ClassificationCounts::default();
    for c in Classification::ALL {
        let n: Option<i64> = row.try_get(c.column())?;
        *counts.get_mut(c) = n.unwrap_or(0);
    }
    let additions: Option<i64> = row.try_get("additions")?;
    let deletions: Option<i64> = row.try_get("deletions")?;
    Ok(StatTotals {
        counts,
        additions: additions.unwrap_or(0),
        deletions: deletions.unwrap_or(0),
    })
}

pub(crate) struct RepoWeeklyRow(pub RepoWeeklyStat);

impl<'r> sqlx::FromRow<'r, SqliteRow> for RepoWeeklyRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(RepoWeeklyStat {
            repo_id: row.try_get("repo_id")?,
            week_start: row.try_get("week_start")?,
            totals: totals_from_row(row)?,
        }))
    }
}

pub(crate) struct RepoDailyRow(pub RepoDailyStat);

impl<'r> sqlx::FromRow<'r, SqliteRow> for RepoDailyRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(RepoDailyStat {
            repo_id: row.try_get("repo_id")?,
            day_start: row.try_get("day_start")?,
            totals: totals_from_row(row)?,
        }))
    }
}

pub(crate) struct GlobalWeeklyRow(pub GlobalWeeklyStat);

impl<'r> sqlx::FromRow<'r, SqliteRow> for GlobalWeeklyRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(GlobalWeeklyStat {
            week_start: row.try_get("week_start")?,
            totals: totals_from_row(row)?,
            repo_count: row.try_get("repo_count")?,
        }))
    }
}

pub(crate) struct GlobalDailyRow(pub GlobalDailyStat);

impl<'r> sqlx::FromRow<'r, SqliteRow> for GlobalDailyRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(GlobalDailyStat {
            day_start: row.try_get("day_start")?,
            totals: totals_from_row(row)?,
            repo_count: row.try_get("repo_count")?,
        }))
    }
}

/// Count one commit into a repository bucket, creating the row on first use.
pub(crate) async fn add_commit(
    conn: &mut SqliteConnection,
    bucket: RepoBucket,
    repo_id: &str,
    key: i64,
    classification: Classification,
    additions: i64,
    deletions: i64,
) -> DbResult<()> {
    let sql = format!(
        r#"
        INSERT INTO {table} (repo_id, {key_col}, {col}, additions, deletions)
        VALUES (?1, ?2, 1, ?3, ?4)
        ON CONFLICT(repo_id, {key_col}) DO UPDATE SET
            {col} = COALESCE({col}, 0) + 1,
            additions = COALESCE(additions, 0) + excluded.additions,
            deletions = COALESCE(deletions, 0) + excluded.deletions
        "#,
        table = bucket.table(),
        key_col = bucket.key_column(),
        col = classification.column(),
    );
    sqlx::query(&sql)
        .bind(repo_id)
        .bind(key)
        .bind(additions)
        .bind(deletions)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Move one commit from one classification column to another within a bucket.
pub(crate) async fn move_commit(
    conn: &mut SqliteConnection,
    bucket: RepoBucket,
    repo_id: &str,
    key: i64,
    from: Classification,
    to: Classification,
) -> DbResult<()> {
    let sql = format!(
        r#"
        UPDATE {table} SET
            {from} = MAX(COALESCE({from}, 0) - 1, 0),
            {to} = COALESCE({to}, 0) + 1
        WHERE repo_id = ?1 AND {key_col} = ?2
        "#,
        table = bucket.table(),
        key_col = bucket.key_column(),
        from = from.column(),
        to = to.column(),
    );
    let result = sqlx::query(&sql)
        .bind(repo_id)
        .bind(key)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        tracing::warn!(
            repo_id,
            table = bucket.table(),
            key,
            "No bucket row for reclassified commit"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_columns_order() {
        assert!(COUNT_COLUMNS.starts_with("human, copilot, claude"));
        assert!(COUNT_COLUMNS.ends_with("ai_assisted, other_bot"));
        assert_eq!(COUNT_COLUMNS.split(", ").count(), Classification::ALL.len());
    }

    #[test]
    fn test_bucket_keys() {
        // Wednesday 2024-05-15 15:30 UTC
        let ts = 1_715_787_000_000;
        assert_eq!(RepoBucket::Weekly.key_for(ts).unwrap(), 1_715_558_400_000);
        assert_eq!(RepoBucket::Daily.key_for(ts).unwrap(), 1_715_731_200_000);
        assert!(matches!(
            RepoBucket::Weekly.key_for(i64::MAX),
            Err(DbError::InvalidTimestamp(_))
        ));
    }
}
