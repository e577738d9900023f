// crates/db/src/recompute.rs
//! Rebuild of the global weekly and daily stat tables.
//!
//! Global rows are derived data: the sum of every synced repository's
//! buckets. A run reads the per-repository buckets, merges them with
//! [`provenance_stats_rollup::rollup`], then replaces both global tables.
//! The read, delete and reinsert happen in one transaction, so readers see
//! either the previous global view or the new one and a failed run leaves
//! the previous view in place.

use std::sync::LazyLock;
use std::time::Instant;

use provenance_stats_rollup::{rollup, GlobalRollup, RollupSummary};
use provenance_types::{Classification, StatTotals};
use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::info;

use crate::buckets::{RepoDailyRow, RepoWeeklyRow, COUNT_COLUMNS};
use crate::{now_ms, Database, DbResult};

/// Result of one recompute run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeReport {
    pub synced_repos: i64,
    pub summary: RollupSummary,
    pub computed_at: i64,
    pub duration_ms: u64,
}

fn insert_sql(table: &str, key_column: &str) -> String {
    // key + counts + additions/deletions + repo_count + computed_at
    let placeholders = vec!["?"; Classification::ALL.len() + 5].join(", ");
    format!(
        "INSERT INTO {table} ({key_column}, {cols}, additions, deletions, repo_count, computed_at) \
         VALUES ({placeholders})",
        cols = COUNT_COLUMNS.as_str(),
    )
}

static INSERT_WEEKLY: LazyLock<String> =
    LazyLock::new(|| insert_sql("global_weekly_stats", "week_start"));
static INSERT_DAILY: LazyLock<String> =
    LazyLock::new(|| insert_sql("global_daily_stats", "day_start"));

async fn insert_global_row(
    conn: &mut SqliteConnection,
    sql: &str,
    key: i64,
    totals: &StatTotals,
    repo_count: i64,
    computed_at: i64,
) -> DbResult<()> {
    let mut query = sqlx::query(sql).bind(key);
    for c in Classification::ALL {
        query = query.bind(totals.counts.get(c));
    }
    query
        .bind(totals.additions)
        .bind(totals.deletions)
        .bind(repo_count)
        .bind(computed_at)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Read every synced repository's buckets and merge them.
async fn load_synced_rollup(conn: &mut SqliteConnection) -> DbResult<(i64, GlobalRollup)> {
    let (synced_repos,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM repos WHERE sync_status = 'synced'")
            .fetch_one(&mut *conn)
            .await?;

    let weekly: Vec<RepoWeeklyRow> = sqlx::query_as(&format!(
        r#"
        SELECT s.repo_id, s.week_start, {cols}, s.additions, s.deletions
        FROM repo_weekly_stats s
        JOIN repos r ON r.id = s.repo_id
        WHERE r.sync_status = 'synced'
        "#,
        cols = COUNT_COLUMNS.as_str(),
    ))
    .fetch_all(&mut *conn)
    .await?;

    let daily: Vec<RepoDailyRow> = sqlx::query_as(&format!(
        r#"
        SELECT s.repo_id, s.day_start, {cols}, s.additions, s.deletions
        FROM repo_daily_stats s
        JOIN repos r ON r.id = s.repo_id
        WHERE r.sync_status = 'synced'
        "#,
        cols = COUNT_COLUMNS.as_str(),
    ))
    .fetch_all(&mut *conn)
    .await?;

    let acc = rollup(
        weekly.iter().map(|row| &row.0),
        daily.iter().map(|row| &row.0),
    );
    Ok((synced_repos, acc))
}

impl Database {
    /// Rebuild `global_weekly_stats` and `global_daily_stats` from the
    /// buckets of repositories whose sync status is `synced`.
    ///
    /// Idempotent: with unchanged inputs, repeated runs produce identical
    /// rows apart from `computed_at`.
    pub async fn recompute_global_stats(&self) -> DbResult<RecomputeReport> {
        let start = Instant::now();
        let computed_at = now_ms();

        let mut tx = self.pool().begin().await?;
        let (synced_repos, acc) = load_synced_rollup(&mut tx).await?;

        sqlx::query("DELETE FROM global_weekly_stats")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM global_daily_stats")
            .execute(&mut *tx)
            .await?;

        for row in acc.weekly_stats() {
            insert_global_row(
                &mut tx,
                &INSERT_WEEKLY,
                row.week_start,
                &row.totals,
                row.repo_count,
                computed_at,
            )
            .await?;
        }
        for row in acc.daily_stats() {
            insert_global_row(
                &mut tx,
                &INSERT_DAILY,
                row.day_start,
                &row.totals,
                row.repo_count,
                computed_at,
            )
            .await?;
        }
        tx.commit().await?;

        let summary = acc.summary();
        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            synced_repos,
            weekly_buckets = summary.weekly_buckets,
            daily_buckets = summary.daily_buckets,
            contributing_repos = summary.repos,
            commits = summary.commits,
            duration_ms,
            "Recomputed global stats"
        );

        Ok(RecomputeReport {
            synced_repos,
            summary,
            computed_at,
            duration_ms,
        })
    }
}
