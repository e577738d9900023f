// crates/db/src/queries.rs
// Read side: bucket listings, attribution summaries, rank and diagnostics.

use provenance_core::{aggregate, human_percentage, Rank};
use provenance_types::{
    AttributionSignal, AttributionSummary, ClassificationCounts, CountedSignal, GlobalDailyStat,
    GlobalWeeklyStat, RepoDailyStat, RepoWeeklyStat, UnspecifiedUsage,
};
use serde::Serialize;
use ts_rs::TS;

use crate::buckets::{GlobalDailyRow, GlobalWeeklyRow, RepoDailyRow, RepoWeeklyRow, COUNT_COLUMNS};
use crate::{Database, DbResult};

/// Human share of a set of commits and the rank it earns.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct HumanShare {
    #[ts(type = "number")]
    pub human_commits: i64,
    #[ts(type = "number")]
    pub total_commits: i64,
    pub human_percentage: f64,
    pub rank: Rank,
}

impl HumanShare {
    /// `None` when there are no commits to rank.
    pub fn from_counts(counts: &ClassificationCounts) -> Option<Self> {
        let total = counts.total();
        let pct = human_percentage(counts.human, total)?;
        Some(Self {
            human_commits: counts.human,
            total_commits: total,
            human_percentage: pct,
            rank: Rank::from_human_percentage(pct),
        })
    }
}

impl Database {
    /// Global weekly buckets, oldest first.
    pub async fn global_weekly_stats(&self) -> DbResult<Vec<GlobalWeeklyStat>> {
        let rows: Vec<GlobalWeeklyRow> = sqlx::query_as(&format!(
            "SELECT week_start, {cols}, additions, deletions, repo_count \
             FROM global_weekly_stats ORDER BY week_start",
            cols = COUNT_COLUMNS.as_str(),
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Global daily buckets, oldest first.
    pub async fn global_daily_stats(&self) -> DbResult<Vec<GlobalDailyStat>> {
        let rows: Vec<GlobalDailyRow> = sqlx::query_as(&format!(
            "SELECT day_start, {cols}, additions, deletions, repo_count \
             FROM global_daily_stats ORDER BY day_start",
            cols = COUNT_COLUMNS.as_str(),
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// One repository's weekly buckets, oldest first.
    pub async fn repo_weekly_stats(&self, repo_id: &str) -> DbResult<Vec<RepoWeeklyStat>> {
        let rows: Vec<RepoWeeklyRow> = sqlx::query_as(&format!(
            "SELECT repo_id, week_start, {cols}, additions, deletions \
             FROM repo_weekly_stats WHERE repo_id = ?1 ORDER BY week_start",
            cols = COUNT_COLUMNS.as_str(),
        ))
        .bind(repo_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// One repository's daily buckets, oldest first.
    pub async fn repo_daily_stats(&self, repo_id: &str) -> DbResult<Vec<RepoDailyStat>> {
        let rows: Vec<RepoDailyRow> = sqlx::query_as(&format!(
            "SELECT repo_id, day_start, {cols}, additions, deletions \
             FROM repo_daily_stats WHERE repo_id = ?1 ORDER BY day_start",
            cols = COUNT_COLUMNS.as_str(),
        ))
        .bind(repo_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Attribution summary over a repository's recorded commits.
    ///
    /// Commits are grouped by classification and author login, so a
    /// catch-all commit is resolved from its author the same way a raw
    /// signal would be.
    pub async fn repo_attribution_summary(
        &self,
        repo_id: &str,
        computed_at: Option<i64>,
    ) -> DbResult<AttributionSummary> {
        let rows: Vec<(String, Option<String>, i64)> = sqlx::query_as(
            r#"
            SELECT classification, author_login, COUNT(*)
            FROM commits
            WHERE repo_id = ?1
            GROUP BY classification, author_login
            "#,
        )
        .bind(repo_id)
        .fetch_all(self.pool())
        .await?;

        let signals: Vec<CountedSignal> = rows
            .into_iter()
            .map(|(classification, login, count)| {
                let mut signal = AttributionSignal::new(classification);
                signal.login = login;
                CountedSignal::new(signal, count as f64)
            })
            .collect();
        Ok(aggregate(&signals, computed_at))
    }

    /// Human share and rank of one repository, from its weekly buckets.
    pub async fn repo_human_share(&self, repo_id: &str) -> DbResult<Option<HumanShare>> {
        let mut counts = ClassificationCounts::default();
        for row in self.repo_weekly_stats(repo_id).await? {
            counts.merge(&row.totals.counts);
        }
        Ok(HumanShare::from_counts(&counts))
    }

    /// Human share and rank across the global weekly table.
    pub async fn global_human_share(&self) -> DbResult<Option<HumanShare>> {
        let mut counts = ClassificationCounts::default();
        for row in self.global_weekly_stats().await? {
            counts.merge(&row.totals.counts);
        }
        Ok(HumanShare::from_counts(&counts))
    }

    /// Repositories with commits in the `ai-assisted` / `other-bot`
    /// catch-alls, largest first.
    ///
    /// These are commits where a tool or bot was detected but not
    /// identified; a growing list means the pattern tables need new entries.
    pub async fn unspecified_inventory(&self) -> DbResult<Vec<UnspecifiedUsage>> {
        let rows: Vec<(String, String, i64, i64)> = sqlx::query_as(
            r#"
            SELECT
                r.id,
                r.full_name,
                COALESCE(SUM(CASE WHEN c.classification = 'ai-assisted' THEN 1 ELSE 0 END), 0) AS ai,
                COALESCE(SUM(CASE WHEN c.classification = 'other-bot' THEN 1 ELSE 0 END), 0) AS bot
            FROM commits c
            JOIN repos r ON r.id = c.repo_id
            WHERE c.classification IN ('ai-assisted', 'other-bot')
            GROUP BY r.id, r.full_name
            ORDER BY COUNT(*) DESC, r.full_name ASC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(repo_id, full_name, ai_assisted, other_bot)| UnspecifiedUsage {
                repo_id,
                full_name,
                ai_assisted,
                other_bot,
            })
            .collect())
    }
}
