// crates/db/src/reclassify.rs
// Upgrade-only reclassification of recorded commits.

use provenance_core::{pr_target, reclassify, NoOpReason, Transition};
use provenance_types::{AttributionSignal, Classification};
use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::{debug, info};

use crate::buckets::{self, RepoBucket};
use crate::{Database, DbResult};

/// What happened to one commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclassifyOutcome {
    Upgraded {
        from: Classification,
        to: Classification,
    },
    Skipped(NoOpReason),
    NotFound,
}

/// Tally for a pull request's commits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrReclassification {
    /// Classification the PR evidence resolved to; `None` means no bot/AI evidence.
    pub target: Option<Classification>,
    pub upgraded: usize,
    pub skipped: usize,
    pub missing: usize,
}

async fn reclassify_in_tx(
    conn: &mut SqliteConnection,
    repo_id: &str,
    sha: &str,
    proposed: Classification,
) -> DbResult<ReclassifyOutcome> {
    let row: Option<(String, i64)> = sqlx::query_as(
        "SELECT classification, committed_at FROM commits WHERE repo_id = ?1 AND sha = ?2",
    )
    .bind(repo_id)
    .bind(sha)
    .fetch_optional(&mut *conn)
    .await?;
    let Some((current, committed_at)) = row else {
        return Ok(ReclassifyOutcome::NotFound);
    };
    let current: Classification = current.parse()?;

    let to = match reclassify(current, proposed) {
        Transition::Upgrade { to } => to,
        Transition::NoOp(reason) => return Ok(ReclassifyOutcome::Skipped(reason)),
    };

    // Guarded in SQL too: only a row still marked human may change.
    let result = sqlx::query(
        r#"
        UPDATE commits SET classification = ?3
        WHERE repo_id = ?1 AND sha = ?2 AND classification = 'human'
        "#,
    )
    .bind(repo_id)
    .bind(sha)
    .bind(to.as_str())
    .execute(&mut *conn)
    .await?;
    if result.rows_affected() == 0 {
        return Ok(ReclassifyOutcome::Skipped(NoOpReason::AlreadyAttributed));
    }

    for bucket in RepoBucket::BOTH {
        let key = bucket.key_for(committed_at)?;
        buckets::move_commit(conn, bucket, repo_id, key, current, to).await?;
    }
    Ok(ReclassifyOutcome::Upgraded { from: current, to })
}

impl Database {
    /// Reclassify one commit, subject to the upgrade-only rule.
    ///
    /// On upgrade the commit row and its weekly and daily buckets change
    /// together; anything else writes nothing.
    pub async fn reclassify_commit(
        &self,
        repo_id: &str,
        sha: &str,
        proposed: Classification,
    ) -> DbResult<ReclassifyOutcome> {
        let mut tx = self.pool().begin().await?;
        let outcome = reclassify_in_tx(&mut tx, repo_id, sha, proposed).await?;
        tx.commit().await?;

        debug!(repo_id, sha, ?outcome, "Reclassify commit");
        Ok(outcome)
    }

    /// Upgrade the human commits of a pull request from the PR's evidence.
    ///
    /// The PR signal is resolved through the classifier; a PR with no bot or
    /// AI evidence changes nothing.
    pub async fn reclassify_pull_request(
        &self,
        repo_id: &str,
        shas: &[&str],
        pr_signal: &AttributionSignal,
    ) -> DbResult<PrReclassification> {
        let Some(target) = pr_target(pr_signal) else {
            return Ok(PrReclassification {
                skipped: shas.len(),
                ..Default::default()
            });
        };

        let mut report = PrReclassification {
            target: Some(target),
            ..Default::default()
        };
        let mut tx = self.pool().begin().await?;
        for sha in shas {
            match reclassify_in_tx(&mut tx, repo_id, sha, target).await? {
                ReclassifyOutcome::Upgraded { .. } => report.upgraded += 1,
                ReclassifyOutcome::Skipped(_) => report.skipped += 1,
                ReclassifyOutcome::NotFound => report.missing += 1,
            }
        }
        tx.commit().await?;

        if report.upgraded > 0 {
            info!(
                repo_id,
                target = %target,
                upgraded = report.upgraded,
                skipped = report.skipped,
                missing = report.missing,
                "Reclassified pull request commits"
            );
        }
        Ok(report)
    }
}
