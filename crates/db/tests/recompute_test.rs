//! Integration tests for the global stats recompute.

use pretty_assertions::assert_eq;
use provenance_db::Database;
use provenance_types::{Classification, CommitRecord, RepoSyncStatus};

// Monday 2024-12-30 00:00 UTC and the Monday after.
const W1: i64 = 1_735_516_800_000;
const W2: i64 = W1 + 7 * 86_400_000;
const HOUR: i64 = 3_600_000;

async fn repo(db: &Database, id: &str, status: RepoSyncStatus, commits: &[CommitRecord]) {
    db.upsert_repo(id, &format!("acme/{id}")).await.unwrap();
    db.record_commits(id, commits).await.unwrap();
    db.set_repo_sync_status(id, status).await.unwrap();
}

#[tokio::test]
async fn test_recompute_sums_synced_repos() {
    let db = Database::new_in_memory().await.unwrap();
    repo(
        &db,
        "a",
        RepoSyncStatus::Synced,
        &[
            CommitRecord::new("a1", W1 + HOUR, Classification::Human).with_churn(10, 1),
            CommitRecord::new("a2", W1 + 2 * HOUR, Classification::Copilot).with_churn(5, 0),
            CommitRecord::new("a3", W2 + HOUR, Classification::Human),
        ],
    )
    .await;
    repo(
        &db,
        "b",
        RepoSyncStatus::Synced,
        &[CommitRecord::new("b1", W1 + 3 * HOUR, Classification::Dependabot).with_churn(2, 2)],
    )
    .await;

    let report = db.recompute_global_stats().await.unwrap();
    assert_eq!(report.synced_repos, 2);
    assert_eq!(report.summary.weekly_buckets, 2);
    assert_eq!(report.summary.commits, 4);

    let weekly = db.global_weekly_stats().await.unwrap();
    assert_eq!(weekly.len(), 2);
    assert_eq!(weekly[0].week_start, W1);
    assert_eq!(weekly[0].totals.counts.human, 1);
    assert_eq!(weekly[0].totals.counts.copilot, 1);
    assert_eq!(weekly[0].totals.counts.dependabot, 1);
    assert_eq!(weekly[0].totals.additions, 17);
    assert_eq!(weekly[0].totals.deletions, 3);
    assert_eq!(weekly[0].repo_count, 2);
    assert_eq!(weekly[1].week_start, W2);
    assert_eq!(weekly[1].repo_count, 1);

    // All four commits land on two calendar days.
    let daily = db.global_daily_stats().await.unwrap();
    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0].day_start, W1);
    assert_eq!(daily[0].totals.commits(), 3);
    assert_eq!(daily[0].repo_count, 2);
}

#[tokio::test]
async fn test_recompute_ignores_repos_not_synced() {
    let db = Database::new_in_memory().await.unwrap();
    repo(
        &db,
        "synced",
        RepoSyncStatus::Synced,
        &[CommitRecord::new("s1", W1, Classification::Human)],
    )
    .await;
    for (id, status) in [
        ("pending", RepoSyncStatus::Pending),
        ("syncing", RepoSyncStatus::Syncing),
        ("failed", RepoSyncStatus::Error),
    ] {
        repo(
            &db,
            id,
            status,
            &[CommitRecord::new(format!("{id}1"), W1, Classification::Claude)],
        )
        .await;
    }

    let report = db.recompute_global_stats().await.unwrap();
    assert_eq!(report.synced_repos, 1);

    let weekly = db.global_weekly_stats().await.unwrap();
    assert_eq!(weekly.len(), 1);
    assert_eq!(weekly[0].totals.counts.human, 1);
    assert_eq!(weekly[0].totals.counts.claude, 0);
    assert_eq!(weekly[0].repo_count, 1);
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let db = Database::new_in_memory().await.unwrap();
    repo(
        &db,
        "a",
        RepoSyncStatus::Synced,
        &[
            CommitRecord::new("a1", W1, Classification::Human),
            CommitRecord::new("a2", W2, Classification::GithubActions),
        ],
    )
    .await;
    repo(
        &db,
        "b",
        RepoSyncStatus::Synced,
        &[CommitRecord::new("b1", W2, Classification::AiAssisted)],
    )
    .await;

    db.recompute_global_stats().await.unwrap();
    let first_weekly = db.global_weekly_stats().await.unwrap();
    let first_daily = db.global_daily_stats().await.unwrap();

    db.recompute_global_stats().await.unwrap();
    assert_eq!(db.global_weekly_stats().await.unwrap(), first_weekly);
    assert_eq!(db.global_daily_stats().await.unwrap(), first_daily);
}

#[tokio::test]
async fn test_recompute_drops_stale_global_rows() {
    let db = Database::new_in_memory().await.unwrap();
    repo(
        &db,
        "a",
        RepoSyncStatus::Synced,
        &[CommitRecord::new("a1", W1, Classification::Human)],
    )
    .await;
    db.recompute_global_stats().await.unwrap();
    assert_eq!(db.global_weekly_stats().await.unwrap().len(), 1);

    // The only contributor falls out of sync: its week disappears globally.
    db.set_repo_sync_status("a", RepoSyncStatus::Error)
        .await
        .unwrap();
    let report = db.recompute_global_stats().await.unwrap();
    assert_eq!(report.synced_repos, 0);
    assert!(db.global_weekly_stats().await.unwrap().is_empty());
    assert!(db.global_daily_stats().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_recompute_reads_null_columns_as_zero() {
    let db = Database::new_in_memory().await.unwrap();
    repo(
        &db,
        "a",
        RepoSyncStatus::Synced,
        &[CommitRecord::new("a1", W1, Classification::Human)],
    )
    .await;
    // Rows written before codex/gemini existed carry NULL there.
    sqlx::query("UPDATE repo_weekly_stats SET codex = NULL, gemini = NULL")
        .execute(db.pool())
        .await
        .unwrap();

    db.recompute_global_stats().await.unwrap();
    let weekly = db.global_weekly_stats().await.unwrap();
    assert_eq!(weekly[0].totals.counts.codex, 0);
    assert_eq!(weekly[0].totals.counts.gemini, 0);
    assert_eq!(weekly[0].totals.counts.human, 1);

    let stored: (Option<i64>,) = sqlx::query_as("SELECT codex FROM global_weekly_stats")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(stored.0, Some(0));
}

#[tokio::test]
async fn test_recompute_reflects_reclassification() {
    let db = Database::new_in_memory().await.unwrap();
    repo(
        &db,
        "a",
        RepoSyncStatus::Synced,
        &[CommitRecord::new("a1", W1, Classification::Human)],
    )
    .await;
    db.recompute_global_stats().await.unwrap();

    db.reclassify_commit("a", "a1", Classification::Devin)
        .await
        .unwrap();
    db.recompute_global_stats().await.unwrap();

    let weekly = db.global_weekly_stats().await.unwrap();
    assert_eq!(weekly[0].totals.counts.human, 0);
    assert_eq!(weekly[0].totals.counts.devin, 1);

    let share = db.global_human_share().await.unwrap().unwrap();
    assert_eq!(share.human_percentage, 0.0);
}

#[tokio::test]
async fn test_recompute_on_empty_store() {
    let db = Database::new_in_memory().await.unwrap();
    let report = db.recompute_global_stats().await.unwrap();
    assert_eq!(report.synced_repos, 0);
    assert_eq!(report.summary.weekly_buckets, 0);
    assert!(db.global_weekly_stats().await.unwrap().is_empty());
    assert_eq!(db.global_human_share().await.unwrap(), None);
}

#[tokio::test]
async fn test_recompute_file_backed_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("provenance.db");
    {
        let db = Database::new(&path).await.unwrap();
        repo(
            &db,
            "a",
            RepoSyncStatus::Synced,
            &[CommitRecord::new("a1", W1, Classification::Cursor)],
        )
        .await;
        db.recompute_global_stats().await.unwrap();
        db.pool().close().await;
    }

    let db = Database::new(&path).await.unwrap();
    let weekly = db.global_weekly_stats().await.unwrap();
    assert_eq!(weekly.len(), 1);
    assert_eq!(weekly[0].totals.counts.cursor, 1);
}
