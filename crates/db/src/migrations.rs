/// Inline SQL migrations for the provenance store.
///
/// Applied in order, once each, tracked by version in `_migrations`.
/// Bucket tables predate the `codex` and `gemini` classifications; those
/// columns were added later as nullable and every reader treats NULL as 0.

pub const MIGRATIONS: &[&str] = &[
    // Migration 1: repositories
    r#"
CREATE TABLE IF NOT EXISTS repos (
    id             TEXT PRIMARY KEY,
    full_name      TEXT NOT NULL,
    sync_status    TEXT NOT NULL DEFAULT 'pending',
    last_synced_at INTEGER,
    created_at     INTEGER NOT NULL
);
"#,
    r#"CREATE UNIQUE INDEX IF NOT EXISTS idx_repos_full_name ON repos(full_name);"#,
    r#"CREATE INDEX IF NOT EXISTS idx_repos_sync_status ON repos(sync_status);"#,
    // Migration 2: classified commit ledger
    r#"
CREATE TABLE IF NOT EXISTS commits (
    repo_id        TEXT NOT NULL REFERENCES repos(id),
    sha            TEXT NOT NULL,
    committed_at   INTEGER NOT NULL,
    classification TEXT NOT NULL,
    author_login   TEXT,
    pr_number      INTEGER,
    additions      INTEGER NOT NULL DEFAULT 0,
    deletions      INTEGER NOT NULL DEFAULT 0,
    recorded_at    INTEGER NOT NULL,
    PRIMARY KEY (repo_id, sha)
);
"#,
    r#"CREATE INDEX IF NOT EXISTS idx_commits_repo_pr ON commits(repo_id, pr_number);"#,
    r#"CREATE INDEX IF NOT EXISTS idx_commits_classification ON commits(classification);"#,
    // Migration 3: per-repository buckets
    r#"
CREATE TABLE IF NOT EXISTS repo_weekly_stats (
    repo_id        TEXT NOT NULL REFERENCES repos(id),
    week_start     INTEGER NOT NULL,
    human          INTEGER NOT NULL DEFAULT 0,
    copilot        INTEGER NOT NULL DEFAULT 0,
    claude         INTEGER NOT NULL DEFAULT 0,
    cursor         INTEGER NOT NULL DEFAULT 0,
    devin          INTEGER NOT NULL DEFAULT 0,
    dependabot     INTEGER NOT NULL DEFAULT 0,
    renovate       INTEGER NOT NULL DEFAULT 0,
    github_actions INTEGER NOT NULL DEFAULT 0,
    ai_assisted    INTEGER NOT NULL DEFAULT 0,
    other_bot      INTEGER NOT NULL DEFAULT 0,
    additions      INTEGER NOT NULL DEFAULT 0,
    deletions      INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (repo_id, week_start)
);
"#,
    r#"
CREATE TABLE IF NOT EXISTS repo_daily_stats (
    repo_id        TEXT NOT NULL REFERENCES repos(id),
    day_start      INTEGER NOT NULL,
    human          INTEGER NOT NULL DEFAULT 0,
    copilot        INTEGER NOT NULL DEFAULT 0,
    claude         INTEGER NOT NULL DEFAULT 0,
    cursor         INTEGER NOT NULL DEFAULT 0,
    devin          INTEGER NOT NULL DEFAULT 0,
    dependabot     INTEGER NOT NULL DEFAULT 0,
    renovate       INTEGER NOT NULL DEFAULT 0,
    github_actions INTEGER NOT NULL DEFAULT 0,
    ai_assisted    INTEGER NOT NULL DEFAULT 0,
    other_bot      INTEGER NOT NULL DEFAULT 0,
    additions      INTEGER NOT NULL DEFAULT 0,
    deletions      INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (repo_id, day_start)
);
"#,
    // Migration 4: global buckets (derived; rebuilt by recompute)
    r#"
CREATE TABLE IF NOT EXISTS global_weekly_stats (
    week_start     INTEGER PRIMARY KEY,
    human          INTEGER NOT NULL DEFAULT 0,
    copilot        INTEGER NOT NULL DEFAULT 0,
    claude         INTEGER NOT NULL DEFAULT 0,
    cursor         INTEGER NOT NULL DEFAULT 0,
    devin          INTEGER NOT NULL DEFAULT 0,
    dependabot     INTEGER NOT NULL DEFAULT 0,
    renovate       INTEGER NOT NULL DEFAULT 0,
    github_actions INTEGER NOT NULL DEFAULT 0,
    ai_assisted    INTEGER NOT NULL DEFAULT 0,
    other_bot      INTEGER NOT NULL DEFAULT 0,
    additions      INTEGER NOT NULL DEFAULT 0,
    deletions      INTEGER NOT NULL DEFAULT 0,
    repo_count     INTEGER NOT NULL DEFAULT 0,
    computed_at    INTEGER NOT NULL
);
"#,
    r#"
CREATE TABLE IF NOT EXISTS global_daily_stats (
    day_start      INTEGER PRIMARY KEY,
    human          INTEGER NOT NULL DEFAULT 0,
    copilot        INTEGER NOT NULL DEFAULT 0,
    claude         INTEGER NOT NULL DEFAULT 0,
    cursor         INTEGER NOT NULL DEFAULT 0,
    devin          INTEGER NOT NULL DEFAULT 0,
    dependabot     INTEGER NOT NULL DEFAULT 0,
    renovate       INTEGER NOT NULL DEFAULT 0,
    github_actions INTEGER NOT NULL DEFAULT 0,
    ai_assisted    INTEGER NOT NULL DEFAULT 0,
    other_bot      INTEGER NOT NULL DEFAULT 0,
    additions      INTEGER NOT NULL DEFAULT 0,
    deletions      INTEGER NOT NULL DEFAULT 0,
    repo_count     INTEGER NOT NULL DEFAULT 0,
    computed_at    INTEGER NOT NULL
);
"#,
    // Migration 5: codex + gemini classifications (nullable on existing rows)
    r#"ALTER TABLE repo_weekly_stats ADD COLUMN codex INTEGER;"#,
    r#"ALTER TABLE repo_weekly_stats ADD COLUMN gemini INTEGER;"#,
    r#"ALTER TABLE repo_daily_stats ADD COLUMN codex INTEGER;"#,
    r#"ALTER TABLE repo_daily_stats ADD COLUMN gemini INTEGER;"#,
    r#"ALTER TABLE global_weekly_stats ADD COLUMN codex INTEGER;"#,
    r#"ALTER TABLE global_weekly_stats ADD COLUMN gemini INTEGER;"#,
    r#"ALTER TABLE global_daily_stats ADD COLUMN codex INTEGER;"#,
    r#"ALTER TABLE global_daily_stats ADD COLUMN gemini INTEGER;"#,
];
