// crates/cli/src/render.rs
// Plain-text rendering for terminal output.

use std::fmt::Write;

use provenance_core::week_label;
use provenance_db::{HumanShare, RecomputeReport};
use provenance_types::{
    AttributionSummary, Classification, GlobalWeeklyStat, Lane, Repo, UnspecifiedUsage,
};

pub fn recompute(report: &RecomputeReport) -> String {
    format!(
        "Recomputed global stats from {} synced repos: {} weekly / {} daily buckets, {} commits ({} ms)\n",
        report.synced_repos,
        report.summary.weekly_buckets,
        report.summary.daily_buckets,
        report.summary.commits,
        report.duration_ms,
    )
}

fn share_line(share: Option<&HumanShare>) -> String {
    match share {
        Some(s) => format!(
            "{}% human ({} of {} commits), rank {}",
            s.human_percentage,
            s.human_commits,
            s.total_commits,
            s.rank.display_label()
        ),
        None => "no commits".to_string(),
    }
}

pub fn summary(repo: &Repo, summary: &AttributionSummary, share: Option<&HumanShare>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", repo.full_name, repo.sync_status);
    let _ = writeln!(out, "  {}", share_line(share));
    let _ = writeln!(
        out,
        "  attributed: {} commits (ai {}, automation {})",
        summary.total_commits, summary.ai_commits, summary.automation_commits
    );
    for lane in [Lane::Ai, Lane::Automation] {
        for entry in summary.lane_entries(lane) {
            let _ = writeln!(
                out,
                "    {:<10} {:<28} {:>8}",
                entry.lane.as_str(),
                entry.label,
                entry.commits
            );
        }
    }
    out
}

pub fn weeks(rows: &[GlobalWeeklyStat], share: Option<&HumanShare>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Global: {}", share_line(share));
    let _ = writeln!(
        out,
        "{:<10} {:>7} {:>7} {:>7} {:>10} {:>6}",
        "week", "human", "ai", "bots", "+/-", "repos"
    );
    for row in rows {
        let counts = &row.totals.counts;
        let label = week_label(row.week_start).unwrap_or_else(|| row.week_start.to_string());
        let _ = writeln!(
            out,
            "{:<10} {:>7} {:>7} {:>7} {:>10} {:>6}",
            label,
            counts.get(Classification::Human),
            counts.lane_total(Lane::Ai),
            counts.lane_total(Lane::Automation),
            format!("+{}/-{}", row.totals.additions, row.totals.deletions),
            row.repo_count,
        );
    }
    out
}

pub fn unspecified(rows: &[UnspecifiedUsage]) -> String {
    if rows.is_empty() {
        return "No commits in the unspecified buckets.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<40} {:>11} {:>9} {:>7}",
        "repository", "ai-assisted", "other-bot", "total"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<40} {:>11} {:>9} {:>7}",
            row.full_name,
            row.ai_assisted,
            row.other_bot,
            row.total()
        );
    }
    out
}
