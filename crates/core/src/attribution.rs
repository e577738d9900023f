// crates/core/src/attribution.rs
//! Signal classification and attribution aggregation.
//!
//! [`map_signal`] resolves one signal to a tool/bot identity (or `None` for
//! human and unrecognized classifications). [`aggregate`] folds a batch of
//! count-bearing signals into an [`AttributionSummary`].
//!
//! Both are pure and never fail: inputs come from third-party repository
//! metadata, so invalid entries are filtered instead of reported.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::Utc;
use provenance_types::{
    AttributionMatch, AttributionSignal, AttributionSummary, BreakdownEntry, Classification,
    CountedSignal, Lane,
};
use tracing::trace;

use crate::registry;

/// Join the free-text evidence of a signal into one search string.
///
/// Order is `login, branch, body, ...labels`; missing and empty parts are
/// skipped; parts are separated by newlines.
pub fn build_haystack(signal: &AttributionSignal) -> String {
    let labels = signal.labels.iter().flatten().map(String::as_str);
    [
        signal.login.as_deref(),
        signal.branch.as_deref(),
        signal.body.as_deref(),
    ]
    .into_iter()
    .flatten()
    .chain(labels)
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join("\n")
}

/// Resolve a signal to an attribution match.
///
/// - `human` and unknown classification strings: `None`
/// - definite classifications: the fixed-map entry, regardless of evidence
/// - `ai-assisted` / `other-bot`: first matching pattern of the lane, else
///   the lane's unspecified fallback
pub fn map_signal(signal: &AttributionSignal) -> Option<AttributionMatch> {
    let Some(classification) = signal.parsed_classification() else {
        trace!(classification = %signal.classification, "Unrecognized classification");
        return None;
    };
    map_classified(classification, signal)
}

/// Same as [`map_signal`] for an already parsed classification.
pub fn map_classified(
    classification: Classification,
    signal: &AttributionSignal,
) -> Option<AttributionMatch> {
    if classification.is_human() {
        return None;
    }
    if let Some(spec) = registry::fixed_spec(classification) {
        return Some(spec.to_match());
    }
    let lane = match classification {
        Classification::AiAssisted => Lane::Ai,
        Classification::OtherBot => Lane::Automation,
        // Every other variant is either human or in the fixed map.
        _ => return None,
    };
    let haystack = build_haystack(signal);
    let spec = registry::first_match(lane, &haystack).unwrap_or_else(|| registry::unspecified(lane));
    Some(spec.to_match())
}

/// Largest count accepted from a signal: the biggest integer an `f64`
/// holds exactly.
const MAX_COMMIT_COUNT: f64 = 9_007_199_254_740_991.0;

/// Commit count as an integer, `None` unless it is a positive whole number.
fn countable(commit_count: f64) -> Option<i64> {
    let whole = commit_count.is_finite()
        && commit_count >= 1.0
        && commit_count <= MAX_COMMIT_COUNT
        && commit_count.fract() == 0.0;
    whole.then_some(commit_count as i64)
}

/// Breakdown order: commits descending, then label, then key.
fn breakdown_order(a: &BreakdownEntry, b: &BreakdownEntry) -> Ordering {
    b.commits
        .cmp(&a.commits)
        .then_with(|| a.label.cmp(&b.label))
        .then_with(|| a.key.cmp(&b.key))
}

/// Fold count-bearing signals into an attribution summary.
///
/// Entries whose `commit_count` is not a positive whole number are dropped,
/// as are signals that resolve to no match. Sums are integral, so neither
/// the totals nor the breakdown order depend on input order. `computed_at`
/// (epoch ms) defaults to now and is carried through untouched.
pub fn aggregate(signals: &[CountedSignal], computed_at: Option<i64>) -> AttributionSummary {
    let computed_at = computed_at.unwrap_or_else(|| Utc::now().timestamp_millis());

    let mut ai_commits: i64 = 0;
    let mut automation_commits: i64 = 0;
    let mut by_key: HashMap<String, BreakdownEntry> = HashMap::new();

    for input in signals {
        let Some(count) = countable(input.commit_count) else {
            trace!(commit_count = input.commit_count, "Skipping non-countable signal");
            continue;
        };
        let Some(matched) = map_signal(&input.signal) else {
            continue;
        };

        match matched.lane {
            Lane::Ai => ai_commits = ai_commits.saturating_add(count),
            Lane::Automation => automation_commits = automation_commits.saturating_add(count),
        }

        by_key
            .entry(matched.key.clone())
            .and_modify(|entry| entry.commits = entry.commits.saturating_add(count))
            .or_insert_with(|| BreakdownEntry {
                key: matched.key,
                label: matched.label,
                lane: matched.lane,
                commits: count,
            });
    }

    let mut breakdown: Vec<BreakdownEntry> = by_key.into_values().collect();
    breakdown.sort_by(breakdown_order);

    AttributionSummary {
        total_commits: ai_commits.saturating_add(automation_commits),
        ai_commits,
        automation_commits,
        breakdown,
        computed_at,
    }
}
