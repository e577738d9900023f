// crates/stats-rollup/src/lib.rs
//! Global stat rollup.
//!
//! Per-repository weekly and daily buckets are summed into global buckets
//! keyed by their start timestamp. The merge is a field-by-field sum plus a
//! set union of contributing repository ids, which makes it commutative and
//! associative: any partition or ordering of the inputs produces the same
//! result. Output is ordered by bucket start so repeated runs over the same
//! data are identical.

use std::collections::{BTreeMap, BTreeSet};

use provenance_types::{
    GlobalDailyStat, GlobalWeeklyStat, RepoDailyStat, RepoWeeklyStat, StatTotals,
};
use serde::Serialize;

/// One global bucket under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    pub totals: StatTotals,
    pub repos: BTreeSet<String>,
}

impl Bucket {
    fn absorb(&mut self, repo_id: &str, totals: &StatTotals) {
        self.totals.merge(totals);
        if !self.repos.contains(repo_id) {
            self.repos.insert(repo_id.to_string());
        }
    }

    fn merge(&mut self, other: Bucket) {
        self.totals.merge(&other.totals);
        self.repos.extend(other.repos);
    }

    pub fn repo_count(&self) -> i64 {
        self.repos.len() as i64
    }
}

/// Sizes of a finished rollup, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupSummary {
    pub weekly_buckets: usize,
    pub daily_buckets: usize,
    pub repos: usize,
    pub commits: i64,
}

/// Global weekly and daily buckets keyed by start timestamp (epoch ms).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalRollup {
    weekly: BTreeMap<i64, Bucket>,
    daily: BTreeMap<i64, Bucket>,
}

impl GlobalRollup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_weekly(&mut self, stat: &RepoWeeklyStat) {
        self.weekly
            .entry(stat.week_start)
            .or_default()
            .absorb(&stat.repo_id, &stat.totals);
    }

    pub fn add_daily(&mut self, stat: &RepoDailyStat) {
        self.daily
            .entry(stat.day_start)
            .or_default()
            .absorb(&stat.repo_id, &stat.totals);
    }

    /// Fold another partial rollup into this one.
    pub fn merge(&mut self, other: GlobalRollup) {
        for (key, bucket) in other.weekly {
            self.weekly.entry(key).or_default().merge(bucket);
        }
        for (key, bucket) in other.daily {
            self.daily.entry(key).or_default().merge(bucket);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weekly.is_empty() && self.daily.is_empty()
    }

    pub fn weekly_bucket(&self, week_start: i64) -> Option<&Bucket> {
        self.weekly.get(&week_start)
    }

    pub fn daily_bucket(&self, day_start: i64) -> Option<&Bucket> {
        self.daily.get(&day_start)
    }

    /// Global weekly rows, ascending by week start.
    pub fn weekly_stats(&self) -> Vec<GlobalWeeklyStat> {
        self.weekly
            .iter()
            .map(|(&week_start, bucket)| GlobalWeeklyStat {
                week_start,
                totals: bucket.totals,
                repo_count: bucket.repo_count(),
            })
            .collect()
    }

    /// Global daily rows, ascending by day start.
    pub fn daily_stats(&self) -> Vec<GlobalDailyStat> {
        self.daily
            .iter()
            .map(|(&day_start, bucket)| GlobalDailyStat {
                day_start,
                totals: bucket.totals,
                repo_count: bucket.repo_count(),
            })
            .collect()
    }

    pub fn summary(&self) -> RollupSummary {
        let repos: BTreeSet<&str> = self
            .weekly
            .values()
            .chain(self.daily.values())
            .flat_map(|b| b.repos.iter().map(String::as_str))
            .collect();
        RollupSummary {
            weekly_buckets: self.weekly.len(),
            daily_buckets: self.daily.len(),
            repos: repos.len(),
            commits: self.weekly.values().map(|b| b.totals.commits()).sum(),
        }
    }
}

/// Roll per-repository buckets up into global buckets.
pub fn rollup<'a, W, D>(weekly: W, daily: D) -> GlobalRollup
where
    W: IntoIterator<Item = &'a RepoWeeklyStat>,
    D: IntoIterator<Item = &'a RepoDailyStat>,
{
    let mut acc = GlobalRollup::new();
    for stat in weekly {
        acc.add_weekly(stat);
    }
    for stat in daily {
        acc.add_daily(stat);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use provenance_types::{Classification, ClassificationCounts};

    const W1: i64 = 1_735_516_800_000; // Monday 2024-12-30
    const W2: i64 = W1 + 7 * 86_400_000;
    const NO_WEEKLY: &[RepoWeeklyStat] = &[];
    const NO_DAILY: &[RepoDailyStat] = &[];

    fn totals(human: i64, copilot: i64, additions: i64) -> StatTotals {
        StatTotals {
            counts: ClassificationCounts {
                human,
                copilot,
                ..Default::default()
            },
            additions,
            deletions: 0,
        }
    }

    fn weekly(repo: &str, week_start: i64, t: StatTotals) -> RepoWeeklyStat {
        RepoWeeklyStat {
            repo_id: repo.to_string(),
            week_start,
            totals: t,
        }
    }

    #[test]
    fn test_empty_rollup() {
        let r = rollup(NO_WEEKLY, NO_DAILY);
        assert!(r.is_empty());
        assert!(r.weekly_stats().is_empty());
        assert_eq!(r.summary(), RollupSummary::default());
    }

    #[test]
    fn test_first_occurrence_initializes_bucket() {
        let r = rollup(&[weekly("a", W1, totals(3, 1, 40))], NO_DAILY);
        let rows = r.weekly_stats();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].week_start, W1);
        assert_eq!(rows[0].totals, totals(3, 1, 40));
        assert_eq!(rows[0].repo_count, 1);
    }

    #[test]
    fn test_same_week_sums_across_repos() {
        let r = rollup(
            &[
                weekly("a", W1, totals(3, 1, 40)),
                weekly("b", W1, totals(2, 0, 10)),
                weekly("b", W2, totals(1, 1, 5)),
            ],
            NO_DAILY,
        );
        let rows = r.weekly_stats();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].totals, totals(5, 1, 50));
        assert_eq!(rows[0].repo_count, 2);
        assert_eq!(rows[1].week_start, W2);
        assert_eq!(rows[1].repo_count, 1);
    }

    #[test]
    fn test_repo_counted_once_per_bucket() {
        // Duplicate rows from the same repo still count one repository.
        let r = rollup(
            &[weekly("a", W1, totals(1, 0, 0)), weekly("a", W1, totals(1, 0, 0))],
            NO_DAILY,
        );
        assert_eq!(r.weekly_bucket(W1).map(Bucket::repo_count), Some(1));
        assert_eq!(r.weekly_bucket(W1).map(|b| b.totals.counts.human), Some(2));
    }

    #[test]
    fn test_daily_buckets_are_independent_of_weekly() {
        let daily = RepoDailyStat {
            repo_id: "a".into(),
            day_start: W1 + 86_400_000,
            totals: totals(0, 4, 0),
        };
        let r = rollup(NO_WEEKLY, &[daily]);
        assert!(r.weekly_stats().is_empty());
        let rows = r.daily_stats();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].totals.counts.get(Classification::Copilot), 4);
    }

    #[test]
    fn test_summary_counts_distinct_repos() {
        let r = rollup(
            &[weekly("a", W1, totals(1, 1, 0)), weekly("b", W2, totals(2, 0, 0))],
            &[RepoDailyStat {
                repo_id: "c".into(),
                day_start: W1,
                totals: totals(1, 0, 0),
            }],
        );
        let s = r.summary();
        assert_eq!(s.weekly_buckets, 2);
        assert_eq!(s.daily_buckets, 1);
        assert_eq!(s.repos, 3);
        assert_eq!(s.commits, 4);
    }

    fn arb_weekly() -> impl Strategy<Value = RepoWeeklyStat> {
        (
            prop::sample::select(vec!["a", "b", "c", "d"]),
            0i64..4,
            prop::array::uniform12(0i64..50),
            0i64..500,
            0i64..500,
        )
            .prop_map(|(repo, week, counts, additions, deletions)| {
                let mut c = ClassificationCounts::default();
                for (class, n) in Classification::ALL.into_iter().zip(counts) {
                    c.add(class, n);
                }
                RepoWeeklyStat {
                    repo_id: repo.to_string(),
                    week_start: W1 + week * 7 * 86_400_000,
                    totals: StatTotals {
                        counts: c,
                        additions,
                        deletions,
                    },
                }
            })
    }

    proptest! {
        #[test]
        fn prop_rollup_is_order_independent(
            (stats, shuffled) in prop::collection::vec(arb_weekly(), 0..30)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            let a = rollup(&stats, NO_DAILY);
            let b = rollup(&shuffled, NO_DAILY);
            prop_assert_eq!(a.weekly_stats(), b.weekly_stats());
        }

        #[test]
        fn prop_merge_of_partitions_equals_whole(
            stats in prop::collection::vec(arb_weekly(), 0..30),
            split in 0usize..30,
        ) {
            let split = split.min(stats.len());
            let (left, right) = stats.split_at(split);
            let mut merged = rollup(left, NO_DAILY);
            merged.merge(rollup(right, NO_DAILY));
            prop_assert_eq!(merged, rollup(&stats, NO_DAILY));
        }

        #[test]
        fn prop_rollup_conserves_commits(stats in prop::collection::vec(arb_weekly(), 0..30)) {
            let expected: i64 = stats.iter().map(|s| s.totals.commits()).sum();
            let rows = rollup(&stats, NO_DAILY).weekly_stats();
            let actual: i64 = rows.iter().map(|r| r.totals.commits()).sum();
            prop_assert_eq!(actual, expected);
            for row in &rows {
                prop_assert!(row.repo_count >= 1 && row.repo_count <= 4);
            }
        }

        #[test]
        fn prop_rollup_is_repeatable(stats in prop::collection::vec(arb_weekly(), 0..30)) {
            prop_assert_eq!(rollup(&stats, NO_DAILY).weekly_stats(), rollup(&stats, NO_DAILY).weekly_stats());
        }
    }
}
