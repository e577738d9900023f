// crates/types/src/stats.rs
//! Weekly and daily stat bucket records.
//!
//! Per-repository buckets are maintained incrementally while commits are
//! recorded; global buckets are derived from them by the recompute job.
//! Every count field defaults to zero so records written before a
//! classification existed still deserialize.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Classification, Lane};

/// Commit counts per classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase", default)]
pub struct ClassificationCounts {
    #[ts(type = "number")]
    pub human: i64,
    #[ts(type = "number")]
    pub copilot: i64,
    #[ts(type = "number")]
    pub claude: i64,
    #[ts(type = "number")]
    pub cursor: i64,
    #[ts(type = "number")]
    pub devin: i64,
    #[ts(type = "number")]
    pub codex: i64,
    #[ts(type = "number")]
    pub gemini: i64,
    #[ts(type = "number")]
    pub dependabot: i64,
    #[ts(type = "number")]
    pub renovate: i64,
    #[ts(type = "number")]
    pub github_actions: i64,
    #[ts(type = "number")]
    pub ai_assisted: i64,
    #[ts(type = "number")]
    pub other_bot: i64,
}

impl ClassificationCounts {
    pub fn get(&self, classification: Classification) -> i64 {
        match classification {
            Classification::Human => self.human,
            Classification::Copilot => self.copilot,
            Classification::Claude => self.claude,
            Classification::Cursor => self.cursor,
            Classification::Devin => self.devin,
            Classification::Codex => self.codex,
            Classification::Gemini => self.gemini,
            Classification::Dependabot => self.dependabot,
            Classification::Renovate => self.renovate,
            Classification::GithubActions => self.github_actions,
            Classification::AiAssisted => self.ai_assisted,
            Classification::OtherBot => self.other_bot,
        }
    }

    pub fn get_mut(&mut self, classification: Classification) -> &mut i64 {
        match classification {
            Classification::Human => &mut self.human,
            Classification::Copilot => &mut self.copilot,
            Classification::Claude => &mut self.claude,
            Classification::Cursor => &mut self.cursor,
            Classification::Devin => &mut self.devin,
            Classification::Codex => &mut self.codex,
            Classification::Gemini => &mut self.gemini,
            Classification::Dependabot => &mut self.dependabot,
            Classification::Renovate => &mut self.renovate,
            Classification::GithubActions => &mut self.github_actions,
            Classification::AiAssisted => &mut self.ai_assisted,
            Classification::OtherBot => &mut self.other_bot,
        }
    }

    pub fn add(&mut self, classification: Classification, n: i64) {
        *self.get_mut(classification) += n;
    }

    /// Field-by-field sum.
    pub fn merge(&mut self, other: &Self) {
        for c in Classification::ALL {
            self.add(c, other.get(c));
        }
    }

    pub fn total(&self) -> i64 {
        Classification::ALL.iter().map(|c| self.get(*c)).sum()
    }

    pub fn lane_total(&self, lane: Lane) -> i64 {
        Classification::ALL
            .iter()
            .filter(|c| c.lane() == Some(lane))
            .map(|c| self.get(*c))
            .sum()
    }
}

/// Counts plus line churn; the payload shared by every bucket kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase", default)]
pub struct StatTotals {
    #[serde(flatten)]
    pub counts: ClassificationCounts,
    #[ts(type = "number")]
    pub additions: i64,
    #[ts(type = "number")]
    pub deletions: i64,
}

impl StatTotals {
    pub fn merge(&mut self, other: &Self) {
        self.counts.merge(&other.counts);
        self.additions += other.additions;
        self.deletions += other.deletions;
    }

    pub fn commits(&self) -> i64 {
        self.counts.total()
    }
}

/// Per-repository weekly bucket. `week_start` is a Monday 00:00 UTC, epoch ms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct RepoWeeklyStat {
    pub repo_id: String,
    #[ts(type = "number")]
    pub week_start: i64,
    #[serde(flatten)]
    pub totals: StatTotals,
}

/// Per-repository daily bucket. `day_start` is 00:00 UTC, epoch ms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct RepoDailyStat {
    pub repo_id: String,
    #[ts(type = "number")]
    pub day_start: i64,
    #[serde(flatten)]
    pub totals: StatTotals,
}

/// Global weekly bucket summed across synced repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct GlobalWeeklyStat {
    #[ts(type = "number")]
    pub week_start: i64,
    #[serde(flatten)]
    pub totals: StatTotals,
    #[ts(type = "number")]
    pub repo_count: i64,
}

/// Global daily bucket summed across synced repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct GlobalDailyStat {
    #[ts(type = "number")]
    pub day_start: i64,
    #[serde(flatten)]
    pub totals: StatTotals,
    #[ts(type = "number")]
    pub repo_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counts_add_and_get() {
        let mut counts = ClassificationCounts::default();
        counts.add(Classification::Claude, 3);
        counts.add(Classification::Human, 5);
        counts.add(Classification::OtherBot, 1);
        assert_eq!(counts.get(Classification::Claude), 3);
        assert_eq!(counts.total(), 9);
        assert_eq!(counts.lane_total(Lane::Ai), 3);
        assert_eq!(counts.lane_total(Lane::Automation), 1);
    }

    #[test]
    fn test_totals_merge_is_field_by_field() {
        let mut a = StatTotals {
            counts: ClassificationCounts {
                human: 2,
                copilot: 1,
                ..Default::default()
            },
            additions: 10,
            deletions: 4,
        };
        let b = StatTotals {
            counts: ClassificationCounts {
                human: 1,
                dependabot: 7,
                ..Default::default()
            },
            additions: 5,
            deletions: 1,
        };
        a.merge(&b);
        assert_eq!(a.counts.human, 3);
        assert_eq!(a.counts.copilot, 1);
        assert_eq!(a.counts.dependabot, 7);
        assert_eq!(a.additions, 15);
        assert_eq!(a.deletions, 5);
        assert_eq!(a.commits(), 11);
    }

    #[test]
    fn test_absent_fields_deserialize_as_zero() {
        // A record written before gemini/codex existed.
        let json = r#"{"repoId":"r1","weekStart":0,"human":4,"copilot":2,"additions":9}"#;
        let stat: RepoWeeklyStat = serde_json::from_str(json).unwrap();
        assert_eq!(stat.totals.counts.human, 4);
        assert_eq!(stat.totals.counts.gemini, 0);
        assert_eq!(stat.totals.counts.codex, 0);
        assert_eq!(stat.totals.deletions, 0);
    }

    #[test]
    fn test_global_stat_wire_shape() {
        let stat = GlobalWeeklyStat {
            week_start: 1_735_516_800_000,
            totals: StatTotals {
                counts: ClassificationCounts {
                    github_actions: 2,
                    ai_assisted: 1,
                    ..Default::default()
                },
                additions: 0,
                deletions: 0,
            },
            repo_count: 2,
        };
        let value = serde_json::to_value(&stat).unwrap();
        assert_eq!(value["weekStart"], 1_735_516_800_000i64);
        assert_eq!(value["githubActions"], 2);
        assert_eq!(value["aiAssisted"], 1);
        assert_eq!(value["repoCount"], 2);
        assert_eq!(value["otherBot"], 0);
    }
}
