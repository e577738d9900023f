// crates/types/src/attribution.rs
//! Attribution signals in, attribution summaries out.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Classification, Lane};

/// One commit's (or one PR's) worth of attribution context.
///
/// `classification` stays a raw string: upstream data is noisy and
/// unrecognized values must be representable so they can be filtered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct AttributionSignal {
    pub classification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl AttributionSignal {
    pub fn new(classification: impl Into<String>) -> Self {
        Self {
            classification: classification.into(),
            ..Default::default()
        }
    }

    pub fn from_classification(classification: Classification) -> Self {
        Self::new(classification.as_str())
    }

    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Parsed classification, `None` when the string is not a known value.
    pub fn parsed_classification(&self) -> Option<Classification> {
        Classification::parse(&self.classification)
    }
}

/// A signal paired with the number of commits it stands for.
///
/// `commit_count` is a JSON number on the wire; only whole positive values
/// are counted by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct CountedSignal {
    #[serde(flatten)]
    pub signal: AttributionSignal,
    pub commit_count: f64,
}

impl CountedSignal {
    pub fn new(signal: AttributionSignal, commit_count: f64) -> Self {
        Self {
            signal,
            commit_count,
        }
    }
}

/// Resolved identity of a tool or bot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct AttributionMatch {
    /// Stable machine identifier, e.g. `github-copilot`.
    pub key: String,
    /// Human-readable name.
    pub label: String,
    pub lane: Lane,
}

impl AttributionMatch {
    pub fn new(key: impl Into<String>, label: impl Into<String>, lane: Lane) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            lane,
        }
    }
}

/// One row of the attribution breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub key: String,
    pub label: String,
    pub lane: Lane,
    #[ts(type = "number")]
    pub commits: i64,
}

/// Aggregate attribution over a batch of signals.
///
/// `total_commits == ai_commits + automation_commits` and the breakdown
/// commits sum to `total_commits`. Human commits count towards neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct AttributionSummary {
    #[ts(type = "number")]
    pub total_commits: i64,
    #[ts(type = "number")]
    pub ai_commits: i64,
    #[ts(type = "number")]
    pub automation_commits: i64,
    /// Sorted by commits descending, then label ascending.
    pub breakdown: Vec<BreakdownEntry>,
    /// Epoch milliseconds.
    #[ts(type = "number")]
    pub computed_at: i64,
}

impl AttributionSummary {
    pub fn empty(computed_at: i64) -> Self {
        Self {
            total_commits: 0,
            ai_commits: 0,
            automation_commits: 0,
            breakdown: Vec::new(),
            computed_at,
        }
    }

    /// Breakdown rows for a single lane, preserving sort order.
    pub fn lane_entries(&self, lane: Lane) -> impl Iterator<Item = &BreakdownEntry> {
        self.breakdown.iter().filter(move |e| e.lane == lane)
    }
}
