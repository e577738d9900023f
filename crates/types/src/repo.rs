// crates/types/src/repo.rs
//! Repository and commit records as the store sees them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::{Classification, TypesError};

/// Where a repository is in its sync lifecycle.
///
/// Only `Synced` repositories contribute to global stats; the others may
/// hold partial bucket data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "lowercase")]
pub enum RepoSyncStatus {
    #[default]
    Pending,
    Syncing,
    Synced,
    Error,
}

impl RepoSyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Syncing => "syncing",
            Self::Synced => "synced",
            Self::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "syncing" => Some(Self::Syncing),
            "synced" => Some(Self::Synced),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for RepoSyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepoSyncStatus {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TypesError::UnknownSyncStatus(s.to_string()))
    }
}

/// A tracked repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct Repo {
    pub id: String,
    /// `owner/name`.
    pub full_name: String,
    pub sync_status: RepoSyncStatus,
    /// Epoch ms of the last successful sync.
    #[ts(type = "number | null")]
    pub last_synced_at: Option<i64>,
}

impl Repo {
    pub fn new(id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            sync_status: RepoSyncStatus::Pending,
            last_synced_at: None,
        }
    }

    pub fn is_synced(&self) -> bool {
        self.sync_status == RepoSyncStatus::Synced
    }
}

/// One classified commit, as handed to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub sha: String,
    /// Author timestamp, epoch ms.
    #[ts(type = "number")]
    pub committed_at: i64,
    pub classification: Classification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub pr_number: Option<i64>,
    #[serde(default)]
    #[ts(type = "number")]
    pub additions: i64,
    #[serde(default)]
    #[ts(type = "number")]
    pub deletions: i64,
}

impl CommitRecord {
    pub fn new(sha: impl Into<String>, committed_at: i64, classification: Classification) -> Self {
        Self {
            sha: sha.into(),
            committed_at,
            classification,
            author_login: None,
            pr_number: None,
            additions: 0,
            deletions: 0,
        }
    }

    pub fn with_author(mut self, login: impl Into<String>) -> Self {
        self.author_login = Some(login.into());
        self
    }

    pub fn with_pr(mut self, number: i64) -> Self {
        self.pr_number = Some(number);
        self
    }

    pub fn with_churn(mut self, additions: i64, deletions: i64) -> Self {
        self.additions = additions;
        self.deletions = deletions;
        self
    }
}

/// A repository whose commits sit in the catch-all buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct UnspecifiedUsage {
    pub repo_id: String,
    pub full_name: String,
    #[ts(type = "number")]
    pub ai_assisted: i64,
    #[ts(type = "number")]
    pub other_bot: i64,
}

impl UnspecifiedUsage {
    pub fn total(&self) -> i64 {
        self.ai_assisted + self.other_bot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_status_roundtrip() {
        for s in [
            RepoSyncStatus::Pending,
            RepoSyncStatus::Syncing,
            RepoSyncStatus::Synced,
            RepoSyncStatus::Error,
        ] {
            assert_eq!(RepoSyncStatus::parse(s.as_str()), Some(s));
            assert_eq!(s.to_string().parse::<RepoSyncStatus>(), Ok(s));
        }
        assert!("paused".parse::<RepoSyncStatus>().is_err());
    }

    #[test]
    fn test_new_repo_is_pending() {
        let repo = Repo::new("r1", "acme/widgets");
        assert_eq!(repo.sync_status, RepoSyncStatus::Pending);
        assert!(!repo.is_synced());
    }

    #[test]
    fn test_commit_record_wire_shape() {
        let commit = CommitRecord::new("abc123", 1_700_000_000_000, Classification::GithubActions)
            .with_churn(3, 1);
        let value = serde_json::to_value(&commit).unwrap();
        assert_eq!(value["classification"], "github-actions");
        assert_eq!(value["committedAt"], 1_700_000_000_000i64);
        assert_eq!(value["additions"], 3);
        assert!(value.get("authorLogin").is_none());

        let back: CommitRecord =
            serde_json::from_str(r#"{"sha":"x","committedAt":0,"classification":"human"}"#)
                .unwrap();
        assert_eq!(back.additions, 0);
        assert_eq!(back.pr_number, None);
    }
}
