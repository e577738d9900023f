// crates/types/src/classification.rs
//! Commit classification taxonomy.
//!
//! Every commit carries exactly one [`Classification`]. The upstream
//! ingestion pass pins most commits to a named tool or bot; the two
//! catch-alls (`ai-assisted`, `other-bot`) mean "detected, but not
//! identified" and are refined later from PR context.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::TypesError;

/// Which side of the attribution split a match falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Ai,
    Automation,
}

impl Lane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Automation => "automation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ai" => Some(Self::Ai),
            "automation" => Some(Self::Automation),
            _ => None,
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lane {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TypesError::UnknownLane(s.to_string()))
    }
}

/// Per-commit classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    Human,
    // Named AI coding tools
    Copilot,
    Claude,
    Cursor,
    Devin,
    Codex,
    Gemini,
    // Named automation bots
    Dependabot,
    Renovate,
    GithubActions,
    // Catch-alls
    AiAssisted,
    OtherBot,
}

impl Classification {
    /// Every variant, in bucket column order.
    pub const ALL: [Classification; 12] = [
        Self::Human,
        Self::Copilot,
        Self::Claude,
        Self::Cursor,
        Self::Devin,
        Self::Codex,
        Self::Gemini,
        Self::Dependabot,
        Self::Renovate,
        Self::GithubActions,
        Self::AiAssisted,
        Self::OtherBot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Copilot => "copilot",
            Self::Claude => "claude",
            Self::Cursor => "cursor",
            Self::Devin => "devin",
            Self::Codex => "codex",
            Self::Gemini => "gemini",
            Self::Dependabot => "dependabot",
            Self::Renovate => "renovate",
            Self::GithubActions => "github-actions",
            Self::AiAssisted => "ai-assisted",
            Self::OtherBot => "other-bot",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "human" => Some(Self::Human),
            "copilot" => Some(Self::Copilot),
            "claude" => Some(Self::Claude),
            "cursor" => Some(Self::Cursor),
            "devin" => Some(Self::Devin),
            "codex" => Some(Self::Codex),
            "gemini" => Some(Self::Gemini),
            "dependabot" => Some(Self::Dependabot),
            "renovate" => Some(Self::Renovate),
            "github-actions" => Some(Self::GithubActions),
            "ai-assisted" => Some(Self::AiAssisted),
            "other-bot" => Some(Self::OtherBot),
            _ => None,
        }
    }

    /// Column name used by the stat bucket tables.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Copilot => "copilot",
            Self::Claude => "claude",
            Self::Cursor => "cursor",
            Self::Devin => "devin",
            Self::Codex => "codex",
            Self::Gemini => "gemini",
            Self::Dependabot => "dependabot",
            Self::Renovate => "renovate",
            Self::GithubActions => "github_actions",
            Self::AiAssisted => "ai_assisted",
            Self::OtherBot => "other_bot",
        }
    }

    /// Lane of this classification. `None` for human commits.
    pub fn lane(&self) -> Option<Lane> {
        match self {
            Self::Human => None,
            Self::Copilot
            | Self::Claude
            | Self::Cursor
            | Self::Devin
            | Self::Codex
            | Self::Gemini
            | Self::AiAssisted => Some(Lane::Ai),
            Self::Dependabot | Self::Renovate | Self::GithubActions | Self::OtherBot => {
                Some(Lane::Automation)
            }
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Self::Human)
    }

    /// True for the "detected but not identified" buckets.
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Self::AiAssisted | Self::OtherBot)
    }

    /// The catch-all bucket for a lane.
    pub fn catch_all(lane: Lane) -> Self {
        match lane {
            Lane::Ai => Self::AiAssisted,
            Lane::Automation => Self::OtherBot,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TypesError::UnknownClassification(s.to_string()))
    }
}
