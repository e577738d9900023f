// crates/core/src/rank.rs
//! Human-authorship rank tiers.
//!
//! | Tier | Human % |
//! |------|---------|
//! | Artisan | >= 95 |
//! | Craftsman | >= 80 |
//! | Collaborator | >= 50 |
//! | Orchestrator | >= 20 |
//! | Automaton | < 20 |
//!
//! Derived on read, never stored.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Rank thresholds, best tier first.
pub mod thresholds {
    pub const ARTISAN_MIN: f64 = 95.0;
    pub const CRAFTSMAN_MIN: f64 = 80.0;
    pub const COLLABORATOR_MIN: f64 = 50.0;
    pub const ORCHESTRATOR_MIN: f64 = 20.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Artisan,
    Craftsman,
    Collaborator,
    Orchestrator,
    Automaton,
}

impl Rank {
    /// Best tier first.
    pub const ALL: [Rank; 5] = [
        Rank::Artisan,
        Rank::Craftsman,
        Rank::Collaborator,
        Rank::Orchestrator,
        Rank::Automaton,
    ];

    /// Map a human percentage (0-100) to its tier.
    ///
    /// Out-of-range values are clamped; NaN lands in the lowest tier.
    pub fn from_human_percentage(pct: f64) -> Self {
        if pct.is_nan() {
            return Rank::Automaton;
        }
        let pct = pct.clamp(0.0, 100.0);
        if pct >= thresholds::ARTISAN_MIN {
            Rank::Artisan
        } else if pct >= thresholds::CRAFTSMAN_MIN {
            Rank::Craftsman
        } else if pct >= thresholds::COLLABORATOR_MIN {
            Rank::Collaborator
        } else if pct >= thresholds::ORCHESTRATOR_MIN {
            Rank::Orchestrator
        } else {
            Rank::Automaton
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Artisan => "artisan",
            Rank::Craftsman => "craftsman",
            Rank::Collaborator => "collaborator",
            Rank::Orchestrator => "orchestrator",
            Rank::Automaton => "automaton",
        }
    }

    /// Display label for badges.
    pub fn display_label(&self) -> &'static str {
        match self {
            Rank::Artisan => "Artisan",
            Rank::Craftsman => "Craftsman",
            Rank::Collaborator => "Collaborator",
            Rank::Orchestrator => "Orchestrator",
            Rank::Automaton => "Automaton",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Share of human commits, rounded to one decimal place. `None` when there are no commits.
pub fn human_percentage(human_commits: i64, total_commits: i64) -> Option<f64> {
    if total_commits <= 0 {
        return None;
    }
    let pct = (human_commits.max(0) as f64 / total_commits as f64) * 100.0;
    Some(((pct * 10.0).round() / 10.0).min(100.0))
}
