// crates/core/src/reclassify.rs
//! Upgrade-only reclassification.
//!
//! A commit's classification is fixed once set, with one exception: a
//! `human` commit inside a PR that carries bot/AI evidence may be upgraded
//! to that tool or bot. Nothing ever moves back to `human`, and one
//! non-human classification is never swapped for another.

use provenance_types::{AttributionSignal, Classification};

use crate::attribution::map_signal;
use crate::registry::classification_for_key;

/// Outcome of checking a proposed classification change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `human -> to`; the only write the store may perform.
    Upgrade { to: Classification },
    NoOp(NoOpReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// Proposed value equals the current one.
    Unchanged,
    /// Current value is already non-human.
    AlreadyAttributed,
}

impl Transition {
    pub fn is_upgrade(&self) -> bool {
        matches!(self, Transition::Upgrade { .. })
    }
}

/// Check whether `current -> proposed` is an allowed transition.
pub fn reclassify(current: Classification, proposed: Classification) -> Transition {
    if current == proposed {
        Transition::NoOp(NoOpReason::Unchanged)
    } else if current.is_human() {
        Transition::Upgrade { to: proposed }
    } else {
        Transition::NoOp(NoOpReason::AlreadyAttributed)
    }
}

/// Classification a PR's evidence points to, if any.
///
/// Named tools map to their own variant; identities the taxonomy has no
/// column for (pattern-only tools, unspecified fallbacks) map to the
/// catch-all of their lane.
pub fn pr_target(pr_signal: &AttributionSignal) -> Option<Classification> {
    map_signal(pr_signal).map(|m| classification_for_key(&m.key, m.lane))
}
