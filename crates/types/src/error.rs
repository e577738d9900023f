// crates/types/src/error.rs
use thiserror::Error;

/// Errors raised when a stored or transmitted string does not name a known value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("Unknown classification: {0}")]
    UnknownClassification(String),

    #[error("Unknown repository sync status: {0}")]
    UnknownSyncStatus(String),

    #[error("Unknown attribution lane: {0}")]
    UnknownLane(String),
}
