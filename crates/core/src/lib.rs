// crates/core/src/lib.rs
pub mod attribution;
pub mod rank;
pub mod reclassify;
pub mod registry;
pub mod week;

pub use attribution::{aggregate, build_haystack, map_classified, map_signal};
pub use rank::{human_percentage, Rank};
pub use reclassify::{pr_target, reclassify, NoOpReason, Transition};
pub use week::{day_label, day_start, week_label, week_start};
