// crates/types/src/lib.rs
pub mod attribution;
pub mod classification;
pub mod error;
pub mod repo;
pub mod stats;

pub use attribution::*;
pub use classification::*;
pub use error::*;
pub use repo::*;
pub use stats::*;
