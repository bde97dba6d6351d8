//! Core data models for tennis history statistics.

mod enums;
mod match_record;
mod stats;
mod tournament;

pub use enums::*;
pub use match_record::*;
pub use stats::*;
pub use tournament::*;
