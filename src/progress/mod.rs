pub mod accounting;
pub mod filter;

pub use accounting::{Outcome, ProgressMap, ProgressSeed, ProgressTracker};
pub use filter::{FileStats, ProgressFilter, apply_filters};
