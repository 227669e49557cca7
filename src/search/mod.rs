//! Cross-file queries. Everything here reads the stores and returns copies;
//! nothing is written back.

pub mod aggregate;
pub mod keyword;

pub use aggregate::{AggregateKind, Aggregator, ProblemSet};
pub use keyword::problem_matches;
