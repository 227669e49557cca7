//! Study session engine.
//!
//! A session freezes one ordering of a problem set and one option list per
//! problem. Both derive from a seed computed from the set's id, so rebuilding
//! the same session after a reload shows exactly what the user saw before.
//! Only an explicit restart mixes in the clock.

pub mod choices;
pub mod engine;
pub mod shuffle;
pub mod summary;

pub use choices::{DistractorSource, MAX_DISTRACTORS, build_choices, is_correct_choice, pool_from};
pub use engine::{AnswerPatch, SessionAnswer, SessionKey, StudySession};
pub use shuffle::{charcode_sum, seeded_shuffle, seeded_shuffled};
pub use summary::SessionSummary;
