use serde::Serialize;

use crate::session::engine::StudySession;

/// Result screen numbers for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub wrong: usize,
    /// Percentage of all problems answered correctly, rounded.
    pub score: u32,
}

impl SessionSummary {
    pub fn of(session: &StudySession) -> Self {
        let total = session.len();
        let mut summary = SessionSummary {
            total,
            ..Default::default()
        };

        for problem in session.problems() {
            let Some(answer) = session.answer(&problem.id) else {
                continue;
            };
            summary.answered += 1;
            match answer.is_correct {
                Some(true) => summary.correct += 1,
                Some(false) => summary.wrong += 1,
                None => {}
            }
        }

        if total > 0 {
            summary.score = (summary.correct as f64 / total as f64 * 100.0).round() as u32;
        }
        summary
    }
}

impl StudySession {
    pub fn summary(&self) -> SessionSummary {
        SessionSummary::of(self)
    }
}
