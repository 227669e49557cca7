use crate::analysis::normalize::{answer_key, same_answer, sorted_unique};
use crate::core::types::ProblemRecord;
use crate::session::shuffle::seeded_shuffled;

/// Generated options never exceed this many wrong answers.
pub const MAX_DISTRACTORS: usize = 3;

/// One candidate wrong answer, taken from another problem of the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistractorSource {
    pub answer: String,
    pub is_calculation: bool,
}

/// Distractor pool drawn from every problem of the active set.
pub fn pool_from(problems: &[ProblemRecord]) -> Vec<DistractorSource> {
    problems
        .iter()
        .map(|p| DistractorSource {
            answer: p.answer.clone(),
            is_calculation: p.is_calculation(),
        })
        .collect()
}

/// Options for one problem, in presentation order.
///
/// Authored choices are used as-is with the answer appended if missing.
/// Otherwise up to [`MAX_DISTRACTORS`] answers of the same category are
/// drawn from `pool`. Either way the set is trimmed, deduplicated, sorted and
/// shuffled with `problem_seed`, so the same seed always yields the same
/// list. An empty pool with no authored choices yields no options.
pub fn build_choices(problem: &ProblemRecord, pool: &[DistractorSource], problem_seed: i64) -> Vec<String> {
    let candidates = if !problem.choices.is_empty() {
        let mut choices = problem.choices.clone();
        if !choices.iter().any(|c| same_answer(c, &problem.answer)) {
            choices.push(problem.answer.clone());
        }
        choices
    } else if !pool.is_empty() {
        let category = problem.is_calculation();
        let answer = answer_key(&problem.answer);

        let others: Vec<String> = sorted_unique(
            pool.iter()
                .filter(|d| d.is_calculation == category)
                .map(|d| d.answer.clone()),
        )
        .into_iter()
        .filter(|a| !a.is_empty() && answer_key(a) != answer)
        .collect();

        let mut choices = vec![problem.answer.clone()];
        choices.extend(seeded_shuffled(&others, problem_seed).into_iter().take(MAX_DISTRACTORS));
        choices
    } else {
        return Vec::new();
    };

    let mut unique = sorted_unique(candidates);
    unique.retain(|c| !c.is_empty());
    seeded_shuffled(&unique, problem_seed)
}

/// Grade a picked option against the problem's answer.
pub fn is_correct_choice(problem: &ProblemRecord, choice: &str) -> bool {
    same_answer(choice, &problem.answer)
}
