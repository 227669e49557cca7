mod common;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use learningmate::Library;
use learningmate::analysis::normalize::answer_key;
use learningmate::core::settings::OrderMode;
use learningmate::core::types::{FileId, ProblemRecord};
use learningmate::progress::ProgressFilter;
use learningmate::search::AggregateKind;
use learningmate::session::{AnswerPatch, MAX_DISTRACTORS, StudySession, is_correct_choice, pool_from};

const ANSWERS: &[&str] = &[
    "Paris", "paris", " Paris ", "Rome", "Berlin", "Madrid", "Lisbon", "Vienna", "Oslo", "서울", "부산",
];

fn random_set(rng: &mut StdRng, file: &FileId, count: u32) -> Vec<ProblemRecord> {
    (1..=count)
        .map(|i| {
            let answer = ANSWERS.choose(rng).copied().unwrap_or("Paris");
            let description = if rng.gen_bool(0.3) {
                format!("[계산] problem {}", i)
            } else {
                format!("problem {}", i)
            };
            ProblemRecord::new(file.clone(), i, description, answer)
        })
        .collect()
}

#[test]
fn generated_choices_are_valid() {
    let mut rng = StdRng::seed_from_u64(7);
    let file = FileId::from("file-under-test");

    for _ in 0..20 {
        let problems = random_set(&mut rng, &file, 25);
        let pool = pool_from(&problems);
        let mut session = StudySession::new();
        session.start(&file, problems.clone(), OrderMode::Random, &[], &pool);

        for problem in session.problems() {
            let choices = session.choices_for(&problem.id);
            let correct = choices.iter().filter(|c| is_correct_choice(problem, c)).count();
            assert_eq!(correct, 1, "answer missing or repeated in {:?}", choices);
            assert!(choices.len() <= 1 + MAX_DISTRACTORS);

            let mut keys: Vec<String> = choices.iter().map(|c| answer_key(c)).collect();
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), choices.len(), "duplicate options in {:?}", choices);

            for choice in choices.iter().filter(|c| !is_correct_choice(problem, c)) {
                let same_category = problems
                    .iter()
                    .any(|p| p.is_calculation() == problem.is_calculation() && p.answer.trim() == choice);
                assert!(same_category, "{:?} drawn across categories", choice);
            }
        }
    }
}

#[test]
fn restart_reshuffles_and_later_starts_are_stable() {
    let file = FileId::from("deck");
    let problems: Vec<ProblemRecord> = (1..=30)
        .map(|i| ProblemRecord::new(file.clone(), i, format!("q{}", i), format!("a{}", i)))
        .collect();
    let pool = pool_from(&problems);

    let mut session = StudySession::new();
    session.start(&file, problems.clone(), OrderMode::Random, &[], &pool);
    let first_seed = session.seed();

    std::thread::sleep(std::time::Duration::from_millis(3));
    session.restart(&file, problems.clone(), OrderMode::Random, &[], &pool);
    assert_ne!(session.seed(), first_seed);

    let order: Vec<_> = session.problems().iter().map(|p| p.id.clone()).collect();
    session.set_current_index(5);
    session.set_answer(&order[0], AnswerPatch::selected("a1", false));

    assert!(!session.start(&file, problems, OrderMode::Random, &[], &pool));
    let after: Vec<_> = session.problems().iter().map(|p| p.id.clone()).collect();
    assert_eq!(order, after);
    assert_eq!(session.current_index(), 5);
    assert!(session.answer(&order[0]).is_some());
}

#[test]
fn rebuilding_from_scratch_reproduces_the_view() {
    let mut rng = StdRng::seed_from_u64(99);
    let file = FileId::from("reload");
    let mut problems = random_set(&mut rng, &file, 40);
    problems.iter_mut().for_each(|p| p.choices.clear());
    let pool = pool_from(&problems);

    let mut before = StudySession::new();
    before.start(&file, problems.clone(), OrderMode::Random, &[ProgressFilter::Incomplete], &pool);

    // a page reload builds a brand new session from the same inputs
    let mut after = StudySession::new();
    after.start(&file, problems, OrderMode::Random, &[ProgressFilter::Incomplete], &pool);

    assert_eq!(before.problems(), after.problems());
    for p in before.problems() {
        assert_eq!(before.choices_for(&p.id), after.choices_for(&p.id));
    }
}

#[tokio::test]
async fn wrong_review_feeds_a_session() {
    let library = Library::in_memory();
    let mut rng = StdRng::seed_from_u64(3);

    let mut files = Vec::new();
    for name in ["a.csv", "b.csv"] {
        let rows = (0..5)
            .map(|i| learningmate::core::library::ImportedProblem {
                description: format!("{} q{}", name, i),
                answer: format!("{} a{}", name, i),
                ..Default::default()
            })
            .collect();
        files.push(library.import_problems(name, "csv", rows).await.unwrap().file);
    }

    let mut missed = 0;
    for file in &files {
        for problem in library.catalog().problems_for_file(&file.id).await.unwrap() {
            let correct = rng.gen_bool(0.5);
            if !correct {
                missed += 1;
            }
            library.progress().save_result(&file.id, &problem.id, correct).await.unwrap();
        }
    }

    let review = library.aggregated_set(AggregateKind::WrongReview, &[]).await.unwrap();
    let Some(review) = review else {
        assert_eq!(missed, 0);
        return;
    };
    assert_eq!(review.problems.len(), missed);
    assert!(review.is_review);

    let pool = pool_from(&review.problems);
    let mut session = StudySession::new();
    session.start(&review.id, review.problems.clone(), OrderMode::Sequential, &[], &pool);
    assert_eq!(session.len(), missed);
    assert_eq!(session.key().map(|k| k.file_id.as_str()), Some("aggregated-review"));

    for problem in review.problems.iter() {
        session.set_answer(&problem.id, AnswerPatch::graded(true));
    }
    assert!(session.is_finished());
    assert_eq!(session.summary().score, 100);
}
