mod common;

use learningmate::Library;
use learningmate::core::types::{FileRecord, ProblemRecord};
use learningmate::progress::{Outcome, ProgressFilter, apply_filters};

#[tokio::test]
async fn near_duplicate_answers_are_counted_per_problem() {
    let library = Library::in_memory();
    let file = library.catalog().save_file(FileRecord::new("F1", "csv", 2)).await.unwrap();

    let p1 = ProblemRecord::new(file.id.clone(), 1, "Capital of France?", "Paris");
    let p2 = ProblemRecord::new(file.id.clone(), 2, "Capital of France, padded", "Paris ");
    library
        .catalog()
        .save_problems(&file.id, vec![p1.clone(), p2.clone()])
        .await
        .unwrap();

    for problem in [&p1, &p2] {
        for _ in 0..2 {
            library.progress().save_result(&file.id, &problem.id, false).await.unwrap();
        }
    }

    let map = library.progress().load_for_file(&file.id).await.unwrap();
    assert_eq!(map[&p1.id].wrong_count, 1);
    assert_eq!(map[&p2.id].wrong_count, 1);
    common::assert_integrity(library.stores()).await;
}

#[tokio::test]
async fn wrong_counter_survives_correct_answers_until_reset() {
    let library = Library::in_memory();
    let report = library
        .import_problems(
            "deck.csv",
            "csv",
            vec![learningmate::core::library::ImportedProblem {
                description: "q".into(),
                answer: "a".into(),
                ..Default::default()
            }],
        )
        .await
        .unwrap();
    let file = report.file.id;
    let problem = library.catalog().problems_for_file(&file).await.unwrap()[0].id.clone();
    let tracker = library.progress();

    for outcome in [false, true, false, true] {
        tracker.save_result(&file, &problem, outcome).await.unwrap();
    }
    let record = tracker.get(&problem).await.unwrap().unwrap();
    assert_eq!(record.wrong_count, 1);
    assert_eq!(record.is_correct, Some(true));

    tracker.reset_problem_progress(&problem).await.unwrap();
    let fresh = tracker.save_result(&file, &problem, Outcome::new(Some(false), false)).await.unwrap();
    assert_eq!(fresh.wrong_count, 1);
    assert!(!fresh.is_completed);
}

#[tokio::test]
async fn filters_drive_the_study_set() {
    let library = Library::in_memory();
    let file = library.catalog().save_file(FileRecord::new("deck", "csv", 3)).await.unwrap();
    let problems = common::problems_for(&file.id, 3);
    library.catalog().save_problems(&file.id, problems.clone()).await.unwrap();

    library.progress().save_result(&file.id, &problems[0].id, false).await.unwrap();
    library.progress().save_result(&file.id, &problems[1].id, true).await.unwrap();

    let map = library.progress().load_for_file(&file.id).await.unwrap();
    let wrong = apply_filters(&problems, &map, &[ProgressFilter::Wrong]);
    assert_eq!(wrong.len(), 1);
    assert_eq!(wrong[0].id, problems[0].id);

    // both attempts completed their problems, only the third is left
    let incomplete = apply_filters(&problems, &map, &[ProgressFilter::Incomplete]);
    assert_eq!(incomplete.len(), 1);
    assert_eq!(incomplete[0].id, problems[2].id);

    let set = library.settings().update(|s| s.active_filters = vec![ProgressFilter::Correct]).await.unwrap();
    let correct = apply_filters(&problems, &map, &set.active_filters);
    assert_eq!(correct[0].id, problems[1].id);
}
