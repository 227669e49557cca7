mod common;

use tempfile::TempDir;

use learningmate::core::library::ImportedProblem;
use learningmate::core::settings::OrderMode;
use learningmate::session::{StudySession, pool_from};
use learningmate::storage::wal::SyncMode;
use learningmate::{Config, ErrorKind, Library};

fn config(dir: &TempDir, compact_threshold: usize) -> Config {
    Config {
        sync_mode: SyncMode::Immediate,
        compact_threshold,
        ..Config::with_path(dir.path())
    }
}

fn rows(count: usize) -> Vec<ImportedProblem> {
    (0..count)
        .map(|i| ImportedProblem {
            description: format!("question {}", i),
            answer: format!("answer {}", i),
            choices: vec![format!("decoy {}", i)],
            ..Default::default()
        })
        .collect()
}

#[tokio::test]
async fn library_state_survives_reopen() {
    common::init_logging();
    let dir = TempDir::new().unwrap();

    let (file_id, missed, trashed_id) = {
        let library = Library::open(config(&dir, 0)).unwrap();
        let file = library.import_problems("deck.csv", "csv", rows(6)).await.unwrap().file;
        let trashed = library.import_problems("old.csv", "csv", rows(2)).await.unwrap().file;
        library.catalog().move_to_trash(&trashed.id).await.unwrap();

        let problems = library.catalog().problems_for_file(&file.id).await.unwrap();
        library.progress().save_result(&file.id, &problems[2].id, false).await.unwrap();
        library.settings().update(|s| s.order_mode = OrderMode::Sequential).await.unwrap();
        (file.id, problems[2].id.clone(), trashed.id)
    };

    let library = Library::open(config(&dir, 0)).unwrap();
    assert_eq!(library.catalog().problems_for_file(&file_id).await.unwrap().len(), 6);
    assert_eq!(library.progress().get(&missed).await.unwrap().unwrap().wrong_count, 1);
    assert_eq!(library.settings().load().await.unwrap().order_mode, OrderMode::Sequential);

    let trashed = library.catalog().trashed_files().await.unwrap();
    assert_eq!(trashed.len(), 1);
    assert_eq!(trashed[0].id, trashed_id);
    common::assert_integrity(library.stores()).await;
}

#[tokio::test]
async fn cascade_survives_reopen_with_compaction() {
    let dir = TempDir::new().unwrap();

    let file_id = {
        let library = Library::open(config(&dir, 5)).unwrap();
        let file = library.import_problems("deck.csv", "csv", rows(12)).await.unwrap().file;
        for problem in library.catalog().problems_for_file(&file.id).await.unwrap() {
            library.progress().toggle_complete(&file.id, &problem.id, true).await.unwrap();
        }
        library.catalog().permanent_delete(&file.id).await.unwrap();
        file.id
    };

    let library = Library::open(config(&dir, 5)).unwrap();
    assert!(library.catalog().get_file(&file_id).await.unwrap().is_none());
    assert!(library.catalog().problems_for_file(&file_id).await.unwrap().is_empty());
    assert!(library.progress().load_all().await.unwrap().is_empty());

    let stats = library.stats().await.unwrap();
    assert_eq!(stats.problems, 0);
    assert_eq!(stats.active_files, 0);
}

#[tokio::test]
async fn second_open_of_same_directory_is_refused() {
    let dir = TempDir::new().unwrap();
    let _first = Library::open(config(&dir, 0)).unwrap();

    let err = Library::open(config(&dir, 0)).err().unwrap();
    assert_eq!(err.kind, ErrorKind::InvalidState);
}

#[tokio::test]
async fn same_session_after_reopen() {
    let dir = TempDir::new().unwrap();

    let before = {
        let library = Library::open(config(&dir, 0)).unwrap();
        library.import_problems("deck.csv", "csv", rows(15)).await.unwrap();
        session_for(&library).await
    };
    let library = Library::open(config(&dir, 0)).unwrap();
    let after = session_for(&library).await;

    assert_eq!(before.problems(), after.problems());
    for p in before.problems() {
        assert_eq!(before.choices_for(&p.id), after.choices_for(&p.id));
    }
}

async fn session_for(library: &Library) -> StudySession {
    let file_id = library.catalog().active_files().await.unwrap().remove(0).id;
    let set = library.problem_set(&file_id).await.unwrap().unwrap();
    let pool = pool_from(&set.problems);

    let mut session = StudySession::new();
    session.start(&set.id, set.problems, OrderMode::Random, &[], &pool);
    session
}
