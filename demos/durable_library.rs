/// Durable library demo
///
/// Opens an on-disk library, writes to it, closes it and opens it again to
/// show that files, progress and settings come back, then trashes and
/// permanently deletes a file.

use learningmate::core::library::ProblemDraft;
use learningmate::core::settings::OrderMode;
use learningmate::storage::wal::SyncMode;
use learningmate::{Config, Library};

fn draft(description: &str, answer: &str, choices: &[&str]) -> ProblemDraft {
    ProblemDraft {
        description: description.to_string(),
        answer: answer.to_string(),
        choices: choices.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = tempfile::tempdir()?;
    let config = Config {
        sync_mode: SyncMode::Batch,
        compact_threshold: 16,
        ..Config::with_path(dir.path())
    };

    println!("Step 1: Writing to {:?}", dir.path());
    let file_id = {
        let library = Library::open(config.clone())?;
        let file = library
            .save_authored(
                None,
                "rust basics",
                vec![
                    draft("Keyword for an immutable binding", "let", &["const", "var", "static"]),
                    draft("Trait for explicit duplication", "Clone", &["Copy", "Dup"]),
                    draft("Smart pointer for shared ownership across threads", "Arc", &[]),
                ],
            )
            .await?;

        let problems = library.catalog().problems_for_file(&file.id).await?;
        library.progress().save_result(&file.id, &problems[0].id, true).await?;
        library.progress().save_result(&file.id, &problems[1].id, false).await?;
        library.settings().update(|s| s.order_mode = OrderMode::Sequential).await?;
        println!("  Saved '{}' with {} problems\n", file.original_filename, problems.len());
        file.id
    };

    println!("Step 2: Reopening...");
    let library = Library::open(config)?;
    let progress = library.progress().load_for_file(&file_id).await?;
    println!("  Progress records: {}", progress.len());
    println!("  Order mode: {:?}", library.settings().load().await?.order_mode);
    if let Some(json) = library.export_json(&file_id).await? {
        println!("  Export:\n{}\n", json);
    }

    println!("Step 3: Trash, then delete permanently...");
    library.catalog().move_to_trash(&file_id).await?;
    println!("  Trashed files: {}", library.catalog().trashed_files().await?.len());
    let report = library.catalog().permanent_delete(&file_id).await?;
    println!("  {:?}", report);
    println!("  Stats: {:?}", library.stats().await?);
    Ok(())
}
