/// Study walkthrough
///
/// Imports a small deck, runs a quiz session over it, records outcomes,
/// then reviews the missed problems across files.

use learningmate::Library;
use learningmate::core::library::ImportedProblem;
use learningmate::search::AggregateKind;
use learningmate::session::{AnswerPatch, StudySession, is_correct_choice, pool_from};

fn row(description: &str, answer: &str) -> ImportedProblem {
    ImportedProblem {
        description: description.to_string(),
        answer: answer.to_string(),
        ..Default::default()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   LearningMate - Study Session Walkthrough    ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    let library = Library::in_memory();

    // Step 1: Import
    println!("Step 1: IMPORT - Loading decoded rows...");
    let report = library
        .import_problems(
            "capitals.csv",
            "csv",
            vec![
                row("Capital of France", "Paris"),
                row("Capital of Italy", "Rome"),
                row("Capital of Germany", "Berlin"),
                row("Capital of Spain", "Madrid"),
                row("Capital of Portugal", "Lisbon"),
                row("[계산] 12 * 12", "144"),
                row("[계산] 7 * 8", "56"),
                row("", "dropped: no description"),
            ],
        )
        .await?;
    println!("  Imported {} problems ({} skipped)\n", report.imported, report.skipped);

    // Step 2: Session
    println!("Step 2: SESSION - Building a random-order quiz...");
    let settings = library.settings().load().await?;
    let set = library.problem_set(&report.file.id).await?.ok_or("file vanished")?;
    let pool = pool_from(&set.problems);

    let mut session = StudySession::new();
    session.start(&set.id, set.problems.clone(), settings.order_mode, &settings.active_filters, &pool);
    println!("  {} problems, seed {}\n", session.len(), session.seed());

    // Step 3: Answer every problem, always picking the first option
    println!("Step 3: ANSWER - Picking the first option every time...");
    loop {
        let Some(problem) = session.current_problem().cloned() else {
            break;
        };
        let choices = session.choices_for(&problem.id).to_vec();
        let picked = choices.first().cloned().unwrap_or_default();
        let correct = is_correct_choice(&problem, &picked);

        println!("  {:<22} {:?} -> {:<8} {}", problem.description, choices, picked, if correct { "✓" } else { "✗" });
        session.set_answer(&problem.id, AnswerPatch::selected(picked, correct));
        library.progress().save_result(&report.file.id, &problem.id, correct).await?;

        if !session.next() {
            break;
        }
    }
    let summary = session.summary();
    println!(
        "  Score {}% ({} correct, {} wrong of {})\n",
        summary.score, summary.correct, summary.wrong, summary.total
    );

    // Step 4: Review
    println!("Step 4: REVIEW - Collecting missed problems...");
    match library.aggregated_set(AggregateKind::WrongReview, &[]).await? {
        Some(review) => {
            println!("  '{}': {} problems", review.title, review.problems.len());
            for problem in &review.problems {
                println!("    - {} (answer: {})", problem.description, problem.answer);
            }
        }
        None => println!("  Nothing to review"),
    }

    // Step 5: Search
    println!("\nStep 5: SEARCH - Keyword and initial-consonant search...");
    for query in ["paris", "capital", "ㄱㅅ"] {
        let files = library.aggregator().search_by_keyword(query).await?;
        println!("  {:<8} -> {} files", query, files.len());
    }

    let stats = library.stats().await?;
    println!("\nStats: {:?}", stats);
    Ok(())
}
