//! codequiz - Timed multiple-choice trivia quiz.
//!
//! Main entry point for the terminal front-end. It initializes:
//! - Logging infrastructure (rotating file logs)
//! - A single-threaded tokio runtime (the quiz is one cooperative event
//!   loop: user input and the one-second countdown tick)
//! - The highscore store and configuration ([`ConfigManager`])
//! - The [`QuizController`] that turns typed commands into state transitions
//!
//! The presentation here is deliberately thin: it subscribes to
//! [`QuizEvent`]s and prints them, and maps input lines to [`QuizCommand`]s.
//! All rules live in the library crate.
//!
//! # Configuration
//!
//! Settings are read from `CodeQuiz Data/CodeQuiz Config.yaml` (missing file
//! means defaults: 75 second budget, 10 second wrong-answer penalty, 900 ms
//! pause after each answer). The highscore board persists to
//! `CodeQuiz Data/highscores.json`.

use anyhow::Result;
use codequiz::{
    APP_NAME, ConfigManager, HighscoreEntry, HighscoreStore, QuizCommand, QuizController,
    QuizEvent, SessionManager, VERSION, builtin_questions,
};
use tokio::io::{AsyncBufReadExt, BufReader};

fn main() -> Result<()> {
    // File logging only: console output would interleave with the quiz text.
    let _log_guard = codequiz::logging::setup_logging("logs", "codequiz", false, false)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    // Single-threaded, event-driven: the countdown tick and input handling
    // are serialized on one cooperative event loop.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let config_manager = ConfigManager::new("CodeQuiz Data")?;
    let config = config_manager.load_config()?;
    tracing::info!(
        budget = config.settings.time_budget_secs,
        penalty = config.settings.penalty_secs,
        "configuration loaded"
    );

    let store = HighscoreStore::open(config_manager.highscores_path())?;
    let session = SessionManager::new();
    let controller = QuizController::new(
        session.clone(),
        store,
        builtin_questions(),
        config.settings,
    );

    runtime.block_on(run(controller, session))?;

    tracing::info!("Application shutdown complete");
    Ok(())
}

async fn run(mut controller: QuizController, session: SessionManager) -> Result<()> {
    let mut events = session.subscribe();
    let render_task = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            render(&event);
        }
    });

    println!("Welcome to the code quiz!");
    println!("Commands: start, scores, clear, back, quit.");
    println!("Answer with 1-4; when the quiz ends, type two-letter initials to save your score.");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        let command = match input {
            "" => continue,
            "quit" | "exit" => break,
            "start" => Some(QuizCommand::StartQuiz),
            "scores" => {
                print_board(controller.highscores());
                None
            }
            "clear" => Some(QuizCommand::ClearHighscores),
            "back" => Some(QuizCommand::GoBack),
            other => match other.parse::<usize>() {
                Ok(n @ 1..=4) if session.read(|s| s.is_in_progress()) => {
                    Some(QuizCommand::AnswerSelected(n - 1))
                }
                _ => Some(QuizCommand::SubmitInitials(other.to_string())),
            },
        };

        if let Some(command) = command {
            if let Err(err) = controller.handle_command(command) {
                // Recoverable input errors (e.g. invalid initials) are
                // surfaced and the loop continues.
                println!("{err}");
            }
        }
    }

    render_task.abort();
    Ok(())
}

fn render(event: &QuizEvent) {
    match event {
        QuizEvent::QuestionLoaded { index, question } => {
            println!();
            println!("Question {}: {}", index + 1, question.prompt());
            for (i, option) in question.options().iter().enumerate() {
                println!("  {}. {}", i + 1, option);
            }
        }
        QuizEvent::AnswerJudged { correct } => {
            println!("{}", if *correct { "Correct!" } else { "Wrong!" });
        }
        QuizEvent::TimerUpdated { seconds_remaining } => {
            println!("  [{seconds_remaining}s]");
        }
        QuizEvent::QuizFinished { final_score } => {
            println!();
            println!("All done! Your score is {final_score}.");
            println!("Type two-letter initials to save it.");
        }
        QuizEvent::HighscoresUpdated { board } => {
            print_board(board);
        }
    }
}

fn print_board(board: &[HighscoreEntry]) {
    if board.is_empty() {
        println!("No highscores yet.");
        return;
    }
    println!("Highscores:");
    for (rank, entry) in board.iter().enumerate() {
        println!("  {}. {} - {}", rank + 1, entry.initials, entry.score);
    }
}
