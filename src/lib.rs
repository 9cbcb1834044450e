// codequiz - Timed multiple-choice trivia quiz with a persisted highscore board
//
// This is the library crate containing the quiz state machine, the highscore
// store, and the event surface. The binary crate (main.rs) provides a thin
// terminal front-end.

pub mod config;
pub mod controller;
pub mod highscores;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use controller::{QuizCommand, QuizController};
pub use highscores::{HighscoreEntry, HighscoreError, HighscoreStore, validate_initials};
pub use models::{Question, QuizConfig, QuizSession, QuizSettings, SessionError, SessionStatus, builtin_questions};
pub use state::{QuizEvent, SessionManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
