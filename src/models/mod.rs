//! Data models for the quiz core.
//!
//! - [`Question`]: immutable multiple-choice question plus the built-in bank
//! - [`QuizSession`]: the quiz state machine (progression, countdown value,
//!   completion)
//! - [`QuizConfig`] / [`QuizSettings`]: tunables loaded from
//!   `CodeQuiz Config.yaml`
//!
//! The models are pure data: no timers, no channels, no I/O. State updates
//! go through [`SessionManager`](crate::state::SessionManager) so that every
//! mutation emits the matching [`QuizEvent`](crate::state::QuizEvent).

pub mod config;
pub mod question;
pub mod session;

pub use config::{QuizConfig, QuizSettings};
pub use question::{OPTIONS_PER_QUESTION, Question, QuestionError, builtin_questions};
pub use session::{QuizSession, SessionError, SessionStatus};
