// Quiz controller - wires the session state machine to the highscore store
// and the countdown service, and turns presentation commands into state
// transitions. Contains no rendering: the presentation layer subscribes to
// QuizEvents and draws whatever arrives.

use crate::highscores::{HighscoreEntry, HighscoreStore};
use crate::models::{Question, QuizSettings};
use crate::services::{CountdownHandle, start_countdown};
use crate::state::SessionManager;
use anyhow::Result;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Commands the presentation layer feeds into the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizCommand {
    /// Begin a fresh quiz run (cancels any previous countdown).
    StartQuiz,
    /// The player picked an answer option.
    AnswerSelected(usize),
    /// The player submitted initials for the final score.
    SubmitInitials(String),
    /// Reset the highscore board.
    ClearHighscores,
    /// Navigate away from the highscore page. Pure navigation: the session
    /// and the board are left untouched.
    GoBack,
}

/// Coordinates the session, the highscore store, and the countdown.
///
/// Owns the only live [`CountdownHandle`] and the pending advance task, so
/// restarting the quiz can never leave two tickers decrementing the same
/// clock or a stale advance firing into the new session.
pub struct QuizController {
    session: SessionManager,
    store: HighscoreStore,
    questions: Vec<Question>,
    settings: QuizSettings,
    countdown: Option<CountdownHandle>,
    pending_advance: Option<JoinHandle<()>>,
}

impl QuizController {
    pub fn new(
        session: SessionManager,
        store: HighscoreStore,
        questions: Vec<Question>,
        settings: QuizSettings,
    ) -> Self {
        Self {
            session,
            store,
            questions,
            settings,
            countdown: None,
            pending_advance: None,
        }
    }

    /// Access the shared session manager (for subscribing to events).
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Dispatch one presentation command.
    ///
    /// # Errors
    /// Invalid initials and wrong-state session operations surface as
    /// errors; the board and session are left unchanged in those cases.
    pub fn handle_command(&mut self, command: QuizCommand) -> Result<()> {
        match command {
            QuizCommand::StartQuiz => self.start_quiz(),
            QuizCommand::AnswerSelected(index) => self.answer_selected(index),
            QuizCommand::SubmitInitials(initials) => self.submit_initials(&initials),
            QuizCommand::ClearHighscores => self.clear_highscores(),
            QuizCommand::GoBack => {
                tracing::debug!("navigation: go back");
                Ok(())
            }
        }
    }

    /// Start (or restart) the quiz with the fixed question list.
    ///
    /// Any previously running countdown and any still-pending advance are
    /// cancelled before the new run begins, so exactly one ticker is live at
    /// a time and no leftover advance touches the fresh session.
    pub fn start_quiz(&mut self) -> Result<()> {
        if let Some(previous) = self.countdown.take() {
            tracing::debug!("cancelling previous countdown before restart");
            previous.cancel();
        }
        if let Some(task) = self.pending_advance.take() {
            tracing::debug!("discarding pending advance before restart");
            task.abort();
        }

        self.session
            .start_quiz(self.questions.clone(), self.settings.time_budget_secs)?;
        self.countdown = Some(start_countdown(self.session.clone()));
        Ok(())
    }

    /// Judge the selected answer, then schedule the advance to the next
    /// question after the configured pause.
    ///
    /// The pause is a UX contract: the player gets a moment to see the
    /// correctness result. A tick that fires during the pause is processed
    /// normally and may finish the quiz first, in which case the scheduled
    /// advance finds the session no longer in progress and does nothing.
    pub fn answer_selected(&mut self, index: usize) -> Result<()> {
        self.session.submit_answer(index, self.settings.penalty_secs)?;

        // A penalty can exhaust the clock; only a still-running session has
        // an advance pending.
        if self.session.read(|s| s.is_answer_pending()) {
            let session = self.session.clone();
            let delay = Duration::from_millis(self.settings.advance_delay_ms);
            // Anchor the deadline now: a sleep created inside the task would
            // start counting at the task's first poll, not at the answer.
            let deadline = tokio::time::Instant::now() + delay;
            self.pending_advance = Some(tokio::spawn(async move {
                tokio::time::sleep_until(deadline).await;
                if let Err(err) = session.advance() {
                    tracing::debug!("advance skipped: {err}");
                }
            }));
        }
        Ok(())
    }

    /// Record the finished session's score under the given initials.
    pub fn submit_initials(&mut self, initials: &str) -> Result<()> {
        let score = self.session.final_score()?;
        let entry = HighscoreEntry::new(initials, score)?;

        self.store.add(entry)?;
        self.session.publish_highscores(self.store.list().to_vec());
        tracing::info!(initials, score, "highscore recorded");
        Ok(())
    }

    /// Empty the highscore board.
    pub fn clear_highscores(&mut self) -> Result<()> {
        self.store.clear()?;
        self.session.publish_highscores(Vec::new());
        Ok(())
    }

    /// The current ranked board.
    pub fn highscores(&self) -> &[HighscoreEntry] {
        self.store.list()
    }
}
