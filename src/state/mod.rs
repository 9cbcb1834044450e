// State management module
//
// Wraps the QuizSession state machine with shared access and emits change
// events so the presentation layer never has to poll.

use crate::highscores::HighscoreEntry;
use crate::models::{Question, QuizSession, SessionError, SessionStatus};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Events emitted as the quiz progresses.
///
/// These are the whole surface the presentation layer renders from: which
/// question is up, whether the last answer was right, how much time is left,
/// the final score, and the ranked highscore board.
#[derive(Clone, Debug, PartialEq)]
pub enum QuizEvent {
    /// A question has been presented.
    QuestionLoaded {
        index: usize,
        question: Question,
    },

    /// The submitted answer has been judged.
    AnswerJudged {
        correct: bool,
    },

    /// The countdown value changed (tick or penalty).
    TimerUpdated {
        seconds_remaining: u32,
    },

    /// The session ended, by exhausting the questions or the clock.
    QuizFinished {
        final_score: u32,
    },

    /// The highscore board changed (entry added or board cleared).
    HighscoresUpdated {
        board: Vec<HighscoreEntry>,
    },
}

/// Shared session state with event emission.
///
/// The central coordination point of the core:
/// - Holds the [`QuizSession`] behind `Arc<RwLock<T>>`
/// - Applies mutations through [`update()`](Self::update), diffing old vs
///   new state to emit the matching [`QuizEvent`]s
/// - Supports subscribing to events via tokio broadcast channels
///
/// Always go through `SessionManager` instead of touching [`QuizSession`]
/// directly: [`read()`](Self::read) for queries,
/// the named operations ([`start_quiz`](Self::start_quiz),
/// [`submit_answer`](Self::submit_answer), [`tick`](Self::tick),
/// [`advance`](Self::advance)) for mutations, and
/// [`subscribe()`](Self::subscribe) to observe.
pub struct SessionManager {
    session: Arc<RwLock<QuizSession>>,
    event_tx: broadcast::Sender<QuizEvent>,
}

impl SessionManager {
    /// Create a manager around a session that has not started yet.
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            session: Arc::new(RwLock::new(QuizSession::new())),
            event_tx,
        }
    }

    /// Get a snapshot of the current session state.
    pub fn snapshot(&self) -> QuizSession {
        self.session.read().unwrap().clone()
    }

    /// Execute a function with read access to the session.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&QuizSession) -> R,
    {
        let session = self.session.read().unwrap();
        f(&session)
    }

    /// Subscribe to quiz events.
    ///
    /// Returns a receiver that observes all future events. Multiple
    /// subscribers can listen simultaneously.
    pub fn subscribe(&self) -> broadcast::Receiver<QuizEvent> {
        self.event_tx.subscribe()
    }

    /// Apply a mutation and emit the events implied by the state diff.
    ///
    /// Captures the old state, applies `update_fn`, then compares old and
    /// new to derive [`QuizEvent`]s. The closure returns the session
    /// operation's own result so contract errors propagate unchanged.
    fn update<F, R>(&self, update_fn: F) -> (Result<R, SessionError>, Vec<QuizEvent>)
    where
        F: FnOnce(&mut QuizSession) -> Result<R, SessionError>,
    {
        let mut session = self.session.write().unwrap();
        let old = session.clone();

        let result = update_fn(&mut session);

        let events = if result.is_ok() {
            self.detect_changes(&old, &session)
        } else {
            Vec::new()
        };

        for event in &events {
            // Send errors only mean nobody is listening right now.
            let _ = self.event_tx.send(event.clone());
        }

        (result, events)
    }

    /// Derive events from an old/new state pair.
    fn detect_changes(&self, old: &QuizSession, new: &QuizSession) -> Vec<QuizEvent> {
        let mut events = Vec::new();

        if old.time_remaining() != new.time_remaining() {
            events.push(QuizEvent::TimerUpdated {
                seconds_remaining: new.time_remaining(),
            });
        }

        // A newly presented question: the session just started or advanced.
        let question_changed = old.current_index() != new.current_index()
            || (old.status() != SessionStatus::InProgress
                && new.status() == SessionStatus::InProgress);
        if question_changed {
            if let Some(question) = new.current_question() {
                events.push(QuizEvent::QuestionLoaded {
                    index: new.current_index(),
                    question: question.clone(),
                });
            }
        }

        if old.status() != SessionStatus::Finished && new.status() == SessionStatus::Finished {
            events.push(QuizEvent::QuizFinished {
                final_score: new.time_remaining(),
            });
        }

        events
    }

    // Named session operations

    /// Start (or restart) the quiz.
    ///
    /// Always emits `TimerUpdated` and `QuestionLoaded` for question 0, even
    /// when restarting from a state the diff cannot distinguish. The caller
    /// is responsible for (re)starting the countdown driver.
    pub fn start_quiz(
        &self,
        questions: Vec<Question>,
        time_budget_secs: u32,
    ) -> Result<(), SessionError> {
        let (result, events) = self.update(|session| session.start(questions, time_budget_secs));
        if result.is_ok() {
            // A restart can land on the same index and clock as the old
            // state, in which case the diff sees no change; the fresh timer
            // and first question are still announced.
            if !events
                .iter()
                .any(|e| matches!(e, QuizEvent::TimerUpdated { .. }))
            {
                let _ = self.event_tx.send(QuizEvent::TimerUpdated {
                    seconds_remaining: time_budget_secs,
                });
            }
            if !events
                .iter()
                .any(|e| matches!(e, QuizEvent::QuestionLoaded { .. }))
            {
                if let Some(question) = self.read(|s| s.current_question().cloned()) {
                    let _ = self
                        .event_tx
                        .send(QuizEvent::QuestionLoaded { index: 0, question });
                }
            }
            tracing::info!(budget = time_budget_secs, "quiz session started");
        }
        result
    }

    /// Judge an answer for the current question.
    ///
    /// Emits `AnswerJudged` (and `TimerUpdated` when a penalty applied; a
    /// penalty that exhausts the clock also emits `QuizFinished`). Returns
    /// whether the answer was correct.
    pub fn submit_answer(&self, selected: usize, penalty_secs: u32) -> Result<bool, SessionError> {
        let (result, _) = self.update(|session| session.submit_answer(selected, penalty_secs));

        if let Ok(correct) = result {
            tracing::debug!(selected, correct, "answer judged");
            let _ = self.event_tx.send(QuizEvent::AnswerJudged { correct });
        }
        result
    }

    /// Advance past a judged answer.
    ///
    /// Emits `QuestionLoaded` for the next question, or `QuizFinished` when
    /// the question list is exhausted.
    pub fn advance(&self) -> Result<(), SessionError> {
        let (result, _) = self.update(|session| session.advance());
        result
    }

    /// Apply one countdown tick. Emits `TimerUpdated`, plus `QuizFinished`
    /// when the clock reaches zero.
    pub fn tick(&self) -> Result<(), SessionError> {
        let (result, _) = self.update(|session| session.tick());
        result
    }

    /// The final score of a finished session.
    pub fn final_score(&self) -> Result<u32, SessionError> {
        self.read(|session| session.final_score())
    }

    /// Publish the current highscore board to subscribers.
    ///
    /// The board itself lives in [`crate::highscores::HighscoreStore`]; the
    /// manager only fans the update out on the shared event channel.
    pub fn publish_highscores(&self, board: Vec<HighscoreEntry>) {
        let _ = self.event_tx.send(QuizEvent::HighscoresUpdated { board });
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

// Cloning shares the underlying session and event channel.
impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            event_tx: self.event_tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::builtin_questions;

    const BUDGET: u32 = 75;
    const PENALTY: u32 = 10;

    fn started_manager() -> SessionManager {
        let manager = SessionManager::new();
        manager.start_quiz(builtin_questions(), BUDGET).unwrap();
        manager
    }

    fn wrong_index(manager: &SessionManager) -> usize {
        manager.read(|session| {
            let question = session.current_question().unwrap();
            (0..crate::models::OPTIONS_PER_QUESTION)
                .find(|&i| !question.is_correct(i))
                .unwrap()
        })
    }

    fn correct_index(manager: &SessionManager) -> usize {
        manager.read(|session| {
            let question = session.current_question().unwrap();
            (0..crate::models::OPTIONS_PER_QUESTION)
                .find(|&i| question.is_correct(i))
                .unwrap()
        })
    }

    #[test]
    fn test_start_emits_timer_and_first_question() {
        let manager = SessionManager::new();
        let mut rx = manager.subscribe();

        manager.start_quiz(builtin_questions(), BUDGET).unwrap();

        assert!(matches!(
            rx.try_recv().unwrap(),
            QuizEvent::TimerUpdated { seconds_remaining: BUDGET }
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            QuizEvent::QuestionLoaded { index: 0, .. }
        ));
    }

    #[test]
    fn test_restart_at_question_zero_reannounces_the_first_question() {
        let manager = started_manager();
        let mut rx = manager.subscribe();

        // Same budget, same index, untouched clock: the state diff alone
        // sees no change.
        manager.start_quiz(builtin_questions(), BUDGET).unwrap();

        let mut saw_timer = false;
        let mut saw_question = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                QuizEvent::TimerUpdated { seconds_remaining } => {
                    assert_eq!(seconds_remaining, BUDGET);
                    saw_timer = true;
                }
                QuizEvent::QuestionLoaded { index, .. } => {
                    assert_eq!(index, 0);
                    saw_question = true;
                }
                _ => {}
            }
        }
        assert!(saw_timer);
        assert!(saw_question);
    }

    #[test]
    fn test_correct_answer_emits_judged_without_timer_change() {
        let manager = started_manager();
        let mut rx = manager.subscribe();

        let index = correct_index(&manager);
        assert!(manager.submit_answer(index, PENALTY).unwrap());

        assert!(matches!(
            rx.try_recv().unwrap(),
            QuizEvent::AnswerJudged { correct: true }
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_wrong_answer_emits_timer_update_then_judged() {
        let manager = started_manager();
        let mut rx = manager.subscribe();

        let index = wrong_index(&manager);
        assert!(!manager.submit_answer(index, PENALTY).unwrap());

        assert!(matches!(
            rx.try_recv().unwrap(),
            QuizEvent::TimerUpdated { seconds_remaining } if seconds_remaining == BUDGET - PENALTY
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            QuizEvent::AnswerJudged { correct: false }
        ));
    }

    #[test]
    fn test_advance_emits_next_question() {
        let manager = started_manager();
        manager.submit_answer(correct_index(&manager), PENALTY).unwrap();

        let mut rx = manager.subscribe();
        manager.advance().unwrap();

        assert!(matches!(
            rx.try_recv().unwrap(),
            QuizEvent::QuestionLoaded { index: 1, .. }
        ));
    }

    #[test]
    fn test_final_tick_emits_finished() {
        let manager = SessionManager::new();
        manager.start_quiz(builtin_questions(), 1).unwrap();
        let mut rx = manager.subscribe();

        manager.tick().unwrap();

        assert!(matches!(
            rx.try_recv().unwrap(),
            QuizEvent::TimerUpdated { seconds_remaining: 0 }
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            QuizEvent::QuizFinished { final_score: 0 }
        ));
        assert!(manager.tick().is_err());
    }

    #[test]
    fn test_failed_operation_emits_nothing() {
        let manager = SessionManager::new();
        let mut rx = manager.subscribe();

        assert!(manager.tick().is_err());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_multiple_subscribers_observe_events() {
        let manager = SessionManager::new();
        let mut rx1 = manager.subscribe();
        let mut rx2 = manager.subscribe();

        manager.start_quiz(builtin_questions(), BUDGET).unwrap();

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn test_clone_shares_session() {
        let manager1 = started_manager();
        let manager2 = manager1.clone();

        manager1.tick().unwrap();

        let snapshot = manager2.snapshot();
        assert_eq!(snapshot.time_remaining(), BUDGET - 1);
    }

    #[test]
    fn test_publish_highscores() {
        let manager = SessionManager::new();
        let mut rx = manager.subscribe();

        let board = vec![HighscoreEntry::new("AB", 42).unwrap()];
        manager.publish_highscores(board.clone());

        assert!(matches!(
            rx.try_recv().unwrap(),
            QuizEvent::HighscoresUpdated { board: b } if b == board
        ));
    }
}
