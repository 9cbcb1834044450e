use crate::models::question::{OPTIONS_PER_QUESTION, Question};
use thiserror::Error;

/// Lifecycle of a quiz session.
///
/// The session moves strictly forward: `NotStarted` -> `InProgress` ->
/// `Finished`. `Finished` is terminal; playing again means building a fresh
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    NotStarted,
    InProgress,
    Finished,
}

/// Errors raised when a session operation is called in the wrong state.
///
/// These are contract violations: correct collaborator wiring prevents them,
/// and callers must treat them as bugs rather than retry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot start a quiz with an empty question list")]
    NoQuestions,

    #[error("operation requires an in-progress session (status: {0:?})")]
    NotInProgress(SessionStatus),

    #[error("an answer is already being judged; wait for the session to advance")]
    AnswerPending,

    #[error("advance requires a judged answer awaiting progression")]
    NoAnswerPending,

    #[error("selected option {0} is out of range (must be < {OPTIONS_PER_QUESTION})")]
    OptionOutOfRange(usize),

    #[error("final score is only available once the session is finished")]
    NotFinished,
}

/// Single source of truth for one run of the quiz.
///
/// Owns question progression, the countdown value, and the transition to
/// completion. The struct is pure state: no timers, no channels. The driving
/// of `tick()` and the post-answer advance delay live in
/// [`crate::services::start_countdown`] and
/// [`crate::controller::QuizController`]; event emission lives in
/// [`crate::state::SessionManager`].
///
/// # Invariants
///
/// - `current_index <= questions.len()`
/// - Once started, `status == Finished` iff `current_index ==
///   questions.len()` or `time_remaining == 0`
/// - `time_remaining` never exceeds the configured budget and never goes
///   negative (penalties saturate at zero)
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    time_remaining: u32,
    status: SessionStatus,
    // Set between judging an answer and advancing to the next question.
    // Answer input is rejected while the correctness result is on screen.
    answer_pending: bool,
}

impl QuizSession {
    /// Create a session that has not started yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin the quiz: index 0, full time budget, status `InProgress`.
    ///
    /// # Errors
    /// [`SessionError::NoQuestions`] if the question list is empty.
    pub fn start(&mut self, questions: Vec<Question>, time_budget_secs: u32) -> Result<(), SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        self.questions = questions;
        self.current_index = 0;
        self.time_remaining = time_budget_secs;
        self.status = SessionStatus::InProgress;
        self.answer_pending = false;
        Ok(())
    }

    /// Judge the selected answer for the current question.
    ///
    /// Correctness is computed purely from the question data. A wrong answer
    /// deducts `penalty_secs` from the remaining time, saturating at zero; a
    /// penalty that exhausts the timer finishes the session immediately.
    /// Otherwise the session is left awaiting [`advance`](Self::advance).
    ///
    /// # Errors
    /// - [`SessionError::NotInProgress`] outside `InProgress`
    /// - [`SessionError::AnswerPending`] while a previous answer awaits advance
    /// - [`SessionError::OptionOutOfRange`] for a selection >= 4
    pub fn submit_answer(&mut self, selected: usize, penalty_secs: u32) -> Result<bool, SessionError> {
        if self.status != SessionStatus::InProgress {
            return Err(SessionError::NotInProgress(self.status));
        }
        if self.answer_pending {
            return Err(SessionError::AnswerPending);
        }
        if selected >= OPTIONS_PER_QUESTION {
            return Err(SessionError::OptionOutOfRange(selected));
        }

        let correct = self.questions[self.current_index].is_correct(selected);
        if !correct {
            self.time_remaining = self.time_remaining.saturating_sub(penalty_secs);
            if self.time_remaining == 0 {
                self.status = SessionStatus::Finished;
                return Ok(correct);
            }
        }

        self.answer_pending = true;
        Ok(correct)
    }

    /// Move on after a judged answer: next question, or `Finished` when the
    /// question list is exhausted.
    ///
    /// # Errors
    /// - [`SessionError::NotInProgress`] outside `InProgress`
    /// - [`SessionError::NoAnswerPending`] when no judged answer awaits
    ///   progression (e.g. a stale scheduled advance)
    pub fn advance(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::InProgress {
            return Err(SessionError::NotInProgress(self.status));
        }
        if !self.answer_pending {
            return Err(SessionError::NoAnswerPending);
        }

        self.answer_pending = false;
        self.current_index += 1;
        if self.current_index == self.questions.len() {
            self.status = SessionStatus::Finished;
        }
        Ok(())
    }

    /// Apply one one-second countdown tick.
    ///
    /// Reaching zero finishes the session regardless of question progress.
    ///
    /// # Errors
    /// [`SessionError::NotInProgress`] outside `InProgress`.
    pub fn tick(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::InProgress {
            return Err(SessionError::NotInProgress(self.status));
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.status = SessionStatus::Finished;
        }
        Ok(())
    }

    /// The final score: seconds remaining when the quiz ended.
    ///
    /// Rewards speed and accuracy jointly, since wrong answers cost time.
    ///
    /// # Errors
    /// [`SessionError::NotFinished`] before the session is finished.
    pub fn final_score(&self) -> Result<u32, SessionError> {
        if self.status != SessionStatus::Finished {
            return Err(SessionError::NotFinished);
        }
        Ok(self.time_remaining)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == SessionStatus::InProgress
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question currently presented, if the session is mid-quiz.
    pub fn current_question(&self) -> Option<&Question> {
        if self.status == SessionStatus::InProgress {
            self.questions.get(self.current_index)
        } else {
            None
        }
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn is_answer_pending(&self) -> bool {
        self.answer_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::builtin_questions;

    const BUDGET: u32 = 75;
    const PENALTY: u32 = 10;

    fn started_session() -> QuizSession {
        let mut session = QuizSession::new();
        session.start(builtin_questions(), BUDGET).unwrap();
        session
    }

    /// Answer the current question correctly and advance.
    fn answer_correctly(session: &mut QuizSession) {
        let correct_index = (0..OPTIONS_PER_QUESTION)
            .find(|&i| session.current_question().unwrap().is_correct(i))
            .unwrap();
        assert!(session.submit_answer(correct_index, PENALTY).unwrap());
        session.advance().unwrap();
    }

    #[test]
    fn test_new_session_is_not_started() {
        let session = QuizSession::new();
        assert_eq!(session.status(), SessionStatus::NotStarted);
        assert_eq!(session.time_remaining(), 0);
    }

    #[test]
    fn test_start_resets_index_timer_and_status() {
        let session = started_session();
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.time_remaining(), BUDGET);
        assert!(session.current_question().is_some());
    }

    #[test]
    fn test_start_with_no_questions_rejected() {
        let mut session = QuizSession::new();
        assert_eq!(
            session.start(Vec::new(), BUDGET),
            Err(SessionError::NoQuestions)
        );
    }

    #[test]
    fn test_perfect_run_keeps_full_budget() {
        let mut session = started_session();
        let count = session.question_count();

        for _ in 0..count {
            answer_correctly(&mut session);
        }

        assert_eq!(session.status(), SessionStatus::Finished);
        assert_eq!(session.final_score().unwrap(), BUDGET);
    }

    #[test]
    fn test_wrong_answer_costs_exactly_the_penalty() {
        let mut session = started_session();
        let wrong_index = (0..OPTIONS_PER_QUESTION)
            .find(|&i| !session.current_question().unwrap().is_correct(i))
            .unwrap();

        let correct = session.submit_answer(wrong_index, PENALTY).unwrap();
        assert!(!correct);
        assert_eq!(session.time_remaining(), BUDGET - PENALTY);
    }

    #[test]
    fn test_penalty_saturates_at_zero_and_finishes() {
        let mut session = QuizSession::new();
        session.start(builtin_questions(), 5).unwrap();

        let wrong_index = (0..OPTIONS_PER_QUESTION)
            .find(|&i| !session.current_question().unwrap().is_correct(i))
            .unwrap();

        // 5 seconds left, 10 second penalty: clamps to 0 and ends the quiz.
        let correct = session.submit_answer(wrong_index, PENALTY).unwrap();
        assert!(!correct);
        assert_eq!(session.time_remaining(), 0);
        assert_eq!(session.status(), SessionStatus::Finished);
        assert_eq!(session.final_score().unwrap(), 0);
    }

    #[test]
    fn test_tick_decrements_and_finishes_at_zero() {
        let mut session = QuizSession::new();
        session.start(builtin_questions(), 2).unwrap();

        session.tick().unwrap();
        assert_eq!(session.time_remaining(), 1);
        assert_eq!(session.status(), SessionStatus::InProgress);

        session.tick().unwrap();
        assert_eq!(session.time_remaining(), 0);
        assert_eq!(session.status(), SessionStatus::Finished);

        // No further ticks are processed once finished.
        assert_eq!(
            session.tick(),
            Err(SessionError::NotInProgress(SessionStatus::Finished))
        );
    }

    #[test]
    fn test_second_answer_during_pause_rejected() {
        let mut session = started_session();
        session.submit_answer(0, PENALTY).unwrap();

        assert_eq!(
            session.submit_answer(1, PENALTY),
            Err(SessionError::AnswerPending)
        );

        session.advance().unwrap();
        assert!(session.submit_answer(0, PENALTY).is_ok());
    }

    #[test]
    fn test_advance_without_judged_answer_rejected() {
        let mut session = started_session();
        assert_eq!(session.advance(), Err(SessionError::NoAnswerPending));
    }

    #[test]
    fn test_out_of_range_selection_rejected() {
        let mut session = started_session();
        assert_eq!(
            session.submit_answer(OPTIONS_PER_QUESTION, PENALTY),
            Err(SessionError::OptionOutOfRange(OPTIONS_PER_QUESTION))
        );
    }

    #[test]
    fn test_operations_outside_in_progress_are_contract_errors() {
        let mut session = QuizSession::new();
        assert_eq!(
            session.submit_answer(0, PENALTY),
            Err(SessionError::NotInProgress(SessionStatus::NotStarted))
        );
        assert_eq!(
            session.tick(),
            Err(SessionError::NotInProgress(SessionStatus::NotStarted))
        );
        assert_eq!(session.final_score(), Err(SessionError::NotFinished));
    }

    #[test]
    fn test_score_never_exceeds_budget_nor_goes_negative() {
        let mut session = started_session();
        let wrong_index = |session: &QuizSession| {
            (0..OPTIONS_PER_QUESTION)
                .find(|&i| !session.current_question().unwrap().is_correct(i))
                .unwrap()
        };

        // Answer everything wrong; ticks interleave with answers.
        while session.is_in_progress() {
            session.tick().unwrap();
            if !session.is_in_progress() {
                break;
            }
            let index = wrong_index(&session);
            session.submit_answer(index, PENALTY).unwrap();
            if session.is_in_progress() {
                session.advance().unwrap();
            }
        }

        let score = session.final_score().unwrap();
        assert!(score <= BUDGET);
    }
}
