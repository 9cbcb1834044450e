use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of answer options every question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Errors raised when constructing a [`Question`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question prompt must not be empty")]
    EmptyPrompt,

    #[error("correct option index {0} is out of range (must be < {OPTIONS_PER_QUESTION})")]
    CorrectIndexOutOfRange(usize),
}

/// A single multiple-choice question.
///
/// Questions are immutable once constructed: the prompt, the four answer
/// options, and the index of the correct option. Correctness of an answer is
/// always computed against `correct_option_index` - never against anything
/// the presentation layer holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    prompt: String,
    options: [String; OPTIONS_PER_QUESTION],
    correct_option_index: usize,
}

impl Question {
    /// Create a new question, validating its invariants.
    ///
    /// # Errors
    /// Returns [`QuestionError`] if the prompt is empty or the correct option
    /// index does not point at one of the four options.
    pub fn new(
        prompt: impl Into<String>,
        options: [String; OPTIONS_PER_QUESTION],
        correct_option_index: usize,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if correct_option_index >= OPTIONS_PER_QUESTION {
            return Err(QuestionError::CorrectIndexOutOfRange(correct_option_index));
        }

        Ok(Self {
            prompt,
            options,
            correct_option_index,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String; OPTIONS_PER_QUESTION] {
        &self.options
    }

    /// Check whether the selected option index is the correct answer.
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_option_index
    }
}

fn options(raw: [&str; OPTIONS_PER_QUESTION]) -> [String; OPTIONS_PER_QUESTION] {
    raw.map(str::to_string)
}

/// The built-in question bank.
///
/// A fixed, linear list created once at startup. The quiz always presents
/// these questions in order.
pub fn builtin_questions() -> Vec<Question> {
    // Indices are validated at construction; the literals below are in range.
    vec![
        Question::new(
            "Which of the following IS NOT a primitive data type in JavaScript?",
            options(["string", "boolean", "class", "number"]),
            2,
        )
        .expect("built-in question is valid"),
        Question::new(
            "The statement in an if-else statement is enclosed within ______.",
            options(["parentheses", "curly brackets", "quotes", "square brackets"]),
            0,
        )
        .expect("built-in question is valid"),
        Question::new(
            "Arrays in JavaScript can be used to store ______.",
            options(["numbers and strings", "other arrays", "booleans", "all of the above"]),
            3,
        )
        .expect("built-in question is valid"),
    ]
}
