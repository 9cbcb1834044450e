use serde::{Deserialize, Serialize};

/// User-tunable quiz settings from `CodeQuiz Config.yaml`.
///
/// Everything here is a tuning knob, not logic: the state machine is correct
/// for any time budget, penalty, or advance delay. Defaults: 75 second
/// budget, 10 second wrong-answer penalty, 900 ms pause after an answer is
/// judged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(rename = "Quiz_Settings")]
    pub settings: QuizSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSettings {
    /// Seconds on the clock when a session starts.
    #[serde(rename = "Time Budget", default = "default_time_budget")]
    pub time_budget_secs: u32,

    /// Seconds deducted for a wrong answer (saturating at zero).
    #[serde(rename = "Wrong Answer Penalty", default = "default_penalty")]
    pub penalty_secs: u32,

    /// Pause between judging an answer and presenting the next question, so
    /// the player can see whether they were correct.
    #[serde(rename = "Advance Delay Ms", default = "default_advance_delay")]
    pub advance_delay_ms: u64,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            time_budget_secs: default_time_budget(),
            penalty_secs: default_penalty(),
            advance_delay_ms: default_advance_delay(),
            debug_mode: false,
        }
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            settings: QuizSettings::default(),
        }
    }
}

fn default_time_budget() -> u32 {
    75
}

fn default_penalty() -> u32 {
    10
}

fn default_advance_delay() -> u64 {
    900
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = QuizSettings::default();
        assert_eq!(settings.time_budget_secs, 75);
        assert_eq!(settings.penalty_secs, 10);
        assert_eq!(settings.advance_delay_ms, 900);
        assert!(!settings.debug_mode);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let yaml = "Quiz_Settings:\n  Time Budget: 60\n";
        let config: QuizConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.settings.time_budget_secs, 60);
        assert_eq!(config.settings.penalty_secs, 10);
        assert_eq!(config.settings.advance_delay_ms, 900);
    }
}
