use crate::models::QuizConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Name of the settings file inside the data directory.
const CONFIG_FILE: &str = "CodeQuiz Config.yaml";

/// Fixed key under which the highscore board is persisted.
const HIGHSCORES_FILE: &str = "highscores.json";

/// Configuration manager for the quiz data directory.
///
/// Owns the directory holding the YAML settings file and the highscore
/// board. The question bank is compile-time data and deliberately not
/// configurable here.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    config_path: Utf8PathBuf,
    highscores_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager rooted at the given data directory.
    ///
    /// The directory is created if it does not exist.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            config_path: config_dir.join(CONFIG_FILE),
            highscores_path: config_dir.join(HIGHSCORES_FILE),
            config_dir,
        })
    }

    /// Load the quiz configuration.
    ///
    /// # Returns
    /// The loaded [`QuizConfig`], or defaults if the file doesn't exist.
    pub fn load_config(&self) -> Result<QuizConfig> {
        if !self.config_path.exists() {
            tracing::warn!(
                "Config file not found at {}, using defaults",
                self.config_path
            );
            return Ok(QuizConfig::default());
        }

        let file_contents = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config: {}", self.config_path))?;

        let config: QuizConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse config: {}", self.config_path))?;

        tracing::info!("Loaded config from {}", self.config_path);
        Ok(config)
    }

    /// Save the quiz configuration.
    pub fn save_config(&self, config: &QuizConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize config to YAML")?;

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write config: {}", self.config_path))?;

        tracing::info!("Saved config to {}", self.config_path);
        Ok(())
    }

    /// Path of the persisted highscore board.
    pub fn highscores_path(&self) -> &Utf8Path {
        &self.highscores_path
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}
