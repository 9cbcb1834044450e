//! Highscore ordering and persistence.
//!
//! The board is an ordered list of `(initials, score)` entries, descending by
//! score with ties kept in insertion order. Every mutation rewrites the whole
//! JSON file, so a restart always sees the last persisted ranking.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fs;
use thiserror::Error;

/// Errors from highscore submission.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HighscoreError {
    /// The submitted initials are not exactly two ASCII letters. Recoverable:
    /// nothing is persisted and the player may resubmit.
    #[error("initials must be exactly two letters, got {0:?}")]
    InvalidInitials(String),
}

/// Check that submitted initials are exactly two ASCII letters.
///
/// Upper and lower case are both accepted; digits, symbols, whitespace, and
/// any other length are rejected.
pub fn validate_initials(input: &str) -> bool {
    input.len() == 2 && input.chars().all(|c| c.is_ascii_alphabetic())
}

/// One persisted score: two-letter initials plus the final score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreEntry {
    pub initials: String,
    pub score: u32,
}

impl HighscoreEntry {
    /// Create an entry from validated initials.
    ///
    /// # Errors
    /// [`HighscoreError::InvalidInitials`] if the initials fail validation.
    pub fn new(initials: impl Into<String>, score: u32) -> Result<Self, HighscoreError> {
        let initials = initials.into();
        if !validate_initials(&initials) {
            return Err(HighscoreError::InvalidInitials(initials));
        }
        Ok(Self { initials, score })
    }
}

/// Persistent, ranked highscore board.
///
/// Owns the board file and an in-memory copy of the ranking. The whole board
/// is rewritten on every mutation; a missing or corrupt file degrades to an
/// empty board that is persisted immediately, so a read miss and an empty
/// board are indistinguishable after the first load.
#[derive(Debug)]
pub struct HighscoreStore {
    board_path: Utf8PathBuf,
    board: Vec<HighscoreEntry>,
}

impl HighscoreStore {
    /// Open the store backed by the given file, loading any persisted board.
    pub fn open<P: AsRef<Utf8Path>>(board_path: P) -> Result<Self> {
        let mut store = Self {
            board_path: board_path.as_ref().to_path_buf(),
            board: Vec::new(),
        };
        store.load()?;
        Ok(store)
    }

    /// Load the persisted board, reinitializing storage when it is missing
    /// or unreadable.
    pub fn load(&mut self) -> Result<()> {
        if !self.board_path.exists() {
            tracing::warn!(
                "highscore file not found at {}, initializing empty board",
                self.board_path
            );
            self.board = Vec::new();
            return self.persist();
        }

        let contents = fs::read_to_string(&self.board_path)
            .with_context(|| format!("Failed to read highscores: {}", self.board_path))?;

        match serde_json::from_str::<Vec<HighscoreEntry>>(&contents) {
            Ok(board) => {
                self.board = board;
                tracing::info!(
                    entries = self.board.len(),
                    "loaded highscores from {}",
                    self.board_path
                );
                Ok(())
            }
            Err(err) => {
                // Corrupt data is recoverable: start over with an empty board.
                tracing::warn!(
                    "corrupt highscore data in {} ({}), reinitializing",
                    self.board_path,
                    err
                );
                self.board = Vec::new();
                self.persist()
            }
        }
    }

    /// Add an entry, re-rank the board, and persist it.
    ///
    /// Initials must already be validated; construction through
    /// [`HighscoreEntry::new`] guarantees that. Ranking is descending by
    /// score; the sort is stable, so equal scores keep their insertion order.
    pub fn add(&mut self, entry: HighscoreEntry) -> Result<()> {
        debug_assert!(validate_initials(&entry.initials));

        self.board.push(entry);
        self.board.sort_by_key(|e| Reverse(e.score));
        self.persist()
    }

    /// Reset the board to empty and persist it.
    pub fn clear(&mut self) -> Result<()> {
        self.board.clear();
        tracing::info!("highscore board cleared");
        self.persist()
    }

    /// The current ranked board, best score first.
    pub fn list(&self) -> &[HighscoreEntry] {
        &self.board
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.board)
            .context("Failed to serialize highscore board")?;

        fs::write(&self.board_path, json)
            .with_context(|| format!("Failed to write highscores: {}", self.board_path))?;

        tracing::debug!(
            entries = self.board.len(),
            "persisted highscores to {}",
            self.board_path
        );
        Ok(())
    }
}
