//! High score ledger and the name entry screen
//!
//! The ledger is a plain text file, one `name,score` record per line,
//! best score first.

use crate::input::{InputEvent, Key};
use crate::mode::{Mode, Transition};
use crate::settings::Settings;
use ratatui::Frame;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Ledger capacity
pub const MAX_HIGH_SCORES: usize = 10;

/// Errors reading or writing the ledger file
#[derive(Debug)]
pub enum LedgerError {
    Io { path: PathBuf, source: io::Error },
    /// Line numbers are 1-based
    Parse { line: usize, reason: String },
    TooManyEntries { count: usize },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Io { path, source } => {
                write!(f, "high score file {}: {}", path.display(), source)
            }
            LedgerError::Parse { line, reason } => {
                write!(f, "high score file line {}: {}", line, reason)
            }
            LedgerError::TooManyEntries { count } => write!(
                f,
                "high score file has {} entries, at most {} allowed",
                count, MAX_HIGH_SCORES
            ),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
}

/// Bounded list of the best scores, sorted descending
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<ScoreEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Would `score` earn a place in the ledger
    pub fn is_qualifying(&self, score: u64) -> bool {
        match self.entries.last() {
            Some(lowest) if self.entries.len() >= MAX_HIGH_SCORES => score > lowest.score,
            _ => true,
        }
    }

    /// Insert a qualifying score, evicting the lowest entry when full.
    /// Returns the index of the new entry, which stays valid until the next
    /// insert.
    pub fn insert(&mut self, name: String, score: u64) -> usize {
        assert!(
            self.is_qualifying(score),
            "score {score} does not qualify for the ledger"
        );
        if self.entries.len() == MAX_HIGH_SCORES {
            self.entries.pop();
        }
        let index = self
            .entries
            .iter()
            .position(|entry| entry.score < score)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, ScoreEntry { name, score });
        index
    }

    /// Name of the entry at `index`, for in-place editing
    pub fn name_mut(&mut self, index: usize) -> &mut String {
        &mut self.entries[index].name
    }

    /// Parse the file format. Entries are sorted best first afterwards.
    pub fn parse(text: &str) -> Result<Self, LedgerError> {
        let mut entries = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line_no = number + 1;
            let line = line.trim_end_matches('\r');
            let (name, score) = line.split_once(',').ok_or_else(|| LedgerError::Parse {
                line: line_no,
                reason: "missing ',' separator".to_string(),
            })?;
            let score = score.parse::<u64>().map_err(|e| LedgerError::Parse {
                line: line_no,
                reason: format!("score {:?} is not a non-negative integer: {}", score, e),
            })?;
            entries.push(ScoreEntry {
                name: name.to_string(),
                score,
            });
        }

        if entries.len() > MAX_HIGH_SCORES {
            return Err(LedgerError::TooManyEntries {
                count: entries.len(),
            });
        }

        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(Self { entries })
    }

    /// Render in the file format
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{},{}\n", entry.name, entry.score))
            .collect()
    }

    /// Load from disk. A missing file is an empty ledger.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no high score file yet");
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(LedgerError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let ledger = Self::parse(&text)?;
        tracing::info!(path = %path.display(), entries = ledger.len(), "loaded high scores");
        Ok(ledger)
    }

    /// Rewrite the whole file, creating its directory if needed
    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        let io_err = |source| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        fs::write(path, self.to_text()).map_err(io_err)?;
        tracing::info!(path = %path.display(), entries = self.len(), "saved high scores");
        Ok(())
    }
}

/// The high score table, optionally with a name being typed
#[derive(Debug, Clone, Default)]
pub struct HighScoreScreen {
    pub ledger: Ledger,
    /// Index of the entry whose name is being typed
    typing: Option<usize>,
}

impl HighScoreScreen {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            typing: None,
        }
    }

    /// Index of the row being typed, if any
    pub fn typing(&self) -> Option<usize> {
        self.typing
    }

    pub fn is_typing(&self) -> bool {
        self.typing.is_some()
    }

    /// Add a blank-named row for `score` and start name entry
    pub fn record_new_high_score(&mut self, score: u64) {
        let index = self.ledger.insert(String::new(), score);
        tracing::info!(score, rank = index + 1, "new high score");
        self.typing = Some(index);
    }
}

impl Mode for HighScoreScreen {
    fn handle_event(&mut self, event: InputEvent) -> Transition {
        let Some(index) = self.typing else {
            return match event {
                InputEvent::Key(Key::Confirm) => Transition::ToMenu,
                _ => Transition::Stay,
            };
        };

        let name = self.ledger.name_mut(index);
        match event {
            InputEvent::Key(Key::Confirm) => {
                if !name.is_empty() {
                    self.typing = None;
                }
            }
            InputEvent::Key(Key::Backspace) => {
                name.pop();
            }
            InputEvent::Text(c) if c.is_ascii_alphabetic() => name.push(c),
            _ => {}
        }
        Transition::Stay
    }

    fn render(&self, frame: &mut Frame, _settings: &Settings) {
        crate::ui::render_high_scores(frame, self);
    }
}
