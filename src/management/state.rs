use std::{fmt, io::Error, io::ErrorKind, path::PathBuf};

use crate::config;

/// Most moods kept in the history.
pub const MAX_HISTORY_ENTRIES: usize = 10;

#[derive(Debug)]
pub enum StoreError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "{}", e),
            StoreError::SerdeError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<Error> for StoreError {
    fn from(err: Error) -> Self {
        StoreError::IoError(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerdeError(err)
    }
}

/// Recently used moods, most recent first, without duplicates.
pub struct MoodHistory {
    path: PathBuf,
    entries: Vec<String>,
}

impl MoodHistory {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: Vec::new(),
        }
    }

    pub fn default_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("state/history.json");
        path
    }

    /// Reads the history at `path`; a missing file is an empty history.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let json = match async_fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new(path)),
            Err(e) => return Err(StoreError::IoError(e)),
        };

        let mut entries: Vec<String> = serde_json::from_str(&json)?;
        entries.truncate(MAX_HISTORY_ENTRIES);
        Ok(Self { path, entries })
    }

    /// Puts `mood` at the front. An existing identical entry is moved rather
    /// than duplicated; the oldest entry falls off past the limit.
    ///
    /// Returns `true` when the mood was not in the history before.
    pub fn add(&mut self, mood: &str) -> bool {
        let existing = self.entries.iter().position(|m| m == mood);
        if let Some(pos) = existing {
            self.entries.remove(pos);
        }

        self.entries.insert(0, mood.to_string());
        self.entries.truncate(MAX_HISTORY_ENTRIES);
        existing.is_none()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn has(&self, mood: &str) -> bool {
        self.entries.iter().any(|m| m == mood)
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub async fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::IoError(e)),
        }
    }
}
