//! Durable "latest conversation" record.
//!
//! One JSON file holds the most recent conversation. It is read once when a
//! conversation is continued and fully overwritten after every successful
//! exchange.

use crate::core::conversation::{Conversation, ConversationError};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

pub const LATEST_FILE_NAME: &str = "latest.json";

#[derive(Debug)]
pub enum StoreError {
    Read {
        path: PathBuf,
        source: io::Error,
    },
    Write {
        path: PathBuf,
        source: io::Error,
    },
    /// The file exists and is non-empty but does not hold a conversation.
    Malformed {
        path: PathBuf,
        source: ConversationError,
    },
    Serialize(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Read { path, source } => {
                write!(f, "Failed to read conversation at {}: {source}", path.display())
            }
            StoreError::Write { path, source } => {
                write!(f, "Failed to save conversation to {}: {source}", path.display())
            }
            StoreError::Malformed { path, source } => {
                write!(f, "{source} (file: {})", path.display())
            }
            StoreError::Serialize(source) => {
                write!(f, "Failed to serialize conversation: {source}")
            }
        }
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StoreError::Read { source, .. } | StoreError::Write { source, .. } => Some(source),
            StoreError::Malformed { source, .. } => Some(source),
            StoreError::Serialize(source) => Some(source),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversationStore {
    path: PathBuf,
}

impl ConversationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted at `data_dir/latest.json`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(LATEST_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved conversation. A missing or blank file yields `Ok(None)`.
    pub fn load(&self) -> Result<Option<Conversation>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved conversation");
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let conversation =
            Conversation::load(&raw).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            path = %self.path.display(),
            messages = conversation.as_ref().map_or(0, Conversation::len),
            "Loaded saved conversation"
        );
        Ok(conversation)
    }

    /// Replace the saved conversation. The write goes through a temp file in
    /// the same directory so a crash never leaves a half-written record.
    pub fn save(&self, conversation: &Conversation) -> Result<(), StoreError> {
        let contents = conversation.to_json().map_err(StoreError::Serialize)?;
        let write_error = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let parent = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());
        if let Some(dir) = parent {
            fs::create_dir_all(dir).map_err(write_error)?;
        }

        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(write_error)?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(write_error)?;
        temp_file.as_file_mut().sync_all().map_err(write_error)?;
        temp_file
            .persist(&self.path)
            .map_err(|err| write_error(err.error))?;

        debug!(
            path = %self.path.display(),
            messages = conversation.len(),
            "Saved conversation"
        );
        Ok(())
    }
}
