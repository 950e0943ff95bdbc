//! Session storage helpers
//!
//! Handles reading and writing session records to disk, one directory per
//! session.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::{FrameworkError, FrameworkResult};

use super::session::Session;

/// Default directory for session storage
const SESSIONS_DIR: &str = "sessions";

/// Session storage manager
#[derive(Debug, Clone)]
pub struct SessionStorage {
    base_dir: PathBuf,
}

impl SessionStorage {
    /// Create a new session storage with the default directory
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from(SESSIONS_DIR),
        }
    }

    /// Create a new session storage with a custom directory
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: dir.into(),
        }
    }

    /// Get the directory path for a session
    pub fn session_dir(&self, session_id: &str) -> FrameworkResult<PathBuf> {
        validate_session_id(session_id)?;
        Ok(self.base_dir.join(session_id))
    }

    /// Get the record file path for a session
    pub fn session_path(&self, session_id: &str) -> FrameworkResult<PathBuf> {
        Ok(self.session_dir(session_id)?.join("session.json"))
    }

    /// Save a session record, replacing any previous one
    ///
    /// The record is written to a temporary file first and renamed into
    /// place, so readers never observe a half-written record.
    pub fn save(&self, session: &Session) -> FrameworkResult<()> {
        let dir = self.session_dir(&session.id)?;
        fs::create_dir_all(&dir)?;

        let tmp_path = dir.join("session.json.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, session)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, dir.join("session.json"))?;

        Ok(())
    }

    /// Load a session record
    pub fn load(&self, session_id: &str) -> FrameworkResult<Session> {
        let path = self.session_path(session_id)?;

        if !path.exists() {
            return Err(FrameworkError::SessionNotFound(session_id.to_string()));
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let session: Session = serde_json::from_reader(reader)?;

        Ok(session)
    }

    /// Check if a session exists
    pub fn session_exists(&self, session_id: &str) -> bool {
        self.session_path(session_id)
            .map(|p| p.exists())
            .unwrap_or(false)
    }

    /// List all session IDs
    pub fn list_sessions(&self) -> FrameworkResult<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut sessions = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                if let Some(name_str) = path.file_name().and_then(|n| n.to_str()) {
                    if self.session_exists(name_str) {
                        sessions.push(name_str.to_string());
                    }
                }
            }
        }

        Ok(sessions)
    }

    /// Delete a session
    pub fn delete_session(&self, session_id: &str) -> FrameworkResult<()> {
        let dir = self.session_dir(session_id)?;
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        Ok(())
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl Default for SessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Session IDs become directory names
fn validate_session_id(session_id: &str) -> FrameworkResult<()> {
    if session_id.is_empty()
        || session_id == "."
        || session_id == ".."
        || session_id.contains(['/', '\\'])
    {
        return Err(FrameworkError::other(format!(
            "invalid session id: {:?}",
            session_id
        )));
    }
    Ok(())
}
