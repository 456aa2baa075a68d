//! Session files on disk

use std::path::{Path, PathBuf};

use crate::config::SessionConfig;
use crate::error::{RecorderError, Result, ResultExt};

use super::types::Session;

/// An encoded session at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/<name>.<extension>` using the configured extension.
    pub fn in_dir(dir: impl AsRef<Path>, name: &str, config: &SessionConfig) -> Self {
        Self::new(dir.as_ref().join(session_file_name(name, config)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Encode `session` and write it, creating parent directories.
    pub fn save(&self, session: &Session) -> Result<()> {
        let bytes = session.encode()?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(RecorderError::from)
                .with_context(|| format!("Failed to create session directory {:?}", parent))?;
        }

        std::fs::write(&self.path, &bytes)
            .map_err(RecorderError::from)
            .with_context(|| format!("Failed to write session file {:?}", self.path))?;

        tracing::info!(
            "Saved session '{}' ({} frames, {} bytes) to {:?}",
            session.metadata().name,
            session.frame_count(),
            bytes.len(),
            self.path
        );
        Ok(())
    }

    /// Read and decode the session.
    pub fn load(&self) -> Result<Session> {
        let bytes = std::fs::read(&self.path)
            .map_err(RecorderError::from)
            .with_context(|| format!("Failed to read session file {:?}", self.path))?;

        let session = Session::decode(&bytes)
            .with_context(|| format!("Failed to decode session file {:?}", self.path))?;
        tracing::debug!(
            "Loaded session '{}' ({} frames) from {:?}",
            session.metadata().name,
            session.frame_count(),
            self.path
        );
        Ok(session)
    }
}

/// File name for a session called `name`: unsafe characters become `_`.
pub fn session_file_name(name: &str, config: &SessionConfig) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.is_empty() { "session".to_string() } else { stem };
    format!("{}.{}", stem, config.file_extension)
}
