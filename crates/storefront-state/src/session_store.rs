use std::path::{Path, PathBuf};

use storefront_core::Session;

use crate::error::StateError;
use crate::storage::{read_optional, write_atomic};

/// Persisted login session (`{ token, user }`) in a single JSON file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, or `None` if there is none or it cannot be read.
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let text = read_optional(&self.path)?;
        match serde_json::from_str::<Session>(&text) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "stored session is unreadable; treating as logged out");
                None
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`StateError`] if the session cannot be encoded or written.
    pub fn save(&self, session: &Session) -> Result<(), StateError> {
        let text = serde_json::to_string(session)?;
        write_atomic(&self.path, &text)?;
        tracing::debug!(user_id = %session.user.id, "session saved");
        Ok(())
    }

    /// Forget the stored session. Clearing an absent session is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Io`] if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), StateError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StateError::Io {
                path: self.path.display().to_string(),
                source,
            }),
        }
    }
}
