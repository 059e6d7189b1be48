//! Session persistence.
//!
//! The session manager mirrors the signed-in user and token here so that a
//! restarted shell (or a second shell sharing the config dir) picks the
//! session back up. The user is kept as raw JSON: decoding it into a typed
//! user is the session manager's job, and a record that no longer decodes is
//! its signal to clear the session.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::resolve_config_path;

/// Environment variable controlling the session file location.
pub const SESSION_PATH_ENV: &str = "LMS_SESSION_PATH";

/// Default filename for the persisted session.
pub const SESSION_FILE_NAME: &str = "session.json";

/// Errors surfaced by session store operations.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// I/O failure while reading or writing the session file.
    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Raw persisted session: both halves must be present for a session to count.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(rename = "lms-session", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
    #[serde(rename = "lms-token", default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl StoredSession {
    /// Returns the user record and token when both are present.
    pub fn complete(&self) -> Option<(&Value, &str)> {
        match (&self.user, &self.token) {
            (Some(user), Some(token)) if !token.is_empty() => Some((user, token.as_str())),
            _ => None,
        }
    }
}

/// Shared trait implemented by session persistence backends.
pub trait SessionStore: Send + Sync {
    /// Read the currently persisted session.
    fn load(&self) -> Result<StoredSession, SessionStoreError>;

    /// Replace the persisted session.
    fn save(&self, user: Value, token: &str) -> Result<(), SessionStoreError>;

    /// Remove both the user record and the token.
    fn clear(&self) -> Result<(), SessionStoreError>;
}

/// JSON-backed session store persisted on disk.
pub struct JsonSessionStore {
    path: PathBuf,
    session: Mutex<StoredSession>,
}

impl JsonSessionStore {
    /// Create a store at the provided path (or the default path when omitted).
    pub fn new<P: Into<Option<PathBuf>>>(path: P) -> Result<Self, SessionStoreError> {
        let resolved_path = match path.into() {
            Some(path) => path,
            None => resolve_config_path(SESSION_PATH_ENV, SESSION_FILE_NAME),
        };
        let session = read_session_file(&resolved_path)?;
        Ok(Self {
            path: resolved_path,
            session: Mutex::new(session),
        })
    }

    /// Access the underlying session path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_locked(&self, session: &StoredSession) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SessionStore for JsonSessionStore {
    fn load(&self) -> Result<StoredSession, SessionStoreError> {
        // Re-read from disk: another process may have signed in or out.
        let fresh = read_session_file(&self.path)?;
        let mut session = self.session.lock().expect("session lock poisoned");
        *session = fresh.clone();
        Ok(fresh)
    }

    fn save(&self, user: Value, token: &str) -> Result<(), SessionStoreError> {
        let mut session = self.session.lock().expect("session lock poisoned");
        session.user = Some(user);
        session.token = Some(token.to_string());
        self.save_locked(&session)
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        let mut session = self.session.lock().expect("session lock poisoned");
        *session = StoredSession::default();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(SessionStoreError::Io(error)),
        }
    }
}

/// In-memory session store primarily used for unit testing.
#[derive(Default)]
pub struct InMemorySessionStore {
    session: Mutex<StoredSession>,
}

impl InMemorySessionStore {
    /// Create an empty in-memory session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an arbitrary (possibly malformed) session.
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Result<StoredSession, SessionStoreError> {
        Ok(self.session.lock().expect("session lock poisoned").clone())
    }

    fn save(&self, user: Value, token: &str) -> Result<(), SessionStoreError> {
        let mut session = self.session.lock().expect("session lock poisoned");
        session.user = Some(user);
        session.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        *self.session.lock().expect("session lock poisoned") = StoredSession::default();
        Ok(())
    }
}

fn read_session_file(path: &Path) -> Result<StoredSession, SessionStoreError> {
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<StoredSession>(&content) {
            Ok(session) => Ok(session),
            Err(error) => {
                warn!("Failed to parse session file at {}: {}", path.display(), error);
                Ok(StoredSession::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(StoredSession::default()),
        Err(error) => Err(SessionStoreError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn incomplete_session_is_not_complete() {
        let session = StoredSession {
            user: Some(json!({ "id": "u1" })),
            token: None,
        };
        assert!(session.complete().is_none());
    }

    #[test]
    fn json_store_persists_and_clears() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);
        let store = JsonSessionStore::new(Some(path.clone())).unwrap();
        store.save(json!({ "id": "u1" }), "mock-token-u1-1").unwrap();
        drop(store);

        let reloaded = JsonSessionStore::new(Some(path.clone())).unwrap();
        let session = reloaded.load().unwrap();
        let (user, token) = session.complete().expect("complete session");
        assert_eq!(user["id"], json!("u1"));
        assert_eq!(token, "mock-token-u1-1");

        reloaded.clear().unwrap();
        assert!(!path.exists());
        assert!(reloaded.load().unwrap().complete().is_none());
    }

    #[test]
    fn load_sees_changes_made_by_another_writer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);
        let reader = JsonSessionStore::new(Some(path.clone())).unwrap();
        let writer = JsonSessionStore::new(Some(path.clone())).unwrap();
        writer.save(json!({ "id": "u2" }), "t").unwrap();
        assert!(reader.load().unwrap().complete().is_some());
    }

    #[test]
    fn invalid_json_yields_empty_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);
        fs::write(&path, "{").unwrap();
        let store = JsonSessionStore::new(Some(path)).unwrap();
        assert_eq!(store.load().unwrap(), StoredSession::default());
    }
}
