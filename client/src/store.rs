//! Session cache stores
//!
//! Sessions are expensive to mint (a user-mediated signature each), so they
//! are cached keyed by `(identity, scope)`. The in-memory store backs tests
//! and embedded use; the JSON file store is what the CLI persists across
//! runs.

use crate::errors::SessionError;
use crate::session::{AuthorizationSession, SessionKey};
use crate::SessionResult;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Keyed cache of authorization sessions
pub trait SessionStore: Send + Sync {
    /// Load a cached session, if any
    fn load(&self, key: &SessionKey) -> SessionResult<Option<AuthorizationSession>>;

    /// Persist a session under its key, replacing any previous one
    fn save(&self, key: &SessionKey, session: &AuthorizationSession) -> SessionResult<()>;

    /// Drop a cached session
    fn remove(&self, key: &SessionKey) -> SessionResult<()>;
}

/// Process-local session cache
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionKey, AuthorizationSession>>,
}

impl InMemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached sessions
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, key: &SessionKey) -> SessionResult<Option<AuthorizationSession>> {
        Ok(self.sessions.read().get(key).cloned())
    }

    fn save(&self, key: &SessionKey, session: &AuthorizationSession) -> SessionResult<()> {
        self.sessions.write().insert(*key, session.clone());
        Ok(())
    }

    fn remove(&self, key: &SessionKey) -> SessionResult<()> {
        self.sessions.write().remove(key);
        Ok(())
    }
}

/// One-file-per-session JSON store
pub struct JsonFileSessionStore {
    dir: PathBuf,
}

impl JsonFileSessionStore {
    /// Create a store rooted at `dir`, creating it if needed
    pub fn new(dir: PathBuf) -> SessionResult<Self> {
        fs::create_dir_all(&dir).map_err(|e| SessionError::Store(e.to_string()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &SessionKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.to_hex()))
    }
}

impl SessionStore for JsonFileSessionStore {
    fn load(&self, key: &SessionKey) -> SessionResult<Option<AuthorizationSession>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| SessionError::Store(e.to_string()))?;
        let session =
            serde_json::from_str(&content).map_err(|e| SessionError::Store(e.to_string()))?;
        Ok(Some(session))
    }

    fn save(&self, key: &SessionKey, session: &AuthorizationSession) -> SessionResult<()> {
        let content = serde_json::to_string_pretty(session)
            .map_err(|e| SessionError::Store(e.to_string()))?;
        fs::write(self.path_for(key), content).map_err(|e| SessionError::Store(e.to_string()))
    }

    fn remove(&self, key: &SessionKey) -> SessionResult<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path).map_err(|e| SessionError::Store(e.to_string()))?;
        }
        Ok(())
    }
}
