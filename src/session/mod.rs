//! Process-wide session state.
//!
//! The session is three strings (token, user id, role) persisted under fixed
//! keys. Screens read them on mount; nothing is pushed to them when the
//! session changes.

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Local persistence failure
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("session storage is corrupt: {0}")]
    Corrupt(String),
}

/// Fixed storage keys for the session values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKey {
    Token,
    UserId,
    Role,
}

impl SessionKey {
    pub const ALL: [SessionKey; 3] = [SessionKey::Token, SessionKey::UserId, SessionKey::Role];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::Token => "token",
            SessionKey::UserId => "userId",
            SessionKey::Role => "role",
        }
    }
}

/// Coarse authorization flag returned by the backend at login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    JobSeeker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::JobSeeker => "JobSeeker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "JobSeeker" => Ok(Role::JobSeeker),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Snapshot of the stored session values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub role: Option<Role>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Session store over a key-value backend
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Session kept only in memory, lost when the process exits
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    /// Persist all three values in a single backend write
    pub fn save(&self, token: &str, user_id: &str, role: Role) -> Result<(), StorageError> {
        self.backend.set_many(&[
            (SessionKey::Token.as_str(), token),
            (SessionKey::UserId.as_str(), user_id),
            (SessionKey::Role.as_str(), role.as_str()),
        ])?;
        tracing::debug!(user_id, role = %role, "session saved");
        Ok(())
    }

    /// Read one value. A missing key is `Ok(None)`, never an error.
    pub fn read(&self, key: SessionKey) -> Result<Option<String>, StorageError> {
        self.backend.get(key.as_str())
    }

    /// Remove every session key (logout)
    pub fn clear(&self) -> Result<(), StorageError> {
        let keys: Vec<&str> = SessionKey::ALL.iter().map(|k| k.as_str()).collect();
        self.backend.remove_many(&keys)?;
        tracing::debug!("session cleared");
        Ok(())
    }

    pub fn token(&self) -> Result<Option<String>, StorageError> {
        self.read(SessionKey::Token)
    }

    /// Stored role; an unrecognised role string reads back as `None`
    pub fn role(&self) -> Result<Option<Role>, StorageError> {
        Ok(self.read(SessionKey::Role)?.and_then(|r| r.parse().ok()))
    }

    pub fn session(&self) -> Result<Session, StorageError> {
        Ok(Session {
            token: self.token()?,
            user_id: self.read(SessionKey::UserId)?,
            role: self.role()?,
        })
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}
