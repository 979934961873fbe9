//! Durable session state.
//!
//! Holds the bearer token together with the account identity it was issued
//! for, mirrored in memory behind a mutex and synced to a JSON file so the
//! session survives restarts. A token is never stored without a validated
//! role; files that break that rule are discarded on open.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::ApiError;
use crate::model::Role;

const SESSION_FILE: &str = "session.json";

/// A complete authenticated session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// On-disk layout. Key names match the session bucket every client of this
/// backend has used, so existing installs keep their login.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    jwt_token: String,
    user_name: String,
    user_email: String,
    user_role: Role,
}

impl From<PersistedSession> for Session {
    fn from(persisted: PersistedSession) -> Self {
        Self {
            token: persisted.jwt_token,
            name: persisted.user_name,
            email: persisted.user_email,
            role: persisted.user_role,
        }
    }
}

impl From<&Session> for PersistedSession {
    fn from(session: &Session) -> Self {
        Self {
            jwt_token: session.token.clone(),
            user_name: session.name.clone(),
            user_email: session.email.clone(),
            user_role: session.role,
        }
    }
}

/// Mutex-guarded session store backed by `<data_dir>/session.json`.
pub struct SessionStore {
    path: PathBuf,
    current: Mutex<Option<Session>>,
}

impl SessionStore {
    /// Open the store, loading a previously persisted session if one exists.
    /// A corrupt file or one carrying an unknown role is treated as no
    /// session at all.
    pub fn open(data_dir: &Path) -> Result<Self, ApiError> {
        let path = data_dir.join(SESSION_FILE);
        let current = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<PersistedSession>(&content) {
                Ok(persisted) => Some(Session::from(persisted)),
                Err(err) => {
                    warn!(
                        "Discarding unusable session file {}: {}",
                        path.display(),
                        err
                    );
                    None
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(ApiError::Session(err)),
        };
        Ok(Self {
            path,
            current: Mutex::new(current),
        })
    }

    /// Persist a session. The in-memory value is updated under the same lock,
    /// so callers observe the new token on their next request.
    pub fn save(&self, session: Session) -> Result<(), ApiError> {
        let mut current = self.current.lock();
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let persisted = PersistedSession::from(&session);
        let content = serde_json::to_string_pretty(&persisted).map_err(io::Error::other)?;
        fs::write(&self.path, content)?;
        *current = Some(session);
        Ok(())
    }

    /// Snapshot of the current session, if any.
    pub fn session(&self) -> Option<Session> {
        self.current.lock().clone()
    }

    /// Current bearer token, read fresh on every call.
    pub fn token(&self) -> Option<String> {
        self.current.lock().as_ref().map(|s| s.token.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.lock().is_some()
    }

    /// Erase the session from memory and disk. Clearing an already empty
    /// store is a no-op that still succeeds.
    pub fn clear(&self) -> Result<(), ApiError> {
        let mut current = self.current.lock();
        *current = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ApiError::Session(err)),
        }
    }
}
