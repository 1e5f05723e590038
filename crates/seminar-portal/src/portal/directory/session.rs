use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::domain::UserProfile;
use super::repository::UserRepository;
use crate::portal::store::RepositoryError;

/// Compute the stored form of a password (lowercase hex SHA-256).
pub fn hash_password(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    format!("{:x}", digest)
}

/// An issued login session: bearer token plus the resolved profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// Error raised by session operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("authentication required")]
    Unauthorized,
    #[error("administrator role required")]
    Forbidden,
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// Token-keyed map of logged-in users.
///
/// Session expiry belongs to the transport layer; the manager only issues,
/// resolves, and revokes tokens.
pub struct SessionManager {
    users: Arc<dyn UserRepository>,
    sessions: Mutex<HashMap<String, UserProfile>>,
}

impl SessionManager {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Verify credentials against the user store and issue a bearer token.
    pub fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let record = self
            .users
            .by_username(username)?
            .ok_or(AuthError::InvalidCredentials)?;

        if record.password_hash != hash_password(password) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = Uuid::new_v4().to_string();
        let session = Session {
            token: token.clone(),
            user: record.profile,
        };

        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.insert(token, session.user.clone());

        Ok(session)
    }

    /// Resolve a bearer token to the logged-in profile, if any.
    pub fn resolve(&self, token: &str) -> Option<UserProfile> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        guard.get(token).cloned()
    }

    /// Revoke a token. Returns whether a session existed.
    pub fn logout(&self, token: &str) -> bool {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.remove(token).is_some()
    }
}
