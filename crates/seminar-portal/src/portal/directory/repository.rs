use serde::{Deserialize, Serialize};

use super::domain::{UserId, UserProfile};
use crate::portal::store::RepositoryError;

/// Stored user: public profile plus the credential hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub profile: UserProfile,
    pub password_hash: String,
}

/// Storage abstraction for directory accounts.
pub trait UserRepository: Send + Sync {
    /// Usernames are unique; inserting a duplicate returns `Conflict`.
    fn insert(&self, record: UserRecord) -> Result<UserRecord, RepositoryError>;
    fn fetch(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError>;
    fn by_username(&self, username: &str) -> Result<Option<UserRecord>, RepositoryError>;
    fn count(&self) -> Result<usize, RepositoryError>;
}
