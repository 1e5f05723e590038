use chrono::{DateTime, Utc};

use super::domain::{ApplicationId, ApplicationRecord};
use crate::portal::catalog::SeminarId;
use crate::portal::directory::UserId;
use crate::portal::store::RepositoryError;

/// Storage abstraction for seminar applications.
///
/// The (user, seminar) uniqueness invariant lives here, not in the service:
/// `insert` must atomically reject a second active application for the same
/// pair with `Conflict`, so two concurrent applies cannot both succeed.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn remove(&self, id: &ApplicationId) -> Result<(), RepositoryError>;
    fn remove_for_seminar(&self, seminar_id: &SeminarId) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    /// A user's applications, applied_at descending.
    fn for_user(&self, user_id: &UserId) -> Result<Vec<ApplicationRecord>, RepositoryError>;
    /// A seminar's applications, applied_at descending.
    fn for_seminar(
        &self,
        seminar_id: &SeminarId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError>;
    fn exists(&self, user_id: &UserId, seminar_id: &SeminarId) -> Result<bool, RepositoryError>;
    fn count_for_seminar(&self, seminar_id: &SeminarId) -> Result<usize, RepositoryError>;
    fn count(&self) -> Result<usize, RepositoryError>;
    fn applied_since(&self, cutoff: DateTime<Utc>) -> Result<usize, RepositoryError>;
    fn recent(&self, limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}
