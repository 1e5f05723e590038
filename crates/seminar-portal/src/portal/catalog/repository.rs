use super::domain::{
    AttachmentId, AttachmentRecord, CategoryId, CategoryRecord, SeminarId, SeminarRecord,
};
use crate::portal::store::RepositoryError;

/// Storage abstraction for seminars.
pub trait SeminarRepository: Send + Sync {
    fn insert(&self, record: SeminarRecord) -> Result<SeminarRecord, RepositoryError>;
    fn update(&self, record: SeminarRecord) -> Result<(), RepositoryError>;
    fn remove(&self, id: &SeminarId) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SeminarId) -> Result<Option<SeminarRecord>, RepositoryError>;
    /// All seminars, date descending.
    fn list(&self) -> Result<Vec<SeminarRecord>, RepositoryError>;
    fn count(&self) -> Result<usize, RepositoryError>;
}

/// Storage abstraction for category reference data.
pub trait CategoryRepository: Send + Sync {
    /// Names are unique; inserting a duplicate returns `Conflict`.
    fn insert(&self, record: CategoryRecord) -> Result<CategoryRecord, RepositoryError>;
    fn update(&self, record: CategoryRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CategoryId) -> Result<Option<CategoryRecord>, RepositoryError>;
    fn by_name(&self, name: &str) -> Result<Option<CategoryRecord>, RepositoryError>;
    /// Categories ordered by display order, then name. Inactive entries are
    /// included only when requested.
    fn list(&self, include_inactive: bool) -> Result<Vec<CategoryRecord>, RepositoryError>;
    fn count(&self) -> Result<usize, RepositoryError>;
}

/// Storage abstraction for seminar attachments.
pub trait AttachmentRepository: Send + Sync {
    fn insert(&self, record: AttachmentRecord) -> Result<AttachmentRecord, RepositoryError>;
    fn remove(&self, id: &AttachmentId) -> Result<(), RepositoryError>;
    fn remove_for_seminar(&self, seminar_id: &SeminarId) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AttachmentId) -> Result<Option<AttachmentRecord>, RepositoryError>;
    /// Attachments for one seminar, uploaded_at descending.
    fn for_seminar(&self, seminar_id: &SeminarId) -> Result<Vec<AttachmentRecord>, RepositoryError>;
}
