use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{
    AttachmentId, AttachmentRecord, AttachmentUpload, CategoryId, SeminarDraft, SeminarId,
    SeminarRecord, SeminarSearch,
};
use super::repository::{AttachmentRepository, CategoryRepository, SeminarRepository};
use super::roster;
use super::views::{AttachmentBatch, AttachmentFailure, AttachmentView, SeminarView};
use crate::config::AttachmentConfig;
use crate::portal::directory::{UserProfile, UserRepository};
use crate::portal::registration::eligibility;
use crate::portal::registration::repository::ApplicationRepository;
use crate::portal::store::RepositoryError;

static SEMINAR_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ATTACHMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_seminar_id() -> SeminarId {
    let id = SEMINAR_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SeminarId(format!("sem-{id:06}"))
}

fn next_attachment_id() -> AttachmentId {
    let id = ATTACHMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AttachmentId(format!("att-{id:06}"))
}

/// Service owning the seminar catalog: CRUD, lifecycle flags, the applicant
/// roster, and attachment handling.
pub struct CatalogService {
    seminars: Arc<dyn SeminarRepository>,
    categories: Arc<dyn CategoryRepository>,
    attachments: Arc<dyn AttachmentRepository>,
    applications: Arc<dyn ApplicationRepository>,
    users: Arc<dyn UserRepository>,
    config: AttachmentConfig,
}

impl CatalogService {
    pub fn new(
        seminars: Arc<dyn SeminarRepository>,
        categories: Arc<dyn CategoryRepository>,
        attachments: Arc<dyn AttachmentRepository>,
        applications: Arc<dyn ApplicationRepository>,
        users: Arc<dyn UserRepository>,
        config: AttachmentConfig,
    ) -> Self {
        Self {
            seminars,
            categories,
            attachments,
            applications,
            users,
            config,
        }
    }

    /// All seminars, date descending, annotated for the viewer.
    pub fn list(
        &self,
        viewer: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<Vec<SeminarView>, CatalogError> {
        let records = self.seminars.list()?;
        self.project_all(records, viewer, now)
    }

    /// Filtered listing; all criteria are conjunctive.
    pub fn search(
        &self,
        filters: &SeminarSearch,
        viewer: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<Vec<SeminarView>, CatalogError> {
        if let Some(category_id) = &filters.category_id {
            if self.categories.fetch(category_id)?.is_none() {
                return Err(CatalogError::CategoryNotFound);
            }
        }

        let keyword = filters
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_lowercase);

        let records = self
            .seminars
            .list()?
            .into_iter()
            .filter(|record| {
                if let Some(keyword) = &keyword {
                    let matches = record.title.to_lowercase().contains(keyword)
                        || record.description.to_lowercase().contains(keyword);
                    if !matches {
                        return false;
                    }
                }
                if let Some(category_id) = &filters.category_id {
                    if record.category_id.as_ref() != Some(category_id) {
                        return false;
                    }
                }
                if let Some(start) = filters.start_date {
                    if record.date < start {
                        return false;
                    }
                }
                if let Some(end) = filters.end_date {
                    if record.date > end {
                        return false;
                    }
                }
                if let Some(is_closed) = filters.is_closed {
                    if record.is_closed != is_closed {
                        return false;
                    }
                }
                true
            })
            .collect();

        self.project_all(records, viewer, now)
    }

    /// Seminars in one category, date descending.
    pub fn by_category(
        &self,
        category_id: &CategoryId,
        viewer: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<Vec<SeminarView>, CatalogError> {
        if self.categories.fetch(category_id)?.is_none() {
            return Err(CatalogError::CategoryNotFound);
        }
        let records = self
            .seminars
            .list()?
            .into_iter()
            .filter(|record| record.category_id.as_ref() == Some(category_id))
            .collect();
        self.project_all(records, viewer, now)
    }

    /// Detail view including the attachment list.
    pub fn get(
        &self,
        id: &SeminarId,
        viewer: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<SeminarView, CatalogError> {
        let record = self.seminars.fetch(id)?.ok_or(CatalogError::NotFound)?;
        let attachments = self
            .attachments
            .for_seminar(id)?
            .iter()
            .map(AttachmentView::from)
            .collect();
        self.project(&record, viewer, Some(attachments), now)
    }

    pub fn create(
        &self,
        draft: SeminarDraft,
        creator: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<SeminarView, CatalogError> {
        validate_draft(&draft)?;
        if let Some(category_id) = &draft.category_id {
            if self.categories.fetch(category_id)?.is_none() {
                return Err(CatalogError::CategoryNotFound);
            }
        }

        let record = SeminarRecord {
            id: next_seminar_id(),
            title: draft.title.trim().to_string(),
            description: draft.description,
            date: draft.date,
            location: draft.location.trim().to_string(),
            is_closed: false,
            created_by: creator.clone(),
            created_at: now,
            category_id: draft.category_id,
        };

        let stored = self.seminars.insert(record)?;
        self.project(&stored, creator, None, now)
    }

    pub fn update(
        &self,
        id: &SeminarId,
        draft: SeminarDraft,
        viewer: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<SeminarView, CatalogError> {
        validate_draft(&draft)?;
        let mut record = self.seminars.fetch(id)?.ok_or(CatalogError::NotFound)?;
        if let Some(category_id) = &draft.category_id {
            if self.categories.fetch(category_id)?.is_none() {
                return Err(CatalogError::CategoryNotFound);
            }
        }

        record.title = draft.title.trim().to_string();
        record.description = draft.description;
        record.date = draft.date;
        record.location = draft.location.trim().to_string();
        record.category_id = draft.category_id;

        self.seminars.update(record.clone())?;
        self.project(&record, viewer, None, now)
    }

    /// Remove a seminar along with its applications and attachments.
    pub fn delete(&self, id: &SeminarId) -> Result<(), CatalogError> {
        if self.seminars.fetch(id)?.is_none() {
            return Err(CatalogError::NotFound);
        }
        self.applications.remove_for_seminar(id)?;
        self.attachments.remove_for_seminar(id)?;
        self.seminars.remove(id)?;
        Ok(())
    }

    /// Force-stop new applications. Expired seminars are history and cannot
    /// change lifecycle state anymore.
    pub fn close(
        &self,
        id: &SeminarId,
        viewer: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<SeminarView, CatalogError> {
        let mut record = self.seminars.fetch(id)?.ok_or(CatalogError::NotFound)?;
        if record.is_closed {
            return Err(CatalogError::AlreadyClosed);
        }
        if eligibility::is_expired(record.date, now) {
            return Err(CatalogError::SeminarExpired);
        }
        record.is_closed = true;
        self.seminars.update(record.clone())?;
        self.project(&record, viewer, None, now)
    }

    /// Undo an admin close.
    pub fn reopen(
        &self,
        id: &SeminarId,
        viewer: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<SeminarView, CatalogError> {
        let mut record = self.seminars.fetch(id)?.ok_or(CatalogError::NotFound)?;
        if !record.is_closed {
            return Err(CatalogError::NotClosed);
        }
        if eligibility::is_expired(record.date, now) {
            return Err(CatalogError::SeminarExpired);
        }
        record.is_closed = false;
        self.seminars.update(record.clone())?;
        self.project(&record, viewer, None, now)
    }

    /// Applicant roster, applied_at descending.
    pub fn applicants(&self, id: &SeminarId) -> Result<Vec<UserProfile>, CatalogError> {
        if self.seminars.fetch(id)?.is_none() {
            return Err(CatalogError::NotFound);
        }
        let applications = self.applications.for_seminar(id)?;
        let mut applicants = Vec::with_capacity(applications.len());
        for application in applications {
            let record = self
                .users
                .fetch(&application.user_id)?
                .ok_or(CatalogError::Store(RepositoryError::NotFound))?;
            applicants.push(record.profile);
        }
        Ok(applicants)
    }

    /// Roster rendered as a UTF-8 CSV with BOM, ready for download.
    pub fn applicants_csv(&self, id: &SeminarId) -> Result<Vec<u8>, CatalogError> {
        let applicants = self.applicants(id)?;
        roster::applicants_csv(&applicants)
    }

    /// Store a batch of uploaded files. Rejected files never fail the batch
    /// and never touch the seminar; they come back in the `failed` list.
    pub fn attach(
        &self,
        seminar_id: &SeminarId,
        uploads: Vec<AttachmentUpload>,
        now: DateTime<Utc>,
    ) -> Result<AttachmentBatch, CatalogError> {
        if self.seminars.fetch(seminar_id)?.is_none() {
            return Err(CatalogError::NotFound);
        }

        let mut uploaded = Vec::new();
        let mut failed = Vec::new();

        for upload in uploads {
            if upload.file_name.trim().is_empty() {
                failed.push(AttachmentFailure {
                    file_name: upload.file_name,
                    reason: "file name is required".to_string(),
                });
                continue;
            }
            let size = upload.data.len() as u64;
            if size > self.config.max_file_bytes {
                failed.push(AttachmentFailure {
                    file_name: upload.file_name,
                    reason: format!(
                        "file exceeds the {} byte limit",
                        self.config.max_file_bytes
                    ),
                });
                continue;
            }

            let record = AttachmentRecord {
                id: next_attachment_id(),
                seminar_id: seminar_id.clone(),
                file_name: upload.file_name.clone(),
                content_type: upload.content_type,
                file_size: size,
                file_data: upload.data,
                uploaded_at: now,
            };

            match self.attachments.insert(record) {
                Ok(stored) => uploaded.push(AttachmentView::from(&stored)),
                Err(error) => failed.push(AttachmentFailure {
                    file_name: upload.file_name,
                    reason: error.to_string(),
                }),
            }
        }

        Ok(AttachmentBatch { uploaded, failed })
    }

    /// Attachment list for one seminar, uploaded_at descending.
    pub fn attachments(&self, seminar_id: &SeminarId) -> Result<Vec<AttachmentView>, CatalogError> {
        if self.seminars.fetch(seminar_id)?.is_none() {
            return Err(CatalogError::NotFound);
        }
        Ok(self
            .attachments
            .for_seminar(seminar_id)?
            .iter()
            .map(AttachmentView::from)
            .collect())
    }

    /// Full attachment record, bytes included, for the download endpoint.
    pub fn download(&self, id: &AttachmentId) -> Result<AttachmentRecord, CatalogError> {
        self.attachments
            .fetch(id)?
            .ok_or(CatalogError::AttachmentNotFound)
    }

    pub fn delete_attachment(&self, id: &AttachmentId) -> Result<(), CatalogError> {
        if self.attachments.fetch(id)?.is_none() {
            return Err(CatalogError::AttachmentNotFound);
        }
        self.attachments.remove(id)?;
        Ok(())
    }

    fn project_all(
        &self,
        records: Vec<SeminarRecord>,
        viewer: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<Vec<SeminarView>, CatalogError> {
        let mut views = Vec::with_capacity(records.len());
        for record in records {
            views.push(self.project(&record, viewer, None, now)?);
        }
        Ok(views)
    }

    fn project(
        &self,
        record: &SeminarRecord,
        viewer: &UserProfile,
        attachments: Option<Vec<AttachmentView>>,
        now: DateTime<Utc>,
    ) -> Result<SeminarView, CatalogError> {
        let category = match &record.category_id {
            Some(id) => self.categories.fetch(id)?,
            None => None,
        };
        let application_count = self.applications.count_for_seminar(&record.id)?;
        let is_user_applied = self.applications.exists(&viewer.id, &record.id)?;

        Ok(SeminarView::project(
            record,
            category.as_ref(),
            application_count,
            is_user_applied,
            attachments,
            now,
        ))
    }
}

fn validate_draft(draft: &SeminarDraft) -> Result<(), CatalogError> {
    if draft.title.trim().is_empty() {
        return Err(CatalogError::Validation("title is required".to_string()));
    }
    if draft.location.trim().is_empty() {
        return Err(CatalogError::Validation("location is required".to_string()));
    }
    Ok(())
}

/// Error raised by the catalog services.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("seminar not found")]
    NotFound,
    #[error("category not found")]
    CategoryNotFound,
    #[error("attachment not found")]
    AttachmentNotFound,
    #[error("{0}")]
    Validation(String),
    #[error("seminar is already closed")]
    AlreadyClosed,
    #[error("seminar is not closed")]
    NotClosed,
    #[error("seminar date has already passed")]
    SeminarExpired,
    #[error("category name already in use")]
    DuplicateName,
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Store(#[from] RepositoryError),
}
