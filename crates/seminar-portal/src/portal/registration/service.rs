use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{ApplicationId, ApplicationRecord, ApplicationView};
use super::eligibility;
use super::repository::ApplicationRepository;
use crate::portal::catalog::repository::{CategoryRepository, SeminarRepository};
use crate::portal::catalog::views::SeminarView;
use crate::portal::catalog::{SeminarId, SeminarRecord};
use crate::portal::directory::UserProfile;
use crate::portal::store::RepositoryError;

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Service guarding the apply/cancel lifecycle for one (user, seminar) pair.
pub struct RegistrationService {
    seminars: Arc<dyn SeminarRepository>,
    categories: Arc<dyn CategoryRepository>,
    applications: Arc<dyn ApplicationRepository>,
}

impl RegistrationService {
    pub fn new(
        seminars: Arc<dyn SeminarRepository>,
        categories: Arc<dyn CategoryRepository>,
        applications: Arc<dyn ApplicationRepository>,
    ) -> Self {
        Self {
            seminars,
            categories,
            applications,
        }
    }

    /// Apply to a seminar. The store's uniqueness constraint backs the
    /// duplicate pre-check, so a concurrent duplicate still surfaces as
    /// `AlreadyApplied` rather than slipping through.
    pub fn apply(
        &self,
        seminar_id: &SeminarId,
        applicant: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<ApplicationView, RegistrationError> {
        let seminar = self
            .seminars
            .fetch(seminar_id)?
            .ok_or(RegistrationError::SeminarNotFound)?;

        if self.applications.exists(&applicant.id, seminar_id)? {
            return Err(RegistrationError::AlreadyApplied);
        }
        if seminar.is_closed {
            return Err(RegistrationError::SeminarClosed);
        }
        if eligibility::is_expired(seminar.date, now) {
            return Err(RegistrationError::SeminarExpired);
        }

        let record = ApplicationRecord {
            id: next_application_id(),
            user_id: applicant.id.clone(),
            seminar_id: seminar_id.clone(),
            applied_at: now,
        };

        let stored = match self.applications.insert(record) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(RegistrationError::AlreadyApplied),
            Err(other) => return Err(other.into()),
        };

        self.assemble_view(stored, &seminar, applicant.clone(), now)
    }

    /// Cancel an application. Ownership by someone else reads as `NotFound`
    /// unless the requester is an admin; the 24-hour window is enforced via
    /// the eligibility engine.
    pub fn cancel(
        &self,
        application_id: &ApplicationId,
        requester: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<(), RegistrationError> {
        let application = self
            .applications
            .fetch(application_id)?
            .ok_or(RegistrationError::NotFound)?;

        if application.user_id != requester.id && !requester.role.is_admin() {
            return Err(RegistrationError::NotFound);
        }

        let seminar = self
            .seminars
            .fetch(&application.seminar_id)?
            .ok_or(RegistrationError::SeminarNotFound)?;

        if !eligibility::can_cancel(seminar.date, now, true) {
            return Err(RegistrationError::CancelWindowClosed);
        }

        self.applications.remove(application_id)?;
        Ok(())
    }

    /// All of a user's applications, applied_at descending, with
    /// `can_cancel` recomputed at read time.
    pub fn list_mine(
        &self,
        user: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<Vec<ApplicationView>, RegistrationError> {
        let records = self.applications.for_user(&user.id)?;
        let mut views = Vec::with_capacity(records.len());
        for record in records {
            let seminar = self
                .seminars
                .fetch(&record.seminar_id)?
                .ok_or(RegistrationError::SeminarNotFound)?;
            views.push(self.assemble_view(record, &seminar, user.clone(), now)?);
        }
        Ok(views)
    }

    fn assemble_view(
        &self,
        record: ApplicationRecord,
        seminar: &SeminarRecord,
        user: UserProfile,
        now: DateTime<Utc>,
    ) -> Result<ApplicationView, RegistrationError> {
        let category = match &seminar.category_id {
            Some(id) => self.categories.fetch(id)?,
            None => None,
        };
        let application_count = self.applications.count_for_seminar(&seminar.id)?;
        let seminar_view = SeminarView::project(
            seminar,
            category.as_ref(),
            application_count,
            true,
            None,
            now,
        );
        let can_cancel = eligibility::can_cancel(seminar.date, now, true);

        Ok(ApplicationView {
            id: record.id,
            user,
            seminar: seminar_view,
            applied_at: record.applied_at,
            can_cancel,
        })
    }
}

/// Error raised by the registration service.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("seminar not found")]
    SeminarNotFound,
    #[error("application not found")]
    NotFound,
    #[error("already applied to this seminar")]
    AlreadyApplied,
    #[error("seminar is closed to new applications")]
    SeminarClosed,
    #[error("seminar date has already passed")]
    SeminarExpired,
    #[error("cancellation is only possible up to 24 hours before the seminar")]
    CancelWindowClosed,
    #[error(transparent)]
    Store(#[from] RepositoryError),
}
