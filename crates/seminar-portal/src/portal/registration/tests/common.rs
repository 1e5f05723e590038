use std::sync::Arc;

use chrono::Duration;

use crate::portal::registration::domain::ApplicationRecord;
use crate::portal::registration::repository::ApplicationRepository;
use crate::portal::registration::service::RegistrationService;
use crate::portal::store::RepositoryError;
use crate::portal::testing::{seminar_record, t0, MemoryApplications, MemoryCategories, MemorySeminars};

pub(super) use crate::portal::testing::{admin, employee, second_employee};

/// Seminars used across the service tests, keyed by how far from `t0` they
/// start: `sem-far` is comfortably outside the 24h cutoff, `sem-near` inside
/// it, `sem-past` already over, `sem-closed` admin-closed but future.
pub(super) fn build_service() -> (
    RegistrationService,
    Arc<MemorySeminars>,
    Arc<MemoryApplications>,
) {
    let seminars = Arc::new(MemorySeminars::with_records(vec![
        seminar_record("sem-far", t0() + Duration::days(7)),
        seminar_record("sem-near", t0() + Duration::hours(3)),
        seminar_record("sem-past", t0() - Duration::hours(1)),
        {
            let mut record = seminar_record("sem-closed", t0() + Duration::days(3));
            record.is_closed = true;
            record
        },
    ]));
    let categories = Arc::new(MemoryCategories::default());
    let applications = Arc::new(MemoryApplications::default());
    let service = RegistrationService::new(
        seminars.clone(),
        categories.clone(),
        applications.clone(),
    );
    (service, seminars, applications)
}

/// Double simulating the lost race: the advisory `exists` pre-check sees
/// nothing, but the store's uniqueness constraint still fires on insert.
pub(super) struct RacyApplications {
    inner: MemoryApplications,
}

impl RacyApplications {
    pub(super) fn new() -> Self {
        Self {
            inner: MemoryApplications::default(),
        }
    }
}

impl ApplicationRepository for RacyApplications {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn remove(
        &self,
        id: &crate::portal::registration::domain::ApplicationId,
    ) -> Result<(), RepositoryError> {
        self.inner.remove(id)
    }

    fn remove_for_seminar(
        &self,
        seminar_id: &crate::portal::catalog::SeminarId,
    ) -> Result<(), RepositoryError> {
        self.inner.remove_for_seminar(seminar_id)
    }

    fn fetch(
        &self,
        id: &crate::portal::registration::domain::ApplicationId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn for_user(
        &self,
        user_id: &crate::portal::directory::UserId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.inner.for_user(user_id)
    }

    fn for_seminar(
        &self,
        seminar_id: &crate::portal::catalog::SeminarId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.inner.for_seminar(seminar_id)
    }

    fn exists(
        &self,
        _user_id: &crate::portal::directory::UserId,
        _seminar_id: &crate::portal::catalog::SeminarId,
    ) -> Result<bool, RepositoryError> {
        Ok(false)
    }

    fn count_for_seminar(
        &self,
        seminar_id: &crate::portal::catalog::SeminarId,
    ) -> Result<usize, RepositoryError> {
        self.inner.count_for_seminar(seminar_id)
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        self.inner.count()
    }

    fn applied_since(
        &self,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> Result<usize, RepositoryError> {
        self.inner.applied_since(cutoff)
    }

    fn recent(&self, limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.inner.recent(limit)
    }
}
