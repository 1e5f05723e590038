use std::sync::Arc;

use chrono::Duration;

use crate::config::AttachmentConfig;
use crate::portal::catalog::categories::CategoryService;
use crate::portal::catalog::domain::{AttachmentUpload, SeminarDraft};
use crate::portal::catalog::service::CatalogService;
use crate::portal::testing::{
    category_record, seminar_record, t0, MemoryApplications, MemoryAttachments, MemoryCategories,
    MemorySeminars, MemoryUsers,
};

pub(super) use crate::portal::testing::{admin, employee, second_employee};

pub(super) struct CatalogFixture {
    pub(super) service: CatalogService,
    pub(super) seminars: Arc<MemorySeminars>,
    pub(super) categories: Arc<MemoryCategories>,
    pub(super) attachments: Arc<MemoryAttachments>,
    pub(super) applications: Arc<MemoryApplications>,
}

/// Catalog seeded with two categories and three seminars: `sem-future`
/// (개발), `sem-tomorrow` (uncategorized), `sem-past` (개발, already over).
pub(super) fn build_catalog() -> CatalogFixture {
    let seminars = Arc::new(MemorySeminars::with_records(vec![
        {
            let mut record = seminar_record("sem-future", t0() + Duration::days(10));
            record.title = "Rust 입문 세미나".to_string();
            record.category_id = Some(crate::portal::catalog::CategoryId("cat-dev".to_string()));
            record
        },
        seminar_record("sem-tomorrow", t0() + Duration::days(1)),
        {
            let mut record = seminar_record("sem-past", t0() - Duration::days(1));
            record.category_id = Some(crate::portal::catalog::CategoryId("cat-dev".to_string()));
            record
        },
    ]));
    let categories = Arc::new(MemoryCategories::with_records(vec![
        category_record("cat-dev", "개발", 1),
        category_record("cat-infra", "인프라", 2),
    ]));
    let attachments = Arc::new(MemoryAttachments::default());
    let applications = Arc::new(MemoryApplications::default());
    let users = Arc::new(MemoryUsers::with_profiles(&[
        admin(),
        employee(),
        second_employee(),
    ]));

    let service = CatalogService::new(
        seminars.clone(),
        categories.clone(),
        attachments.clone(),
        applications.clone(),
        users,
        AttachmentConfig::default(),
    );

    CatalogFixture {
        service,
        seminars,
        categories,
        attachments,
        applications,
    }
}

pub(super) fn build_catalog_with_limit(max_file_bytes: u64) -> CatalogFixture {
    let mut fixture = build_catalog();
    fixture.service = CatalogService::new(
        fixture.seminars.clone(),
        fixture.categories.clone(),
        fixture.attachments.clone(),
        fixture.applications.clone(),
        Arc::new(MemoryUsers::with_profiles(&[
            admin(),
            employee(),
            second_employee(),
        ])),
        AttachmentConfig { max_file_bytes },
    );
    fixture
}

pub(super) fn build_category_service() -> (CategoryService, Arc<MemoryCategories>) {
    let categories = Arc::new(MemoryCategories::with_records(vec![
        category_record("cat-dev", "개발", 1),
        category_record("cat-infra", "인프라", 2),
    ]));
    (CategoryService::new(categories.clone()), categories)
}

pub(super) fn draft(title: &str, location: &str) -> SeminarDraft {
    SeminarDraft {
        title: title.to_string(),
        description: "분기 기술 공유".to_string(),
        date: t0() + Duration::days(14),
        location: location.to_string(),
        category_id: None,
    }
}

pub(super) fn upload(name: &str, bytes: usize) -> AttachmentUpload {
    AttachmentUpload {
        file_name: name.to_string(),
        content_type: Some("application/pdf".to_string()),
        data: vec![0u8; bytes],
    }
}
