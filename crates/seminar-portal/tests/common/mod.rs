//! Shared harness for the integration suites: in-memory implementations of
//! every store trait, seeded demo data, and a fully wired router.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use seminar_portal::config::AttachmentConfig;
use seminar_portal::portal::catalog::{
    category_router, seminar_router, AttachmentId, AttachmentRecord, AttachmentRepository,
    CategoryId, CategoryRecord, CategoryRepository, CategoryService, CatalogService, SeminarId,
    SeminarRecord, SeminarRepository,
};
use seminar_portal::portal::dashboard::{dashboard_router, DashboardService};
use seminar_portal::portal::directory::{
    auth_router, hash_password, SessionManager, UserId, UserProfile, UserRecord, UserRepository,
    UserRole,
};
use seminar_portal::portal::registration::{
    registration_router, ApplicationId, ApplicationRecord, ApplicationRepository,
    RegistrationService,
};
use seminar_portal::portal::store::RepositoryError;

// Route handlers read the wall clock, so every fixture date is anchored to
// `Utc::now()` instead of a pinned instant.

#[derive(Default)]
pub struct MemoryUsers {
    records: Mutex<Vec<UserRecord>>,
}

impl UserRepository for MemoryUsers {
    fn insert(&self, record: UserRecord) -> Result<UserRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("user mutex poisoned");
        if guard
            .iter()
            .any(|existing| existing.profile.username == record.profile.username)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        let guard = self.records.lock().expect("user mutex poisoned");
        Ok(guard.iter().find(|record| &record.profile.id == id).cloned())
    }

    fn by_username(&self, username: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let guard = self.records.lock().expect("user mutex poisoned");
        Ok(guard
            .iter()
            .find(|record| record.profile.username == username)
            .cloned())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("user mutex poisoned");
        Ok(guard.len())
    }
}

#[derive(Default)]
pub struct MemorySeminars {
    records: Mutex<HashMap<SeminarId, SeminarRecord>>,
}

impl SeminarRepository for MemorySeminars {
    fn insert(&self, record: SeminarRecord) -> Result<SeminarRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("seminar mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SeminarRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("seminar mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn remove(&self, id: &SeminarId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("seminar mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: &SeminarId) -> Result<Option<SeminarRecord>, RepositoryError> {
        let guard = self.records.lock().expect("seminar mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<SeminarRecord>, RepositoryError> {
        let guard = self.records.lock().expect("seminar mutex poisoned");
        let mut records: Vec<_> = guard.values().cloned().collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("seminar mutex poisoned");
        Ok(guard.len())
    }
}

#[derive(Default)]
pub struct MemoryCategories {
    records: Mutex<Vec<CategoryRecord>>,
}

impl CategoryRepository for MemoryCategories {
    fn insert(&self, record: CategoryRecord) -> Result<CategoryRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("category mutex poisoned");
        if guard.iter().any(|existing| existing.name == record.name) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: CategoryRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("category mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &CategoryId) -> Result<Option<CategoryRecord>, RepositoryError> {
        let guard = self.records.lock().expect("category mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn by_name(&self, name: &str) -> Result<Option<CategoryRecord>, RepositoryError> {
        let guard = self.records.lock().expect("category mutex poisoned");
        Ok(guard.iter().find(|record| record.name == name).cloned())
    }

    fn list(&self, include_inactive: bool) -> Result<Vec<CategoryRecord>, RepositoryError> {
        let guard = self.records.lock().expect("category mutex poisoned");
        let mut records: Vec<_> = guard
            .iter()
            .filter(|record| include_inactive || record.is_active)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(records)
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("category mutex poisoned");
        Ok(guard.len())
    }
}

#[derive(Default)]
pub struct MemoryAttachments {
    records: Mutex<Vec<AttachmentRecord>>,
}

impl AttachmentRepository for MemoryAttachments {
    fn insert(&self, record: AttachmentRecord) -> Result<AttachmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("attachment mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn remove(&self, id: &AttachmentId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("attachment mutex poisoned");
        let before = guard.len();
        guard.retain(|record| &record.id != id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn remove_for_seminar(&self, seminar_id: &SeminarId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("attachment mutex poisoned");
        guard.retain(|record| &record.seminar_id != seminar_id);
        Ok(())
    }

    fn fetch(&self, id: &AttachmentId) -> Result<Option<AttachmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("attachment mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn for_seminar(
        &self,
        seminar_id: &SeminarId,
    ) -> Result<Vec<AttachmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("attachment mutex poisoned");
        let mut records: Vec<_> = guard
            .iter()
            .filter(|record| &record.seminar_id == seminar_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(records)
    }
}

#[derive(Default)]
pub struct MemoryApplications {
    records: Mutex<Vec<ApplicationRecord>>,
}

impl ApplicationRepository for MemoryApplications {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        // One lock acquisition covers the uniqueness check and the insert.
        let mut guard = self.records.lock().expect("application mutex poisoned");
        if guard.iter().any(|existing| {
            existing.user_id == record.user_id && existing.seminar_id == record.seminar_id
        }) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn remove(&self, id: &ApplicationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        let before = guard.len();
        guard.retain(|record| &record.id != id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn remove_for_seminar(&self, seminar_id: &SeminarId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        guard.retain(|record| &record.seminar_id != seminar_id);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn for_user(&self, user_id: &UserId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        let mut records: Vec<_> = guard
            .iter()
            .filter(|record| &record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(records)
    }

    fn for_seminar(
        &self,
        seminar_id: &SeminarId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        let mut records: Vec<_> = guard
            .iter()
            .filter(|record| &record.seminar_id == seminar_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(records)
    }

    fn exists(&self, user_id: &UserId, seminar_id: &SeminarId) -> Result<bool, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard
            .iter()
            .any(|record| &record.user_id == user_id && &record.seminar_id == seminar_id))
    }

    fn count_for_seminar(&self, seminar_id: &SeminarId) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| &record.seminar_id == seminar_id)
            .count())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard.len())
    }

    fn applied_since(&self, cutoff: DateTime<Utc>) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.applied_at >= cutoff)
            .count())
    }

    fn recent(&self, limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        let mut records: Vec<_> = guard.iter().cloned().collect();
        records.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        records.truncate(limit);
        Ok(records)
    }
}

/// Everything an integration scenario needs: seeded stores, services, the
/// session manager, and the composed router.
pub struct TestPortal {
    pub router: axum::Router,
    pub sessions: Arc<SessionManager>,
    pub registration: Arc<RegistrationService>,
    pub catalog: Arc<CatalogService>,
    pub dashboard: Arc<DashboardService>,
    pub users: Arc<MemoryUsers>,
    pub seminars: Arc<MemorySeminars>,
    pub categories: Arc<MemoryCategories>,
    pub attachments: Arc<MemoryAttachments>,
    pub applications: Arc<MemoryApplications>,
    pub admin: UserProfile,
    pub employee: UserProfile,
}

fn profile(id: &str, username: &str, full_name: &str, department: &str, role: UserRole) -> UserProfile {
    UserProfile {
        id: UserId(id.to_string()),
        username: username.to_string(),
        full_name: full_name.to_string(),
        email: format!("{username}@company.com"),
        department: department.to_string(),
        role,
        created_at: Utc::now() - Duration::days(30),
    }
}

pub fn seminar(id: &str, title: &str, date: DateTime<Utc>, admin: &UserProfile) -> SeminarRecord {
    SeminarRecord {
        id: SeminarId(id.to_string()),
        title: title.to_string(),
        description: "사내 기술 세미나".to_string(),
        date,
        location: "3층 대회의실".to_string(),
        is_closed: false,
        created_by: admin.clone(),
        created_at: Utc::now() - Duration::days(7),
        category_id: None,
    }
}

/// Build a portal seeded with the two demo accounts and two future seminars
/// (`sem-far` outside the cancel window, `sem-near` inside it).
pub fn build_portal() -> TestPortal {
    let admin = profile("usr-000001", "admin", "관리자", "IT서비스팀", UserRole::Admin);
    let employee = profile("usr-000002", "user", "김사원", "개발팀", UserRole::User);

    let users = Arc::new(MemoryUsers::default());
    users
        .insert(UserRecord {
            profile: admin.clone(),
            password_hash: hash_password("admin123"),
        })
        .expect("seed admin");
    users
        .insert(UserRecord {
            profile: employee.clone(),
            password_hash: hash_password("user123"),
        })
        .expect("seed employee");

    let seminars = Arc::new(MemorySeminars::default());
    seminars
        .insert(seminar(
            "sem-far",
            "Rust 입문 세미나",
            Utc::now() + Duration::days(7),
            &admin,
        ))
        .expect("seed seminar");
    seminars
        .insert(seminar(
            "sem-near",
            "데이터베이스 최적화 전략",
            Utc::now() + Duration::hours(3),
            &admin,
        ))
        .expect("seed seminar");

    let categories = Arc::new(MemoryCategories::default());
    let attachments = Arc::new(MemoryAttachments::default());
    let applications = Arc::new(MemoryApplications::default());

    let sessions = Arc::new(SessionManager::new(users.clone()));
    let registration = Arc::new(RegistrationService::new(
        seminars.clone(),
        categories.clone(),
        applications.clone(),
    ));
    let catalog = Arc::new(CatalogService::new(
        seminars.clone(),
        categories.clone(),
        attachments.clone(),
        applications.clone(),
        users.clone(),
        AttachmentConfig::default(),
    ));
    let category_service = Arc::new(CategoryService::new(categories.clone()));
    let dashboard = Arc::new(DashboardService::new(
        seminars.clone(),
        categories.clone(),
        applications.clone(),
        users.clone(),
    ));

    let router = auth_router(sessions.clone())
        .merge(registration_router(registration.clone()))
        .merge(seminar_router(catalog.clone()))
        .merge(category_router(category_service))
        .merge(dashboard_router(dashboard.clone()))
        .layer(axum::Extension(sessions.clone()));

    TestPortal {
        router,
        sessions,
        registration,
        catalog,
        dashboard,
        users,
        seminars,
        categories,
        attachments,
        applications,
        admin,
        employee,
    }
}

impl TestPortal {
    pub fn login(&self, username: &str, password: &str) -> String {
        self.sessions
            .login(username, password)
            .expect("login succeeds")
            .token
    }
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub async fn read_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}
