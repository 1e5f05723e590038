use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;

use seminar_portal::config::AttachmentConfig;
use seminar_portal::error::AppError;
use seminar_portal::portal::catalog::{
    AttachmentId, AttachmentRecord, AttachmentRepository, CatalogService, CategoryDraft,
    CategoryId, CategoryRecord, CategoryRepository, CategoryService, SeminarDraft, SeminarId,
    SeminarRecord, SeminarRepository,
};
use seminar_portal::portal::dashboard::DashboardService;
use seminar_portal::portal::directory::{
    hash_password, SessionManager, UserId, UserProfile, UserRecord, UserRepository, UserRole,
};
use seminar_portal::portal::registration::{
    ApplicationId, ApplicationRecord, ApplicationRepository, RegistrationService,
};
use seminar_portal::portal::store::RepositoryError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
pub(crate) struct InMemoryUserStore {
    records: Mutex<Vec<UserRecord>>,
}

impl UserRepository for InMemoryUserStore {
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
pub(crate) struct InMemorySeminarStore {
    records: Mutex<HashMap<SeminarId, SeminarRecord>>,
}

impl SeminarRepository for InMemorySeminarStore {
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
pub(crate) struct InMemoryCategoryStore {
    records: Mutex<Vec<CategoryRecord>>,
}

impl CategoryRepository for InMemoryCategoryStore {
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
pub(crate) struct InMemoryAttachmentStore {
    records: Mutex<Vec<AttachmentRecord>>,
}

impl AttachmentRepository for InMemoryAttachmentStore {
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
pub(crate) struct InMemoryApplicationStore {
    records: Mutex<Vec<ApplicationRecord>>,
}

impl ApplicationRepository for InMemoryApplicationStore {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        // One lock acquisition covers the (user, seminar) uniqueness check
        // and the insert, which is the atomicity the apply path relies on.
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

/// Concrete stores backing one portal process.
pub(crate) struct Stores {
    pub(crate) users: Arc<InMemoryUserStore>,
    pub(crate) seminars: Arc<InMemorySeminarStore>,
    pub(crate) categories: Arc<InMemoryCategoryStore>,
    pub(crate) attachments: Arc<InMemoryAttachmentStore>,
    pub(crate) applications: Arc<InMemoryApplicationStore>,
}

impl Stores {
    pub(crate) fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUserStore::default()),
            seminars: Arc::new(InMemorySeminarStore::default()),
            categories: Arc::new(InMemoryCategoryStore::default()),
            attachments: Arc::new(InMemoryAttachmentStore::default()),
            applications: Arc::new(InMemoryApplicationStore::default()),
        }
    }
}

/// Library services wired onto the concrete stores.
pub(crate) struct Services {
    pub(crate) sessions: Arc<SessionManager>,
    pub(crate) registration: Arc<RegistrationService>,
    pub(crate) catalog: Arc<CatalogService>,
    pub(crate) categories: Arc<CategoryService>,
    pub(crate) dashboard: Arc<DashboardService>,
}

pub(crate) fn build_services(stores: &Stores, attachments: AttachmentConfig) -> Services {
    Services {
        sessions: Arc::new(SessionManager::new(stores.users.clone())),
        registration: Arc::new(RegistrationService::new(
            stores.seminars.clone(),
            stores.categories.clone(),
            stores.applications.clone(),
        )),
        catalog: Arc::new(CatalogService::new(
            stores.seminars.clone(),
            stores.categories.clone(),
            stores.attachments.clone(),
            stores.applications.clone(),
            stores.users.clone(),
            attachments,
        )),
        categories: Arc::new(CategoryService::new(stores.categories.clone())),
        dashboard: Arc::new(DashboardService::new(
            stores.seminars.clone(),
            stores.categories.clone(),
            stores.applications.clone(),
            stores.users.clone(),
        )),
    }
}

fn demo_user(
    id: &str,
    username: &str,
    full_name: &str,
    department: &str,
    role: UserRole,
    now: DateTime<Utc>,
) -> UserProfile {
    UserProfile {
        id: UserId(id.to_string()),
        username: username.to_string(),
        full_name: full_name.to_string(),
        email: format!("{username}@company.com"),
        department: department.to_string(),
        role,
        created_at: now,
    }
}

fn category_draft(name: &str, icon: &str, color: &str, order: i32) -> CategoryDraft {
    CategoryDraft {
        name: name.to_string(),
        description: String::new(),
        icon_name: icon.to_string(),
        color_code: color.to_string(),
        display_order: order,
        is_active: true,
    }
}

/// Seed the demo accounts, categories, and seminar catalog the portal has
/// always shipped with (admin/admin123, user/user123).
pub(crate) fn seed_demo_data(stores: &Stores, services: &Services) -> Result<(), AppError> {
    let now = Utc::now();

    let admin = demo_user(
        "usr-000001",
        "admin",
        "관리자",
        "IT서비스팀",
        UserRole::Admin,
        now,
    );
    stores.users.insert(UserRecord {
        profile: admin.clone(),
        password_hash: hash_password("admin123"),
    })?;
    stores.users.insert(UserRecord {
        profile: demo_user(
            "usr-000002",
            "user",
            "김사원",
            "개발팀",
            UserRole::User,
            now,
        ),
        password_hash: hash_password("user123"),
    })?;

    let development = services
        .categories
        .create(category_draft("개발", "code", "#3B82F6", 1), now)?;
    let infrastructure = services
        .categories
        .create(category_draft("인프라", "cloud", "#10B981", 2), now)?;
    let ai_data = services
        .categories
        .create(category_draft("AI/데이터", "psychology", "#8B5CF6", 3), now)?;
    services
        .categories
        .create(category_draft("커리어", "school", "#F59E0B", 4), now)?;

    let schedule: [(&str, &str, i64, Option<&CategoryId>); 9] = [
        (
            "Spring Boot 3.x 신기능 소개",
            "신규 릴리스의 주요 변경점을 정리합니다",
            3,
            Some(&development.id),
        ),
        (
            "React 18 업데이트 및 새로운 기능",
            "동시성 렌더링과 신규 훅을 다룹니다",
            7,
            Some(&development.id),
        ),
        (
            "데이터베이스 최적화 전략",
            "실행 계획과 인덱스 설계 사례",
            10,
            Some(&infrastructure.id),
        ),
        (
            "Docker & Kubernetes 실무 활용",
            "배포 파이프라인 구성 실습",
            14,
            Some(&infrastructure.id),
        ),
        (
            "클린 코드와 리팩토링",
            "레거시 개선 패턴 워크숍",
            17,
            Some(&development.id),
        ),
        (
            "AI 개발 동향과 ChatGPT API 활용",
            "사내 적용 사례 공유",
            21,
            Some(&ai_data.id),
        ),
        ("Git Advanced 워크플로우", "리베이스와 릴리스 브랜치 전략", 24, None),
        (
            "REST API 설계 원칙",
            "리소스 모델링과 버저닝",
            -7,
            Some(&development.id),
        ),
        (
            "테스트 주도 개발(TDD) 실습",
            "레드-그린-리팩터 사이클 실습",
            -14,
            Some(&development.id),
        ),
    ];

    let mut first_future: Option<SeminarId> = None;
    for (title, description, offset_days, category) in schedule {
        let view = services.catalog.create(
            SeminarDraft {
                title: title.to_string(),
                description: description.to_string(),
                date: now + Duration::days(offset_days),
                location: "3층 대회의실".to_string(),
                category_id: category.cloned(),
            },
            &admin,
            now,
        )?;
        if offset_days > 0 && first_future.is_none() {
            first_future = Some(view.id);
        }
    }

    // One seminar is shipped admin-closed so the lifecycle states are all
    // visible on first login.
    if let Some(id) = first_future {
        services.catalog.close(&id, &admin, now)?;
    }

    Ok(())
}
