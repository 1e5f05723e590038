//! In-memory store doubles and fixtures shared by the module test suites.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};

use super::catalog::domain::{
    AttachmentId, AttachmentRecord, CategoryId, CategoryRecord, SeminarId, SeminarRecord,
};
use super::catalog::repository::{AttachmentRepository, CategoryRepository, SeminarRepository};
use super::directory::{UserId, UserProfile, UserRecord, UserRepository, UserRole};
use super::registration::domain::{ApplicationId, ApplicationRecord};
use super::registration::repository::ApplicationRepository;
use super::store::RepositoryError;

pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
}

pub(crate) fn admin() -> UserProfile {
    UserProfile {
        id: UserId("usr-000001".to_string()),
        username: "admin".to_string(),
        full_name: "관리자".to_string(),
        email: "admin@company.com".to_string(),
        department: "IT서비스팀".to_string(),
        role: UserRole::Admin,
        created_at: t0() - chrono::Duration::days(30),
    }
}

pub(crate) fn employee() -> UserProfile {
    UserProfile {
        id: UserId("usr-000002".to_string()),
        username: "user".to_string(),
        full_name: "김사원".to_string(),
        email: "user@company.com".to_string(),
        department: "개발팀".to_string(),
        role: UserRole::User,
        created_at: t0() - chrono::Duration::days(30),
    }
}

pub(crate) fn second_employee() -> UserProfile {
    UserProfile {
        id: UserId("usr-000003".to_string()),
        username: "user2".to_string(),
        full_name: "이대리".to_string(),
        email: "user2@company.com".to_string(),
        department: "기획팀".to_string(),
        role: UserRole::User,
        created_at: t0() - chrono::Duration::days(20),
    }
}

pub(crate) fn seminar_record(id: &str, date: DateTime<Utc>) -> SeminarRecord {
    SeminarRecord {
        id: SeminarId(id.to_string()),
        title: format!("seminar {id}"),
        description: "quarterly knowledge sharing".to_string(),
        date,
        location: "3층 대회의실".to_string(),
        is_closed: false,
        created_by: admin(),
        created_at: t0() - chrono::Duration::days(7),
        category_id: None,
    }
}

pub(crate) fn category_record(id: &str, name: &str, display_order: i32) -> CategoryRecord {
    CategoryRecord {
        id: CategoryId(id.to_string()),
        name: name.to_string(),
        description: String::new(),
        icon_name: "school".to_string(),
        color_code: "#3B82F6".to_string(),
        display_order,
        is_active: true,
        created_at: t0() - chrono::Duration::days(14),
    }
}

#[derive(Default)]
pub(crate) struct MemoryUsers {
    records: Mutex<Vec<UserRecord>>,
}

impl MemoryUsers {
    pub(crate) fn with_profiles(profiles: &[UserProfile]) -> Self {
        let store = Self::default();
        for profile in profiles {
            store
                .insert(UserRecord {
                    profile: profile.clone(),
                    password_hash: String::new(),
                })
                .expect("seed user");
        }
        store
    }
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
pub(crate) struct MemorySeminars {
    records: Mutex<HashMap<SeminarId, SeminarRecord>>,
}

impl MemorySeminars {
    pub(crate) fn with_records(records: Vec<SeminarRecord>) -> Self {
        let store = Self::default();
        for record in records {
            store.insert(record).expect("seed seminar");
        }
        store
    }
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
pub(crate) struct MemoryCategories {
    records: Mutex<Vec<CategoryRecord>>,
}

impl MemoryCategories {
    pub(crate) fn with_records(records: Vec<CategoryRecord>) -> Self {
        let store = Self::default();
        for record in records {
            store.insert(record).expect("seed category");
        }
        store
    }
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
pub(crate) struct MemoryAttachments {
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
pub(crate) struct MemoryApplications {
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
        if guard.iter().any(|existing| existing.id == record.id) {
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
