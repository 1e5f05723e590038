use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{CategoryDraft, CategoryId, CategoryRecord};
use super::repository::CategoryRepository;
use super::service::CatalogError;
use super::views::CategoryView;
use crate::portal::store::RepositoryError;

static CATEGORY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_category_id() -> CategoryId {
    let id = CATEGORY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CategoryId(format!("cat-{id:06}"))
}

/// Service owning category reference data. Deleting deactivates; seminars
/// keep their category reference either way.
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// Active categories, display order then name.
    pub fn list_active(&self) -> Result<Vec<CategoryView>, CatalogError> {
        let records = self.categories.list(false)?;
        Ok(records.iter().map(CategoryView::from_record).collect())
    }

    /// Every category, inactive included.
    pub fn list_all(&self) -> Result<Vec<CategoryView>, CatalogError> {
        let records = self.categories.list(true)?;
        Ok(records.iter().map(CategoryView::from_record).collect())
    }

    pub fn get(&self, id: &CategoryId) -> Result<CategoryView, CatalogError> {
        let record = self
            .categories
            .fetch(id)?
            .ok_or(CatalogError::CategoryNotFound)?;
        Ok(CategoryView::from_record(&record))
    }

    pub fn create(
        &self,
        draft: CategoryDraft,
        now: DateTime<Utc>,
    ) -> Result<CategoryView, CatalogError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::Validation("name is required".to_string()));
        }
        if self.categories.by_name(&name)?.is_some() {
            return Err(CatalogError::DuplicateName);
        }

        let record = CategoryRecord {
            id: next_category_id(),
            name,
            description: draft.description,
            icon_name: draft.icon_name,
            color_code: draft.color_code,
            display_order: draft.display_order,
            is_active: draft.is_active,
            created_at: now,
        };

        let stored = match self.categories.insert(record) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(CatalogError::DuplicateName),
            Err(other) => return Err(other.into()),
        };
        Ok(CategoryView::from_record(&stored))
    }

    pub fn update(
        &self,
        id: &CategoryId,
        draft: CategoryDraft,
    ) -> Result<CategoryView, CatalogError> {
        let mut record = self
            .categories
            .fetch(id)?
            .ok_or(CatalogError::CategoryNotFound)?;

        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::Validation("name is required".to_string()));
        }
        if record.name != name {
            if let Some(other) = self.categories.by_name(&name)? {
                if other.id != record.id {
                    return Err(CatalogError::DuplicateName);
                }
            }
        }

        record.name = name;
        record.description = draft.description;
        record.icon_name = draft.icon_name;
        record.color_code = draft.color_code;
        record.display_order = draft.display_order;
        record.is_active = draft.is_active;

        self.categories.update(record.clone())?;
        Ok(CategoryView::from_record(&record))
    }

    /// Soft delete: the category disappears from active listings only.
    pub fn deactivate(&self, id: &CategoryId) -> Result<(), CatalogError> {
        let mut record = self
            .categories
            .fetch(id)?
            .ok_or(CatalogError::CategoryNotFound)?;
        record.is_active = false;
        self.categories.update(record)?;
        Ok(())
    }
}
