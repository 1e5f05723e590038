use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{
    AttachmentId, AttachmentRecord, CategoryId, CategoryRecord, SeminarId, SeminarRecord,
};
use crate::portal::directory::UserProfile;
use crate::portal::registration::eligibility::{self, SeminarStatus};

/// Wire representation of an attachment (bytes omitted).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentView {
    pub id: AttachmentId,
    pub file_name: String,
    pub content_type: Option<String>,
    pub file_size: u64,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&AttachmentRecord> for AttachmentView {
    fn from(record: &AttachmentRecord) -> Self {
        Self {
            id: record.id.clone(),
            file_name: record.file_name.clone(),
            content_type: record.content_type.clone(),
            file_size: record.file_size,
            uploaded_at: record.uploaded_at,
        }
    }
}

/// Wire representation of a category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub icon_name: String,
    pub color_code: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seminar_count: Option<usize>,
}

impl CategoryView {
    pub fn from_record(record: &CategoryRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            icon_name: record.icon_name.clone(),
            color_code: record.color_code.clone(),
            display_order: record.display_order,
            is_active: record.is_active,
            created_at: record.created_at,
            seminar_count: None,
        }
    }
}

/// Seminar as rendered for a particular viewer: the raw admin flag plus the
/// eligibility engine's computed state, never a conflation of the two.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeminarView {
    pub id: SeminarId,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub is_closed: bool,
    pub status: SeminarStatus,
    pub status_label: &'static str,
    pub created_by: UserProfile,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryView>,
    pub application_count: usize,
    pub is_user_applied: bool,
    pub can_cancel: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<AttachmentView>>,
}

impl SeminarView {
    /// Assemble the view, running the eligibility engine exactly once.
    pub fn project(
        record: &SeminarRecord,
        category: Option<&CategoryRecord>,
        application_count: usize,
        is_user_applied: bool,
        attachments: Option<Vec<AttachmentView>>,
        now: DateTime<Utc>,
    ) -> Self {
        let status = eligibility::status(record.date, record.is_closed, now, is_user_applied);
        let can_cancel = eligibility::can_cancel(record.date, now, is_user_applied);

        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            date: record.date,
            location: record.location.clone(),
            is_closed: record.is_closed,
            status,
            status_label: status.label(),
            created_by: record.created_by.clone(),
            created_at: record.created_at,
            category: category.map(CategoryView::from_record),
            application_count,
            is_user_applied,
            can_cancel,
            attachments,
        }
    }
}

/// Outcome of a multi-file attachment upload; successes and failures are
/// reported side by side instead of rolling the batch back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentBatch {
    pub uploaded: Vec<AttachmentView>,
    pub failed: Vec<AttachmentFailure>,
}

/// A single rejected file and the reason it was rejected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentFailure {
    pub file_name: String,
    pub reason: String,
}
