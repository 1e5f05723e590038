use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::portal::directory::UserProfile;

/// Identifier wrapper for seminars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeminarId(pub String);

/// Identifier wrapper for categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub String);

/// Identifier wrapper for file attachments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttachmentId(pub String);

/// Persisted seminar. The application count is derived at read time from the
/// application store and never appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeminarRecord {
    pub id: SeminarId,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub is_closed: bool,
    pub created_by: UserProfile,
    pub created_at: DateTime<Utc>,
    pub category_id: Option<CategoryId>,
}

/// Fields accepted when creating or updating a seminar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeminarDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// Filters for the seminar search endpoint. All criteria are conjunctive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeminarSearch {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_closed: Option<bool>,
}

/// Persisted category reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub icon_name: String,
    pub color_code: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating or updating a category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_name: String,
    #[serde(default)]
    pub color_code: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Persisted attachment, bytes included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRecord {
    pub id: AttachmentId,
    pub seminar_id: SeminarId,
    pub file_name: String,
    pub content_type: Option<String>,
    pub file_size: u64,
    pub file_data: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
}

/// One file received by the upload endpoint, before validation.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}
