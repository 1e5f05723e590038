use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::portal::catalog::{CategoryId, SeminarId};
use crate::portal::registration::ApplicationId;

/// Headline counters for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_seminars: usize,
    pub total_users: usize,
    pub total_applications: usize,
    pub total_categories: usize,
    pub active_seminars: usize,
    pub todays_seminars: usize,
    pub weekly_applications: usize,
}

/// Seminar count for one active category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub seminar_count: usize,
}

/// Recently published seminar, denormalized for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSeminar {
    pub id: SeminarId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub application_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_color: Option<String>,
}

/// Recently submitted application, denormalized for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentApplication {
    pub id: ApplicationId,
    pub user_name: String,
    pub user_department: String,
    pub seminar_title: String,
    pub seminar_id: SeminarId,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivities {
    pub recent_seminars: Vec<RecentSeminar>,
    pub recent_applications: Vec<RecentApplication>,
}

/// Seminars held per calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyStat {
    pub year: i32,
    pub month: u32,
    pub count: usize,
}
