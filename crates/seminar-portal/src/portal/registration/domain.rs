use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::portal::catalog::views::SeminarView;
use crate::portal::catalog::SeminarId;
use crate::portal::directory::{UserId, UserProfile};

/// Identifier wrapper for applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Persisted application: the join between one user and one seminar.
/// Cancellation deletes the record outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub seminar_id: SeminarId,
    pub applied_at: DateTime<Utc>,
}

/// Application as returned to the applicant, with `can_cancel` recomputed at
/// read time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: ApplicationId,
    pub user: UserProfile,
    pub seminar: SeminarView,
    pub applied_at: DateTime<Utc>,
    pub can_cancel: bool,
}
