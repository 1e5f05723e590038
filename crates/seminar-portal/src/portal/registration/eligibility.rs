//! Pure eligibility rules for the application lifecycle.
//!
//! Every view and every guard in the apply/cancel path goes through these
//! functions; nothing else in the portal compares seminar dates.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Cancellation closes this many hours before the seminar starts.
pub const CANCEL_CUTOFF_HOURS: i64 = 24;

/// Whether the seminar's start instant has passed.
pub fn is_expired(seminar_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    seminar_date < now
}

/// Whether a new application may be created.
pub fn can_apply(
    seminar_date: DateTime<Utc>,
    is_closed: bool,
    now: DateTime<Utc>,
    has_active_application: bool,
) -> bool {
    !is_closed && !is_expired(seminar_date, now) && !has_active_application
}

/// Whether an existing application may still be cancelled.
///
/// The admin closed flag is deliberately absent: closing stops new
/// applications but does not trap existing applicants. The boundary is
/// inclusive; exactly [`CANCEL_CUTOFF_HOURS`] ahead still cancels.
pub fn can_cancel(
    seminar_date: DateTime<Utc>,
    now: DateTime<Utc>,
    has_active_application: bool,
) -> bool {
    has_active_application
        && !is_expired(seminar_date, now)
        && seminar_date - now >= Duration::hours(CANCEL_CUTOFF_HOURS)
}

/// Display state of a seminar for a particular viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeminarStatus {
    Expired,
    Closed,
    AlreadyApplied,
    Open,
}

impl SeminarStatus {
    /// Badge text shown by the portal UI.
    pub const fn label(self) -> &'static str {
        match self {
            SeminarStatus::Expired => "종료",
            SeminarStatus::Closed => "마감",
            SeminarStatus::AlreadyApplied => "신청완료",
            SeminarStatus::Open => "신청가능",
        }
    }
}

/// Status precedence: Expired > Closed > AlreadyApplied > Open.
///
/// An expired seminar reads as history even when an admin closed it first;
/// a closed-but-future seminar stays distinguishable from one that ended.
pub fn status(
    seminar_date: DateTime<Utc>,
    is_closed: bool,
    now: DateTime<Utc>,
    has_active_application: bool,
) -> SeminarStatus {
    if is_expired(seminar_date, now) {
        SeminarStatus::Expired
    } else if is_closed {
        SeminarStatus::Closed
    } else if has_active_application {
        SeminarStatus::AlreadyApplied
    } else {
        SeminarStatus::Open
    }
}
