//! Read-only dashboard aggregation for administrators.

pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use router::dashboard_router;
pub use service::{DashboardService, RECENT_LIMIT, WEEKLY_WINDOW_DAYS};
pub use views::{
    CategoryStat, DashboardStats, MonthlyStat, RecentActivities, RecentApplication, RecentSeminar,
};
