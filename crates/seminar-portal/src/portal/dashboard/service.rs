use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};

use super::views::{
    CategoryStat, DashboardStats, MonthlyStat, RecentActivities, RecentApplication, RecentSeminar,
};
use crate::portal::catalog::repository::{CategoryRepository, SeminarRepository};
use crate::portal::directory::UserRepository;
use crate::portal::registration::eligibility;
use crate::portal::registration::repository::ApplicationRepository;
use crate::portal::store::RepositoryError;

/// Number of entries in each recent-activity listing.
pub const RECENT_LIMIT: usize = 10;

/// Trailing window for the weekly application counter.
pub const WEEKLY_WINDOW_DAYS: i64 = 7;

/// Read-only aggregator over the portal stores. Never mutates anything.
pub struct DashboardService {
    seminars: Arc<dyn SeminarRepository>,
    categories: Arc<dyn CategoryRepository>,
    applications: Arc<dyn ApplicationRepository>,
    users: Arc<dyn UserRepository>,
}

impl DashboardService {
    pub fn new(
        seminars: Arc<dyn SeminarRepository>,
        categories: Arc<dyn CategoryRepository>,
        applications: Arc<dyn ApplicationRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            seminars,
            categories,
            applications,
            users,
        }
    }

    pub fn stats(&self, now: DateTime<Utc>) -> Result<DashboardStats, RepositoryError> {
        let seminars = self.seminars.list()?;

        let active_seminars = seminars
            .iter()
            .filter(|record| !record.is_closed && !eligibility::is_expired(record.date, now))
            .count();

        let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::days(1);
        let todays_seminars = seminars
            .iter()
            .filter(|record| record.date >= day_start && record.date < day_end)
            .count();

        let weekly_applications = self
            .applications
            .applied_since(now - Duration::days(WEEKLY_WINDOW_DAYS))?;

        Ok(DashboardStats {
            total_seminars: seminars.len(),
            total_users: self.users.count()?,
            total_applications: self.applications.count()?,
            total_categories: self.categories.count()?,
            active_seminars,
            todays_seminars,
            weekly_applications,
        })
    }

    /// Per-category seminar counts over the active categories.
    pub fn category_stats(&self) -> Result<Vec<CategoryStat>, RepositoryError> {
        let seminars = self.seminars.list()?;
        let categories = self.categories.list(false)?;

        Ok(categories
            .into_iter()
            .map(|category| {
                let seminar_count = seminars
                    .iter()
                    .filter(|record| record.category_id.as_ref() == Some(&category.id))
                    .count();
                CategoryStat {
                    id: category.id,
                    name: category.name,
                    color: category.color_code,
                    icon: category.icon_name,
                    seminar_count,
                }
            })
            .collect())
    }

    pub fn recent_activities(&self) -> Result<RecentActivities, RepositoryError> {
        let mut recent_seminars = Vec::with_capacity(RECENT_LIMIT);
        for record in self.seminars.list()?.into_iter().take(RECENT_LIMIT) {
            let category = match &record.category_id {
                Some(id) => self.categories.fetch(id)?,
                None => None,
            };
            recent_seminars.push(RecentSeminar {
                application_count: self.applications.count_for_seminar(&record.id)?,
                id: record.id,
                title: record.title,
                date: record.date,
                location: record.location,
                created_by: record.created_by.full_name,
                created_at: record.created_at,
                category_name: category.as_ref().map(|c| c.name.clone()),
                category_color: category.as_ref().map(|c| c.color_code.clone()),
            });
        }

        let mut recent_applications = Vec::with_capacity(RECENT_LIMIT);
        for application in self.applications.recent(RECENT_LIMIT)? {
            let user = self
                .users
                .fetch(&application.user_id)?
                .ok_or(RepositoryError::NotFound)?;
            let seminar = self
                .seminars
                .fetch(&application.seminar_id)?
                .ok_or(RepositoryError::NotFound)?;
            recent_applications.push(RecentApplication {
                id: application.id,
                user_name: user.profile.full_name,
                user_department: user.profile.department,
                seminar_title: seminar.title,
                seminar_id: seminar.id,
                applied_at: application.applied_at,
            });
        }

        Ok(RecentActivities {
            recent_seminars,
            recent_applications,
        })
    }

    /// Seminars held per (year, month), chronological.
    pub fn monthly_stats(&self) -> Result<Vec<MonthlyStat>, RepositoryError> {
        let mut buckets: BTreeMap<(i32, u32), usize> = BTreeMap::new();
        for record in self.seminars.list()? {
            *buckets
                .entry((record.date.year(), record.date.month()))
                .or_default() += 1;
        }

        Ok(buckets
            .into_iter()
            .map(|((year, month), count)| MonthlyStat { year, month, count })
            .collect())
    }
}
