use std::sync::Arc;

use chrono::Duration;

use super::service::{DashboardService, RECENT_LIMIT};
use crate::portal::catalog::domain::{CategoryId, SeminarId};
use crate::portal::directory::repository::UserRepository;
use crate::portal::registration::domain::{ApplicationId, ApplicationRecord};
use crate::portal::registration::repository::ApplicationRepository;
use crate::portal::testing::{
    admin, category_record, employee, second_employee, seminar_record, t0, MemoryApplications,
    MemoryCategories, MemorySeminars, MemoryUsers,
};

struct Fixture {
    service: DashboardService,
    applications: Arc<MemoryApplications>,
    users: Arc<MemoryUsers>,
}

fn build_dashboard() -> Fixture {
    let seminars = Arc::new(MemorySeminars::with_records(vec![
        {
            let mut record = seminar_record("sem-future", t0() + Duration::days(10));
            record.category_id = Some(CategoryId("cat-dev".to_string()));
            record
        },
        // Starts later today.
        seminar_record("sem-today", t0() + Duration::hours(4)),
        // Future but admin-closed, so not active.
        {
            let mut record = seminar_record("sem-closed", t0() + Duration::days(2));
            record.is_closed = true;
            record
        },
        {
            let mut record = seminar_record("sem-past", t0() - Duration::days(40));
            record.category_id = Some(CategoryId("cat-dev".to_string()));
            record
        },
    ]));
    let categories = Arc::new(MemoryCategories::with_records(vec![
        category_record("cat-dev", "개발", 1),
        category_record("cat-infra", "인프라", 2),
        {
            let mut record = category_record("cat-old", "구버전", 3);
            record.is_active = false;
            record
        },
    ]));
    let applications = Arc::new(MemoryApplications::default());
    let users = Arc::new(MemoryUsers::with_profiles(&[
        admin(),
        employee(),
        second_employee(),
    ]));

    let service = DashboardService::new(
        seminars,
        categories,
        applications.clone(),
        users.clone(),
    );
    Fixture {
        service,
        applications,
        users,
    }
}

fn applied(fixture: &Fixture, id: &str, user_id: &str, seminar: &str, days_ago: i64) {
    fixture
        .applications
        .insert(ApplicationRecord {
            id: ApplicationId(id.to_string()),
            user_id: crate::portal::directory::UserId(user_id.to_string()),
            seminar_id: SeminarId(seminar.to_string()),
            applied_at: t0() - Duration::days(days_ago),
        })
        .expect("seed application");
}

#[test]
fn stats_counts_totals_and_windows() {
    let fixture = build_dashboard();
    applied(&fixture, "app-1", "usr-000002", "sem-future", 1);
    applied(&fixture, "app-2", "usr-000003", "sem-future", 10);

    let stats = fixture.service.stats(t0()).expect("stats");
    assert_eq!(stats.total_seminars, 4);
    assert_eq!(stats.total_users, 3);
    assert_eq!(stats.total_applications, 2);
    assert_eq!(stats.total_categories, 3);
    // Future and not closed: sem-future and sem-today.
    assert_eq!(stats.active_seminars, 2);
    assert_eq!(stats.todays_seminars, 1);
    // Only the application from 1 day ago falls in the trailing week.
    assert_eq!(stats.weekly_applications, 1);
}

#[test]
fn category_stats_cover_active_categories_only() {
    let fixture = build_dashboard();
    let stats = fixture.service.category_stats().expect("category stats");

    let names: Vec<_> = stats.iter().map(|stat| stat.name.as_str()).collect();
    assert_eq!(names, ["개발", "인프라"]);
    assert_eq!(stats[0].seminar_count, 2);
    assert_eq!(stats[1].seminar_count, 0);
}

#[test]
fn recent_activities_denormalize_names() {
    let fixture = build_dashboard();
    applied(&fixture, "app-1", "usr-000002", "sem-future", 2);
    applied(&fixture, "app-2", "usr-000003", "sem-today", 1);

    let activities = fixture.service.recent_activities().expect("activities");
    assert_eq!(activities.recent_seminars.len(), 4);
    assert_eq!(activities.recent_seminars[0].id.0, "sem-future");
    assert_eq!(activities.recent_seminars[0].application_count, 1);
    assert_eq!(
        activities.recent_seminars[0].category_name.as_deref(),
        Some("개발")
    );

    assert_eq!(activities.recent_applications.len(), 2);
    // Most recent application first.
    assert_eq!(activities.recent_applications[0].user_name, "이대리");
    assert_eq!(
        activities.recent_applications[0].seminar_title,
        "seminar sem-today"
    );
}

#[test]
fn recent_activities_cap_at_limit() {
    let fixture = build_dashboard();
    // One application per distinct user; the uniqueness constraint forbids
    // duplicates per (user, seminar) pair.
    for index in 0..(RECENT_LIMIT + 5) {
        let user_id = format!("usr-9{index:05}");
        let mut profile = employee();
        profile.id = crate::portal::directory::UserId(user_id.clone());
        profile.username = format!("extra{index}");
        fixture
            .users
            .insert(crate::portal::directory::UserRecord {
                profile,
                password_hash: String::new(),
            })
            .expect("seed user");
        applied(&fixture, &format!("app-{index}"), &user_id, "sem-future", 0);
    }

    let activities = fixture.service.recent_activities().expect("activities");
    assert_eq!(activities.recent_applications.len(), RECENT_LIMIT);
}

#[test]
fn monthly_stats_group_chronologically() {
    let fixture = build_dashboard();
    let stats = fixture.service.monthly_stats().expect("monthly stats");

    assert!(!stats.is_empty());
    for window in stats.windows(2) {
        assert!(
            (window[0].year, window[0].month) < (window[1].year, window[1].month),
            "buckets must be chronological"
        );
    }
    let total: usize = stats.iter().map(|stat| stat.count).sum();
    assert_eq!(total, 4);
}
