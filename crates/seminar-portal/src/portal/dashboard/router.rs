use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use super::service::DashboardService;
use crate::portal::directory::AdminUser;
use crate::portal::store::RepositoryError;

/// Router builder exposing the admin dashboard queries.
pub fn dashboard_router(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/dashboard/stats", get(stats_handler))
        .route("/api/dashboard/category-stats", get(category_stats_handler))
        .route(
            "/api/dashboard/recent-activities",
            get(recent_activities_handler),
        )
        .route("/api/dashboard/monthly-stats", get(monthly_stats_handler))
        .with_state(service)
}

fn store_error_response(error: RepositoryError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}

pub(crate) async fn stats_handler(
    State(service): State<Arc<DashboardService>>,
    AdminUser(_admin): AdminUser,
) -> Response {
    match service.stats(Utc::now()) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => store_error_response(error),
    }
}

pub(crate) async fn category_stats_handler(
    State(service): State<Arc<DashboardService>>,
    AdminUser(_admin): AdminUser,
) -> Response {
    match service.category_stats() {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => store_error_response(error),
    }
}

pub(crate) async fn recent_activities_handler(
    State(service): State<Arc<DashboardService>>,
    AdminUser(_admin): AdminUser,
) -> Response {
    match service.recent_activities() {
        Ok(activities) => (StatusCode::OK, Json(activities)).into_response(),
        Err(error) => store_error_response(error),
    }
}

pub(crate) async fn monthly_stats_handler(
    State(service): State<Arc<DashboardService>>,
    AdminUser(_admin): AdminUser,
) -> Response {
    match service.monthly_stats() {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => store_error_response(error),
    }
}
