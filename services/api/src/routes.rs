use crate::infra::{AppState, Services};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json, Router};
use serde_json::json;

use seminar_portal::portal::catalog::{category_router, seminar_router};
use seminar_portal::portal::dashboard::dashboard_router;
use seminar_portal::portal::directory::auth_router;
use seminar_portal::portal::registration::registration_router;

/// Compose every portal router with the operational endpoints.
pub(crate) fn portal_routes(services: &Services) -> Router {
    auth_router(services.sessions.clone())
        .merge(registration_router(services.registration.clone()))
        .merge(seminar_router(services.catalog.clone()))
        .merge(category_router(services.categories.clone()))
        .merge(dashboard_router(services.dashboard.clone()))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
