use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::ApplicationId;
use super::service::{RegistrationError, RegistrationService};
use crate::portal::catalog::SeminarId;
use crate::portal::directory::CurrentUser;
use crate::portal::store::RepositoryError;

/// Router builder exposing the apply/cancel/list endpoints.
pub fn registration_router(service: Arc<RegistrationService>) -> Router {
    Router::new()
        .route("/api/applications", post(apply_handler))
        .route("/api/applications/my", get(my_applications_handler))
        .route(
            "/api/applications/:application_id/cancel",
            delete(cancel_handler),
        )
        .with_state(service)
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        let status = match &self {
            RegistrationError::SeminarNotFound | RegistrationError::NotFound => {
                StatusCode::NOT_FOUND
            }
            RegistrationError::AlreadyApplied => StatusCode::CONFLICT,
            RegistrationError::SeminarClosed
            | RegistrationError::SeminarExpired
            | RegistrationError::CancelWindowClosed => StatusCode::UNPROCESSABLE_ENTITY,
            RegistrationError::Store(RepositoryError::Conflict) => StatusCode::CONFLICT,
            RegistrationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApplyRequest {
    pub(crate) seminar_id: String,
}

pub(crate) async fn apply_handler(
    State(service): State<Arc<RegistrationService>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<ApplyRequest>,
) -> Response {
    let seminar_id = SeminarId(request.seminar_id);
    match service.apply(&seminar_id, &user, Utc::now()) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn my_applications_handler(
    State(service): State<Arc<RegistrationService>>,
    CurrentUser(user): CurrentUser,
) -> Response {
    match service.list_mine(&user, Utc::now()) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn cancel_handler(
    State(service): State<Arc<RegistrationService>>,
    CurrentUser(user): CurrentUser,
    Path(application_id): Path<String>,
) -> Response {
    let id = ApplicationId(application_id);
    match service.cancel(&id, &user, Utc::now()) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "application cancelled" })),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}
