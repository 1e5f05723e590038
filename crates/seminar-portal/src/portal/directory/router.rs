use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::extract::CurrentUser;
use super::session::{AuthError, SessionManager};

/// Router builder exposing the login/logout/me endpoints.
pub fn auth_router(manager: Arc<SessionManager>) -> Router {
    Router::new()
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/me", get(me_handler))
        .with_state(manager)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

pub(crate) async fn login_handler(
    State(manager): State<Arc<SessionManager>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    match manager.login(&request.username, &request.password) {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(AuthError::InvalidCredentials) => {
            let payload = json!({ "error": AuthError::InvalidCredentials.to_string() });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn logout_handler(
    State(manager): State<Arc<SessionManager>>,
    headers: HeaderMap,
) -> Response {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    let revoked = token.map(|token| manager.logout(token)).unwrap_or(false);
    (StatusCode::OK, Json(json!({ "success": revoked }))).into_response()
}

pub(crate) async fn me_handler(CurrentUser(user): CurrentUser) -> Response {
    (StatusCode::OK, Json(user)).into_response()
}
