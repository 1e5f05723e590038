use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::domain::UserProfile;
use super::session::SessionManager;

/// Request extractor resolving the `Authorization: Bearer <token>` header
/// through the [`SessionManager`] installed as a router extension.
pub struct CurrentUser(pub UserProfile);

/// Like [`CurrentUser`] but additionally requires the admin role.
pub struct AdminUser(pub UserProfile);

/// Rejection emitted when a session is missing or lacks the required role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    Unauthorized,
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthRejection::Unauthorized => (StatusCode::UNAUTHORIZED, "authentication required"),
            AuthRejection::Forbidden => (StatusCode::FORBIDDEN, "administrator role required"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get("authorization")?.to_str().ok()?;
    header.strip_prefix("Bearer ").map(str::trim)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let manager = parts
            .extensions
            .get::<Arc<SessionManager>>()
            .ok_or(AuthRejection::Unauthorized)?;
        let token = bearer_token(parts).ok_or(AuthRejection::Unauthorized)?;
        manager
            .resolve(token)
            .map(CurrentUser)
            .ok_or(AuthRejection::Unauthorized)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(AuthRejection::Forbidden);
        }
        Ok(AdminUser(user))
    }
}
