use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use super::categories::CategoryService;
use super::domain::{
    AttachmentId, AttachmentUpload, CategoryDraft, CategoryId, SeminarDraft, SeminarId,
    SeminarSearch,
};
use super::service::{CatalogError, CatalogService};
use crate::portal::directory::{AdminUser, CurrentUser};
use crate::portal::store::RepositoryError;

/// Router builder exposing the seminar, roster, and attachment endpoints.
pub fn seminar_router(service: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/api/seminars", get(list_handler).post(create_handler))
        .route("/api/seminars/search", get(search_handler))
        .route("/api/seminars/category/:category_id", get(by_category_handler))
        .route(
            "/api/seminars/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route("/api/seminars/:id/close", put(close_handler))
        .route("/api/seminars/:id/reopen", put(reopen_handler))
        .route("/api/seminars/:id/applicants", get(applicants_handler))
        .route(
            "/api/seminars/:id/applicants/export",
            get(applicants_export_handler),
        )
        .route(
            "/api/seminars/:id/attachments",
            get(attachments_handler).post(upload_attachments_handler),
        )
        .route(
            "/api/attachments/:id/download",
            get(download_attachment_handler),
        )
        .route("/api/attachments/:id", delete(delete_attachment_handler))
        .with_state(service)
}

/// Router builder exposing the category reference-data endpoints.
pub fn category_router(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/api/categories",
            get(categories_handler).post(create_category_handler),
        )
        .route("/api/categories/admin", get(categories_admin_handler))
        .route(
            "/api/categories/:id",
            get(get_category_handler)
                .put(update_category_handler)
                .delete(delete_category_handler),
        )
        .with_state(service)
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::NotFound
            | CatalogError::CategoryNotFound
            | CatalogError::AttachmentNotFound => StatusCode::NOT_FOUND,
            CatalogError::Validation(_)
            | CatalogError::AlreadyClosed
            | CatalogError::NotClosed
            | CatalogError::SeminarExpired => StatusCode::UNPROCESSABLE_ENTITY,
            CatalogError::DuplicateName => StatusCode::CONFLICT,
            CatalogError::Store(RepositoryError::Conflict) => StatusCode::CONFLICT,
            CatalogError::Csv(_) | CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub(crate) async fn list_handler(
    State(service): State<Arc<CatalogService>>,
    CurrentUser(user): CurrentUser,
) -> Response {
    match service.list(&user, Utc::now()) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn search_handler(
    State(service): State<Arc<CatalogService>>,
    CurrentUser(user): CurrentUser,
    Query(filters): Query<SeminarSearch>,
) -> Response {
    match service.search(&filters, &user, Utc::now()) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn by_category_handler(
    State(service): State<Arc<CatalogService>>,
    CurrentUser(user): CurrentUser,
    Path(category_id): Path<String>,
) -> Response {
    match service.by_category(&CategoryId(category_id), &user, Utc::now()) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn get_handler(
    State(service): State<Arc<CatalogService>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Response {
    match service.get(&SeminarId(id), &user, Utc::now()) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn create_handler(
    State(service): State<Arc<CatalogService>>,
    AdminUser(admin): AdminUser,
    Json(draft): Json<SeminarDraft>,
) -> Response {
    match service.create(draft, &admin, Utc::now()) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn update_handler(
    State(service): State<Arc<CatalogService>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(draft): Json<SeminarDraft>,
) -> Response {
    match service.update(&SeminarId(id), draft, &admin, Utc::now()) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn delete_handler(
    State(service): State<Arc<CatalogService>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Response {
    match service.delete(&SeminarId(id)) {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn close_handler(
    State(service): State<Arc<CatalogService>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Response {
    match service.close(&SeminarId(id), &admin, Utc::now()) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn reopen_handler(
    State(service): State<Arc<CatalogService>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Response {
    match service.reopen(&SeminarId(id), &admin, Utc::now()) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn applicants_handler(
    State(service): State<Arc<CatalogService>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Response {
    match service.applicants(&SeminarId(id)) {
        Ok(applicants) => (StatusCode::OK, Json(applicants)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn applicants_export_handler(
    State(service): State<Arc<CatalogService>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Response {
    let id = SeminarId(id);
    match service.applicants_csv(&id) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    "text/csv; charset=utf-8".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}-applicants.csv\"", id.0),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn upload_attachments_handler(
    State(service): State<Arc<CatalogService>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let mut uploads = Vec::new();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_default();
                let content_type = field.content_type().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => uploads.push(AttachmentUpload {
                        file_name,
                        content_type,
                        data: bytes.to_vec(),
                    }),
                    Err(error) => {
                        let payload =
                            json!({ "error": format!("failed to read upload: {error}") });
                        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
                    }
                }
            }
            Ok(None) => break,
            Err(error) => {
                let payload = json!({ "error": format!("malformed multipart body: {error}") });
                return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
            }
        }
    }

    match service.attach(&SeminarId(id), uploads, Utc::now()) {
        Ok(batch) => (StatusCode::OK, Json(batch)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn attachments_handler(
    State(service): State<Arc<CatalogService>>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Response {
    match service.attachments(&SeminarId(id)) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn download_attachment_handler(
    State(service): State<Arc<CatalogService>>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Response {
    match service.download(&AttachmentId(id)) {
        Ok(record) => {
            let fallback = mime::APPLICATION_OCTET_STREAM;
            let content_type = record
                .content_type
                .clone()
                .unwrap_or_else(|| fallback.as_ref().to_string());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", record.file_name),
                    ),
                ],
                record.file_data,
            )
                .into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn delete_attachment_handler(
    State(service): State<Arc<CatalogService>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Response {
    match service.delete_attachment(&AttachmentId(id)) {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn categories_handler(
    State(service): State<Arc<CategoryService>>,
    CurrentUser(_user): CurrentUser,
) -> Response {
    match service.list_active() {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn categories_admin_handler(
    State(service): State<Arc<CategoryService>>,
    AdminUser(_admin): AdminUser,
) -> Response {
    match service.list_all() {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn get_category_handler(
    State(service): State<Arc<CategoryService>>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Response {
    match service.get(&CategoryId(id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn create_category_handler(
    State(service): State<Arc<CategoryService>>,
    AdminUser(_admin): AdminUser,
    Json(draft): Json<CategoryDraft>,
) -> Response {
    match service.create(draft, Utc::now()) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn update_category_handler(
    State(service): State<Arc<CategoryService>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(draft): Json<CategoryDraft>,
) -> Response {
    match service.update(&CategoryId(id), draft) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn delete_category_handler(
    State(service): State<Arc<CategoryService>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Response {
    match service.deactivate(&CategoryId(id)) {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(error) => error.into_response(),
    }
}
