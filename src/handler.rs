use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::api::{BookmarkQuery, ErrorResponse, HealthResponse, MessageResponse, UploadReport};
use crate::db::Database;
use crate::error::ApiError;
use crate::model::{BookmarkDraft, BookmarkUpdate};
use crate::service;
use crate::unpack_error;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

fn success<T: Serialize>(body: T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

fn bad_request(msg: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

fn not_found(msg: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

fn internal_error(msg: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

pub async fn healthcheck() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Batch upload. All-success maps to 200, partial success to 206, and total
/// failure (or an empty/malformed batch) to 400. The report always carries
/// both the accepted URLs and the per-item error messages.
pub async fn upload(
    State(state): State<AppState>,
    payload: Result<Json<Vec<BookmarkDraft>>, JsonRejection>,
) -> Response {
    let Json(drafts) = match payload {
        Ok(payload) => payload,
        Err(_) => return bad_request("invalid JSON body"),
    };

    let report = match service::upload_bookmarks(&state.db, drafts).await {
        Ok(report) => report,
        Err(e) => return bad_request(&e.to_string()),
    };

    (upload_status(&report), Json(report)).into_response()
}

fn upload_status(report: &UploadReport) -> StatusCode {
    if report.processed_urls.is_empty() && !report.errors.is_empty() {
        StatusCode::BAD_REQUEST
    } else if !report.errors.is_empty() {
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    }
}

pub async fn get_bookmarks(State(state): State<AppState>) -> Response {
    match state.db.get_all_bookmarks().await {
        Ok(bookmarks) => success(bookmarks),
        Err(e) => {
            tracing::error!(error = %unpack_error(&e), "failed to retrieve bookmarks");
            internal_error("failed to retrieve bookmarks")
        }
    }
}

pub async fn get_bookmark_by_url(
    State(state): State<AppState>,
    Query(params): Query<BookmarkQuery>,
) -> Response {
    let url = match params.url {
        Some(url) if !url.is_empty() => url,
        _ => return bad_request("URL parameter is required"),
    };

    match service::find_bookmark(&state.db, &url).await {
        Ok(bookmark) => success(bookmark),
        Err(ApiError::NotFound) => not_found("bookmark not found"),
        Err(e) => {
            tracing::error!(error = %unpack_error(&e), url = %url, "failed to retrieve bookmark");
            internal_error("failed to retrieve bookmark")
        }
    }
}

/// Full-record overwrite. The gateway does not check that the id matched a
/// row, so an update against an absent id still reports success.
pub async fn update_bookmark(
    State(state): State<AppState>,
    payload: Result<Json<BookmarkUpdate>, JsonRejection>,
) -> Response {
    let Json(update) = match payload {
        Ok(payload) => payload,
        Err(_) => return bad_request("invalid JSON body"),
    };

    if let Err(e) = service::validate_bookmark_fields(&update.url, &update.title) {
        return bad_request(&e.to_string());
    }

    match state.db.update_bookmark(&update).await {
        Ok(()) => success(MessageResponse {
            message: "bookmark updated".to_string(),
        }),
        Err(e) => {
            tracing::error!(error = %unpack_error(&e), id = update.id, "failed to update bookmark");
            internal_error("failed to update bookmark")
        }
    }
}

pub async fn delete_bookmark(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id: i64 = match id.parse() {
        Ok(id) => id,
        Err(_) => return bad_request("invalid bookmark id"),
    };

    match state.db.delete_bookmark(id).await {
        Ok(()) => success(MessageResponse {
            message: "bookmark deleted".to_string(),
        }),
        Err(e) => {
            tracing::error!(error = %unpack_error(&e), id, "failed to delete bookmark");
            internal_error("failed to delete bookmark")
        }
    }
}
