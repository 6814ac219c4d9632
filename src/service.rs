use axum::http::Uri;

use crate::api::UploadReport;
use crate::db::Database;
use crate::error::ApiError;
use crate::model::{Bookmark, BookmarkDraft};
use crate::unpack_error;

/// Field rules shared by upload and update: the URL must be present and an
/// absolute URI, and the title must be present.
pub fn validate_bookmark_fields(url: &str, title: &str) -> Result<(), ApiError> {
    if url.is_empty() {
        return Err(ApiError::Validation("URL is required".to_string()));
    }

    let parsed = url
        .parse::<Uri>()
        .map_err(|_| ApiError::Validation("invalid URL format".to_string()))?;
    if parsed.scheme().is_none() || parsed.authority().is_none() {
        return Err(ApiError::Validation("invalid URL format".to_string()));
    }

    if title.is_empty() {
        return Err(ApiError::Validation("title is required".to_string()));
    }

    Ok(())
}

/// Looks up a bookmark by its exact URL. Absence is a NotFound error here,
/// unlike at the storage layer where it is an ordinary None.
pub async fn find_bookmark(db: &Database, url: &str) -> Result<Bookmark, ApiError> {
    match db.get_bookmark_by_url(url).await? {
        Some(bookmark) => Ok(bookmark),
        None => Err(ApiError::NotFound),
    }
}

/// Processes an upload batch item by item. A failing item records a message
/// and never aborts the rest of the batch; only an empty batch fails the call
/// as a whole. The existence check and the insert are separate statements, so
/// concurrent uploads of the same URL can still race past each other.
pub async fn upload_bookmarks(
    db: &Database,
    drafts: Vec<BookmarkDraft>,
) -> Result<UploadReport, ApiError> {
    if drafts.is_empty() {
        return Err(ApiError::Input("no URL information provided".to_string()));
    }

    let mut report = UploadReport::default();

    for draft in &drafts {
        if let Err(e) = validate_bookmark_fields(&draft.url, &draft.title) {
            report.errors.push(e.to_string());
            continue;
        }

        match db.get_bookmark_by_url(&draft.url).await {
            Ok(Some(_)) => {
                report
                    .errors
                    .push(format!("bookmark already exists: {}", draft.url));
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                report
                    .errors
                    .push(format!("failed to check existing bookmark: {}", unpack_error(&e)));
                continue;
            }
        }

        if let Err(e) = db.save_bookmark(draft).await {
            report
                .errors
                .push(format!("failed to save bookmark: {}", unpack_error(&e)));
            continue;
        }

        tracing::info!(url = %draft.url, title = %draft.title, "processed bookmark");
        report.processed_urls.push(draft.url.clone());
    }

    Ok(report)
}
