use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct BookmarkQuery {
    pub url: Option<String>,
}

/// Aggregated outcome of a batch upload. Both lists are always serialized so
/// callers can inspect partial results without probing for missing keys.
#[derive(Debug, Default, Serialize)]
pub struct UploadReport {
    pub processed_urls: Vec<String>,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}
