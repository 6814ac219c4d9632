use serde::{Deserialize, Serialize};

/// A stored bookmark, as returned by every read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// One item of an upload batch. Absent fields deserialize to their empty
/// values so that a bad item produces a per-item validation error instead of
/// rejecting the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkDraft {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Full-record update payload. The id is required; everything else is
/// overwritten wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkUpdate {
    pub id: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}
