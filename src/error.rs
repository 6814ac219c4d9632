use thiserror::Error;

/// Persistence failure. Opaque to API callers (mapped to a 500); the source
/// chain is kept for server-side logs.
#[derive(Debug, Error)]
#[error("storage error")]
pub struct StorageError(#[from] libsql::Error);

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing request data, rejected before any domain logic.
    #[error("{0}")]
    Input(String),
    /// A domain rule was violated. In batch uploads this becomes a per-item
    /// message rather than failing the call.
    #[error("{0}")]
    Validation(String),
    #[error("bookmark not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}
