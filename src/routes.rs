use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::handler::{self, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handler::healthcheck))
        .route("/upload", post(handler::upload))
        .route("/bookmarks", get(handler::get_bookmarks))
        .route("/bookmark", get(handler::get_bookmark_by_url))
        .route("/bookmark", put(handler::update_bookmark))
        .route("/bookmark/:id", delete(handler::delete_bookmark))
}
