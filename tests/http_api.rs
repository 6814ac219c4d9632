use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use lesezeichen::db::Database;
use lesezeichen::handler::AppState;
use lesezeichen::routes::routes;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

async fn test_app() -> (TempDir, Arc<Database>, Router) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let db = Arc::new(
        Database::new(&dir.path().join("bookmarks.db"))
            .await
            .expect("failed to open database"),
    );
    let app = routes().with_state(AppState { db: db.clone() });
    (dir, db, app)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_endpoint_responds_ok() {
    let (_dir, _db, app) = test_app().await;

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn upload_of_valid_batch_returns_ok() {
    let (_dir, db, app) = test_app().await;

    let body = json!([
        {"url": "https://a.com", "title": "A", "tags": ["rust"]},
        {"url": "https://b.com", "title": "B"}
    ]);
    let response = app.oneshot(json_request("POST", "/upload", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(db.get_bookmark_by_url("https://a.com").await.unwrap().is_some());
    assert!(db.get_bookmark_by_url("https://b.com").await.unwrap().is_some());
}

#[tokio::test]
async fn upload_of_mixed_batch_returns_partial_content() {
    let (_dir, db, app) = test_app().await;

    let body = json!([
        {"url": "https://a.com", "title": "A"},
        {"url": "not-a-url", "title": "B"}
    ]);
    let response = app.oneshot(json_request("POST", "/upload", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert!(db.get_bookmark_by_url("https://a.com").await.unwrap().is_some());
}

#[tokio::test]
async fn upload_of_all_invalid_batch_returns_bad_request() {
    let (_dir, db, app) = test_app().await;

    let body = json!([{"url": "not-a-url", "title": "B"}]);
    let response = app.oneshot(json_request("POST", "/upload", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(db.get_all_bookmarks().await.unwrap().is_empty());
}

#[tokio::test]
async fn upload_of_empty_batch_returns_bad_request() {
    let (_dir, _db, app) = test_app().await;

    let response = app
        .oneshot(json_request("POST", "/upload", json!([])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_of_malformed_json_returns_bad_request() {
    let (_dir, _db, app) = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_bookmarks_on_empty_store_returns_ok() {
    let (_dir, _db, app) = test_app().await;

    let response = app.oneshot(get_request("/bookmarks")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn get_bookmark_without_url_param_returns_bad_request() {
    let (_dir, _db, app) = test_app().await;

    let response = app.oneshot(get_request("/bookmark")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_bookmark_for_unknown_url_returns_not_found() {
    let (_dir, _db, app) = test_app().await;

    let response = app
        .oneshot(get_request("/bookmark?url=https://missing.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_bookmark_for_stored_url_returns_ok() {
    let (_dir, _db, app) = test_app().await;

    let body = json!([{"url": "https://a.com", "title": "A"}]);
    app.clone()
        .oneshot(json_request("POST", "/upload", body))
        .await
        .unwrap();

    let response = app
        .oneshot(get_request("/bookmark?url=https://a.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_succeeds_even_when_id_matches_no_row() {
    let (_dir, _db, app) = test_app().await;

    let body = json!({
        "id": 4242,
        "url": "https://nowhere.com",
        "title": "Nowhere",
        "description": "",
        "tags": []
    });
    let response = app.oneshot(json_request("PUT", "/bookmark", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_with_invalid_fields_returns_bad_request() {
    let (_dir, _db, app) = test_app().await;

    let body = json!({"id": 1, "url": "not-a-url", "title": "A"});
    let response = app.oneshot(json_request("PUT", "/bookmark", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_without_id_returns_bad_request() {
    let (_dir, _db, app) = test_app().await;

    let body = json!({"url": "https://a.com", "title": "A"});
    let response = app.oneshot(json_request("PUT", "/bookmark", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_overwrites_a_stored_bookmark() {
    let (_dir, db, app) = test_app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/upload",
            json!([{"url": "https://a.com", "title": "A"}]),
        ))
        .await
        .unwrap();
    let stored = db.get_bookmark_by_url("https://a.com").await.unwrap().unwrap();

    let body = json!({
        "id": stored.id,
        "url": "https://a.com",
        "title": "Renamed",
        "description": "described",
        "tags": ["x"]
    });
    let response = app.oneshot(json_request("PUT", "/bookmark", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = db.get_bookmark_by_url("https://a.com").await.unwrap().unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.tags, vec!["x"]);
}

#[tokio::test]
async fn delete_with_non_numeric_id_returns_bad_request() {
    let (_dir, _db, app) = test_app().await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/bookmark/abc")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_of_missing_id_still_returns_ok() {
    let (_dir, _db, app) = test_app().await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/bookmark/4242")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn delete_removes_a_stored_bookmark() {
    let (_dir, db, app) = test_app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/upload",
            json!([{"url": "https://a.com", "title": "A"}]),
        ))
        .await
        .unwrap();
    let stored = db.get_bookmark_by_url("https://a.com").await.unwrap().unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/bookmark/{}", stored.id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(db.get_bookmark_by_url("https://a.com").await.unwrap().is_none());
}
