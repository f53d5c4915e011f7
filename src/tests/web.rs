use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::ServiceExt;

use crate::{tests::create_app, web};

fn test_router(seed: bool) -> Router {
    let (app, _storage) = create_app(seed);
    web::router(Arc::new(RwLock::new(app)))
}

async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn search_returns_seeds_in_requested_order() {
    let router = test_router(true);

    let (status, body) = call(&router, "POST", "/api/videos/search", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);
    assert_eq!(body[0]["id"], "seed-1");

    let (_, body) = call(
        &router,
        "POST",
        "/api/videos/search",
        Some(json!({"query": "vue", "sort": "alphabetical"})),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "seed-3");
}

#[tokio::test]
async fn create_then_delete() {
    let router = test_router(false);

    let (status, video) = call(
        &router,
        "POST",
        "/api/videos/create",
        Some(json!({
            "name": "Test",
            "description": "Desc",
            "url": "https://www.youtube.com/watch?v=abcdefghijk"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(video["playable_url"], "https://www.youtube.com/embed/abcdefghijk");

    let (_, toasts) = call(&router, "GET", "/api/toasts", None).await;
    assert_eq!(toasts[0]["kind"], "success");
    assert_eq!(toasts[0]["visible"], true);

    let (status, body) = call(
        &router,
        "POST",
        "/api/videos/delete",
        Some(json!({"id": video["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (_, body) = call(
        &router,
        "POST",
        "/api/videos/delete",
        Some(json!({"id": video["id"]})),
    )
    .await;
    assert_eq!(body["deleted"], false);
}

#[tokio::test]
async fn create_without_name_uses_preview_title() {
    let router = test_router(false);

    let (status, video) = call(
        &router,
        "POST",
        "/api/videos/create",
        Some(json!({"url": "https://youtu.be/abcdefghijk"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(video["title"], "Stub Title");
}

#[tokio::test]
async fn create_with_bad_input_is_unprocessable() {
    let router = test_router(false);

    let (status, body) = call(
        &router,
        "POST",
        "/api/videos/create",
        Some(json!({"name": "x", "url": "https://vimeo.com/1"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["url"], "Please enter a valid YouTube URL");

    let (_, body) = call(&router, "POST", "/api/videos/search", Some(json!({}))).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn watch_and_player() {
    let router = test_router(true);

    let (_, player) = call(&router, "GET", "/api/player", None).await;
    assert_eq!(player["id"], "seed-1");

    let (status, _) = call(&router, "POST", "/api/videos/watch", Some(json!({"id": "seed-4"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, player) = call(&router, "GET", "/api/player", None).await;
    assert_eq!(player["id"], "seed-4");

    let (status, _) = call(&router, "POST", "/api/videos/watch", Some(json!({"id": "nope"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn preview_endpoint() {
    let router = test_router(false);

    let (status, preview) = call(
        &router,
        "POST",
        "/api/preview",
        Some(json!({"url": "https://www.youtube.com/embed/abcdefghijk"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["video_id"], "abcdefghijk");
    assert_eq!(preview["title"], "Stub Title");

    let (status, body) = call(&router, "POST", "/api/preview", Some(json!({"url": ""}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["url"], "YouTube URL is required");
}

#[tokio::test]
async fn theme_toggle_and_set() {
    let router = test_router(false);

    let (_, body) = call(&router, "GET", "/api/theme", None).await;
    assert_eq!(body["theme"], "light");

    let (_, body) = call(&router, "POST", "/api/theme", Some(json!({}))).await;
    assert_eq!(body["theme"], "dark");

    let (_, body) = call(&router, "POST", "/api/theme", Some(json!({"theme": "dark"}))).await;
    assert_eq!(body["theme"], "dark");
}

#[tokio::test]
async fn dismiss_toast() {
    let router = test_router(true);
    call(&router, "POST", "/api/videos/delete", Some(json!({"id": "seed-1"}))).await;

    let (_, toasts) = call(&router, "GET", "/api/toasts", None).await;
    let id = toasts[0]["id"].clone();

    let (_, body) = call(&router, "POST", "/api/toasts/dismiss", Some(json!({"id": id}))).await;
    assert_eq!(body["dismissed"], true);

    let (_, toasts) = call(&router, "GET", "/api/toasts", None).await;
    assert!(toasts.as_array().unwrap().is_empty());
}
