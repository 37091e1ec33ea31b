//! Integration tests for the HTTP rendering surface.
//!
//! Tests drive the render handler with real request URIs and verify the
//! status mapping and body shape in development and production modes.

mod helpers;

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::Response;
use rostrum_engine::ServerBundle;
use rostrum_server::environment::Mode;
use rostrum_server::http::render::handle_render;
use rostrum_server::render::RenderDataUpdate;
use std::sync::Arc;

async fn request(state: &rostrum_server::http::AppState, path: &str) -> Response {
    let uri: Uri = path.parse().unwrap();
    handle_render(State(state.clone()), uri).await
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_renders_a_complete_document() {
    let (_dir, config) = helpers::site();
    let store = helpers::loaded_store(&config).await;
    let state = helpers::app_state(store, Mode::Development);

    let response = request(&state, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/html; charset=utf-8"
    );

    let html = body_text(response).await;
    assert!(html.contains("<title>test site</title>"));
    assert!(html.contains("<h1>Ballots</h1>"));
    assert!(html.contains("<p>welcome</p>"));
    // Home publishes state, so the hydration payload is present.
    assert!(html.contains("window.__INITIAL_STATE__"));
    assert!(html.contains("/public/runtime.js"));
}

#[tokio::test]
async fn test_route_parameters_reach_the_page() {
    let (_dir, config) = helpers::site();
    let store = helpers::loaded_store(&config).await;
    let state = helpers::app_state(store, Mode::Development);

    let response = request(&state, "/ballots/42").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("<article class=\"ballot\">42</article>"));
    // The ballot page is stateless; nothing to hydrate.
    assert!(!html.contains("__INITIAL_STATE__"));
}

#[tokio::test]
async fn test_unmatched_path_is_404_with_detail_in_development() {
    let (_dir, config) = helpers::site();
    let store = helpers::loaded_store(&config).await;
    let state = helpers::app_state(store, Mode::Development);

    let response = request(&state, "/no/such/page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_text(response).await;
    assert!(body.contains("error"));
    assert!(body.contains("/no/such/page"));
}

#[tokio::test]
async fn test_unmatched_path_is_404_with_empty_body_in_production() {
    let (_dir, config) = helpers::site();
    let store = helpers::loaded_store(&config).await;
    let state = helpers::app_state(store, Mode::Production);

    let response = request(&state, "/no/such/page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.is_empty());
}

#[tokio::test]
async fn test_render_failure_is_500_with_detail_only_in_development() -> anyhow::Result<()> {
    let (_dir, config) = helpers::site();
    let store = helpers::loaded_store(&config).await;

    // Swap in a page whose binding cannot resolve.
    let broken = ServerBundle::from_slice(
        br#"{
            "routes": [{ "path": "/", "page": "home" }],
            "pages": { "home": { "tree": { "bind": "missing.value" } } }
        }"#,
    )?;
    store.update(RenderDataUpdate::bundle(broken));

    let dev = helpers::app_state(Arc::clone(&store), Mode::Development);
    let response = request(&dev, "/").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert!(body.contains("missing.value"));

    let prod = helpers::app_state(store, Mode::Production);
    let response = request(&prod, "/").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_store_update_lands_on_the_next_request() -> anyhow::Result<()> {
    let (_dir, config) = helpers::site();
    let store = helpers::loaded_store(&config).await;
    let state = helpers::app_state(Arc::clone(&store), Mode::Development);

    let before = body_text(request(&state, "/").await).await;
    assert!(before.contains("<h1>Ballots</h1>"));

    let replacement = ServerBundle::from_slice(
        br#"{
            "routes": [{ "path": "/", "page": "home" }],
            "pages": { "home": { "tree": { "el": "h1", "children": [{ "text": "Recount" }] } } }
        }"#,
    )?;
    store.update(RenderDataUpdate::bundle(replacement));

    let after = body_text(request(&state, "/").await).await;
    assert!(after.contains("<h1>Recount</h1>"));
    Ok(())
}

#[tokio::test]
async fn test_query_strings_do_not_break_route_matching() {
    let (_dir, config) = helpers::site();
    let store = helpers::loaded_store(&config).await;
    let state = helpers::app_state(store, Mode::Development);

    let response = request(&state, "/ballots/7?tab=results").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(">7</article>"));
}
