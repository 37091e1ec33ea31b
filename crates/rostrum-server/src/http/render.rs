//! The request rendering handler.
//!
//! Every request that is not a static asset or the event stream lands
//! here. The handler assembles a renderer for this one request, renders
//! the path and maps the outcome onto a status: a route miss is a 404, any
//! other failure a 500. Outside production the error body carries the
//! serialized detail; in production error bodies are empty.

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use rostrum_engine::{EngineError, RenderContext};
use serde_json::json;

use crate::environment::Mode;
use crate::http::AppState;

/// Render the requested path into a full HTML document.
pub async fn handle_render(State(app): State<AppState>, uri: Uri) -> Response {
    let mut ctx = RenderContext::new(uri.path(), app.title.as_str());
    let renderer = app.factory.create();

    match renderer.render_to_string(&mut ctx).await {
        Ok(html) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            html,
        )
            .into_response(),
        Err(err) => error_response(&err, app.mode),
    }
}

/// Map a render failure onto a response for the runtime mode.
fn error_response(err: &EngineError, mode: Mode) -> Response {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("render failed: {}", err);
    } else {
        tracing::debug!("{}", err);
    }

    if mode.is_production() {
        return status.into_response();
    }

    let detail = json!({ "error": err.to_string() }).to_string();
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        detail,
    )
        .into_response()
}
