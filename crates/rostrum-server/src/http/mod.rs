//! HTTP surface: router assembly and the server loop.

pub mod events;
pub mod render;

pub use events::{EventHub, ReloadEvent, EVENTS_PATH};

use crate::config::ServerConfig;
use crate::environment::Mode;
use crate::error::{Result, ServerError};
use crate::render::RendererFactory;
use axum::routing::get;
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Builds a renderer per request.
    pub factory: RendererFactory,
    /// Reload notification hub.
    pub hub: Arc<EventHub>,
    /// Mode the server was started in.
    pub mode: Mode,
    /// Document title for rendered pages.
    pub title: String,
}

/// Assemble the application router.
///
/// Static assets are served under `/public`. In development the reload
/// event stream is mounted as well. Every other path falls through to the
/// renderer.
pub fn router(state: AppState, public_dir: &Path) -> Router {
    let mut router: Router<AppState> =
        Router::new().nest_service("/public", ServeDir::new(public_dir));

    if !state.mode.is_production() {
        router = router.route(events::EVENTS_PATH, get(events::handle_events));
    }

    router
        .fallback(render::handle_render)
        .with_state(state)
}

/// Bind the configured address and serve until shutdown.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = config.addr(state.mode);
    let app = router(state, &config.public_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Server(format!("failed to bind {}: {}", addr, e)))?;

    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(format!("server error: {}", e)))?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
