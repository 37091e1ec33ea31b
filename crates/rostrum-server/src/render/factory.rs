//! Per-request renderer assembly.

use crate::render::store::RenderDataStore;
use rostrum_engine::{create_renderer, Renderer, RendererOptions};
use std::sync::Arc;

/// Builds a fresh renderer for every request from the store's current
/// snapshot.
///
/// Construction is cheap: the bundle and manifest are shared through
/// `Arc`s and only the template string is copied. A renderer handed out
/// before an update keeps rendering its own snapshot; the next request
/// picks up the new one.
#[derive(Clone)]
pub struct RendererFactory {
    store: Arc<RenderDataStore>,
}

impl RendererFactory {
    /// Create a factory drawing from `store`.
    pub fn new(store: Arc<RenderDataStore>) -> Self {
        Self { store }
    }

    /// Assemble a renderer from the snapshot current at this instant.
    pub fn create(&self) -> Renderer {
        let data = self.store.read();
        create_renderer(
            Arc::clone(&data.bundle),
            RendererOptions {
                template: data.template.clone(),
                manifest: Arc::clone(&data.manifest),
            },
        )
    }
}
