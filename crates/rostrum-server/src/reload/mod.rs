//! Hot reload wiring.
//!
//! Outside production the server keeps its render inputs live: a
//! [`TemplateWatcher`] signals template edits, and one [`CompilerProcess`]
//! per configured compiler streams compile results. The
//! [`HotReloadCoordinator`] consumes those streams, publishes updated
//! inputs into the [`RenderDataStore`] and notifies connected browsers
//! through the event hub. A compile that failed, or whose artifact cannot
//! be read or parsed, never replaces the last good inputs.

pub mod compiler;
pub mod template;

pub use compiler::{
    ArtifactSource, CompileEvent, CompilerProcess, DirArtifacts, MemoryArtifacts,
};
pub use template::TemplateWatcher;

use crate::config::{CLIENT_MANIFEST, SERVER_BUNDLE};
use crate::http::{EventHub, ReloadEvent};
use crate::render::{RenderDataStore, RenderDataUpdate};
use rostrum_engine::{ClientManifest, ServerBundle};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Applies reload signals to the render data store.
pub struct HotReloadCoordinator {
    store: Arc<RenderDataStore>,
    hub: Arc<EventHub>,
    template_path: PathBuf,
}

impl HotReloadCoordinator {
    pub fn new(
        store: Arc<RenderDataStore>,
        hub: Arc<EventHub>,
        template_path: PathBuf,
    ) -> Self {
        Self {
            store,
            hub,
            template_path,
        }
    }

    /// Consume template change signals until the watcher is dropped.
    pub fn spawn_template(self: &Arc<Self>, mut rx: mpsc::Receiver<()>) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                coordinator.handle_template_change().await;
            }
        })
    }

    /// Consume server compile events until the compiler stream ends.
    pub fn spawn_server_compiles(
        self: &Arc<Self>,
        mut rx: mpsc::Receiver<CompileEvent>,
    ) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                coordinator.handle_server_compile(event).await;
            }
        })
    }

    /// Consume client compile events until the compiler stream ends.
    pub fn spawn_client_compiles(
        self: &Arc<Self>,
        mut rx: mpsc::Receiver<CompileEvent>,
    ) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                coordinator.handle_client_compile(event).await;
            }
        })
    }

    /// Re-read the template and publish it.
    ///
    /// A file that momentarily cannot be read (editors replace files in
    /// several steps) is logged and skipped; the next change signal tries
    /// again.
    pub async fn handle_template_change(&self) {
        match tokio::fs::read_to_string(&self.template_path).await {
            Ok(template) => {
                self.store.update(RenderDataUpdate::template(template));
                self.hub.broadcast(&ReloadEvent::TemplateChanged).await;
                tracing::info!("template updated");
            }
            Err(e) => {
                tracing::warn!(
                    "template changed but could not be read from {}: {}",
                    self.template_path.display(),
                    e
                );
            }
        }
    }

    /// Publish the server bundle from a finished compile.
    pub async fn handle_server_compile(&self, event: CompileEvent) {
        if !self.accept(&event, "server") {
            return;
        }
        let bytes = match event.output.read(SERVER_BUNDLE).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("server compile finished but {} is unreadable: {}", SERVER_BUNDLE, e);
                return;
            }
        };
        match ServerBundle::from_slice(&bytes) {
            Ok(bundle) => {
                self.store.update(RenderDataUpdate::bundle(bundle));
                self.hub.broadcast(&ReloadEvent::BundleUpdated).await;
                tracing::info!("server bundle updated");
            }
            Err(e) => {
                tracing::warn!("ignoring malformed {}: {}", SERVER_BUNDLE, e);
            }
        }
    }

    /// Publish the client manifest from a finished compile.
    pub async fn handle_client_compile(&self, event: CompileEvent) {
        if !self.accept(&event, "client") {
            return;
        }
        let bytes = match event.output.read(CLIENT_MANIFEST).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("client compile finished but {} is unreadable: {}", CLIENT_MANIFEST, e);
                return;
            }
        };
        match ClientManifest::from_slice(&bytes) {
            Ok(manifest) => {
                self.store.update(RenderDataUpdate::manifest(manifest));
                self.hub.broadcast(&ReloadEvent::ManifestUpdated).await;
                tracing::info!("client manifest updated");
            }
            Err(e) => {
                tracing::warn!("ignoring malformed {}: {}", CLIENT_MANIFEST, e);
            }
        }
    }

    /// Log the compile outcome; true when its outputs may be used.
    fn accept(&self, event: &CompileEvent, which: &str) -> bool {
        for warning in &event.warnings {
            tracing::warn!("{} compiler: {}", which, warning);
        }
        if !event.is_clean() {
            for error in &event.errors {
                tracing::error!("{} compiler: {}", which, error);
            }
            tracing::warn!("{} compile failed, keeping last good inputs", which);
            return false;
        }
        true
    }
}
