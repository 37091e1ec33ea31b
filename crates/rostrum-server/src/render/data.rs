//! Render input snapshots and loading.

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use rostrum_engine::{ClientManifest, ServerBundle};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// The three inputs a renderer is assembled from.
///
/// A snapshot is immutable once published; updates build a new snapshot
/// instead of mutating this one. The bundle and manifest sit behind `Arc`s
/// so cloning a snapshot never copies parsed artifacts.
#[derive(Debug, Clone)]
pub struct RenderData {
    /// Page template source.
    pub template: String,
    /// Client build manifest.
    pub manifest: Arc<ClientManifest>,
    /// Server bundle.
    pub bundle: Arc<ServerBundle>,
}

impl RenderData {
    /// Read all three inputs from disk.
    ///
    /// Any missing or malformed input is fatal here. A server that cannot
    /// render anything should fail at startup, not serve errors.
    pub async fn load(config: &ServerConfig) -> Result<Self> {
        let template = fs::read_to_string(&config.template)
            .await
            .map_err(|source| ServerError::Artifact {
                path: config.template.clone(),
                source,
            })?;
        let bundle = load_bundle(&config.bundle_path()).await?;
        let manifest = load_manifest(&config.manifest_path()).await?;

        Ok(Self {
            template,
            manifest: Arc::new(manifest),
            bundle: Arc::new(bundle),
        })
    }
}

/// A partial update to the render inputs.
///
/// Unset fields keep their current value when the update is applied, so a
/// template edit does not disturb the bundle and a recompile does not
/// disturb the template.
#[derive(Debug, Clone, Default)]
pub struct RenderDataUpdate {
    /// Replacement page template.
    pub template: Option<String>,
    /// Replacement client manifest.
    pub manifest: Option<Arc<ClientManifest>>,
    /// Replacement server bundle.
    pub bundle: Option<Arc<ServerBundle>>,
}

impl RenderDataUpdate {
    /// An update that replaces only the template.
    pub fn template(template: String) -> Self {
        Self {
            template: Some(template),
            ..Self::default()
        }
    }

    /// An update that replaces only the manifest.
    pub fn manifest(manifest: ClientManifest) -> Self {
        Self {
            manifest: Some(Arc::new(manifest)),
            ..Self::default()
        }
    }

    /// An update that replaces only the bundle.
    pub fn bundle(bundle: ServerBundle) -> Self {
        Self {
            bundle: Some(Arc::new(bundle)),
            ..Self::default()
        }
    }

    /// True when applying this update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.template.is_none() && self.manifest.is_none() && self.bundle.is_none()
    }
}

async fn load_bundle(path: &Path) -> Result<ServerBundle> {
    let bytes = fs::read(path).await.map_err(|source| ServerError::Artifact {
        path: path.to_path_buf(),
        source,
    })?;
    ServerBundle::from_slice(&bytes).map_err(|err| ServerError::ArtifactFormat {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })
}

async fn load_manifest(path: &Path) -> Result<ClientManifest> {
    let bytes = fs::read(path).await.map_err(|source| ServerError::Artifact {
        path: path.to_path_buf(),
        source,
    })?;
    ClientManifest::from_slice(&bytes).map_err(|err| ServerError::ArtifactFormat {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })
}
