//! Bundle-driven server-side rendering.
//!
//! This crate turns three inputs into complete HTML documents:
//!
//! - a **server bundle**: the pages a site can render plus the route table
//!   mapping request paths onto them ([`ServerBundle`])
//! - a **client manifest**: the scripts and stylesheets the browser needs
//!   ([`ClientManifest`])
//! - a **page template**: the HTML shell the rendered fragments are
//!   interpolated into
//!
//! [`create_renderer`] pairs a bundle with the other two inputs; the
//! resulting [`Renderer`] serves one request at a time through
//! [`Renderer::render_to_string`]. Renderers are deliberately cheap to
//! build so callers can assemble one per request and always pick up
//! freshly swapped inputs.
//!
//! ```no_run
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use rostrum_engine::{create_renderer, ClientManifest, RenderContext, RendererOptions, ServerBundle};
//! use std::sync::Arc;
//!
//! let bundle = Arc::new(ServerBundle::from_slice(&std::fs::read("dist/server-bundle.json")?)?);
//! let manifest = Arc::new(ClientManifest::from_slice(&std::fs::read("dist/client-manifest.json")?)?);
//! let template = std::fs::read_to_string("templates/main.html")?;
//!
//! let renderer = create_renderer(bundle, RendererOptions { template, manifest });
//! let mut ctx = RenderContext::new("/ballots/42", "rostrum");
//! let html = renderer.render_to_string(&mut ctx).await?;
//! # let _ = html;
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod context;
pub mod error;
pub mod manifest;
pub mod markup;
pub mod renderer;

pub use bundle::{Page, ResolvedRoute, RouteEntry, ServerBundle, VNode};
pub use context::RenderContext;
pub use error::{BundleError, EngineError};
pub use manifest::ClientManifest;
pub use renderer::{create_renderer, hydration_script, Renderer, RendererOptions, INITIAL_STATE_GLOBAL};
