//! Shared test utilities for rostrum-server tests.
//!
//! Builds a complete site on disk (template, artifacts, public assets) so
//! tests exercise the same loading paths the server uses at startup.

#![allow(dead_code)]

use rostrum_server::config::ServerConfig;
use rostrum_server::environment::Mode;
use rostrum_server::http::{AppState, EventHub};
use rostrum_server::render::{RenderData, RenderDataStore, RendererFactory};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// Page template with every placeholder the renderer fills.
pub const TEMPLATE: &str = "<!DOCTYPE html>\n<html>\n<head><title>{{ title }}</title>{{ head }}</head>\n<body><div id=\"app\">{{ app }}</div>{{ state }}{{ scripts }}</body>\n</html>\n";

/// A bundle with a static route and a parameterized one.
pub const BUNDLE: &str = r#"{
    "routes": [
        { "path": "/", "page": "home" },
        { "path": "/ballots/{id}", "page": "ballot" }
    ],
    "pages": {
        "home": {
            "state": { "motd": "welcome" },
            "tree": {
                "el": "main",
                "children": [
                    { "el": "h1", "children": [{ "text": "Ballots" }] },
                    { "el": "p", "children": [{ "bind": "motd" }] }
                ]
            }
        },
        "ballot": {
            "tree": {
                "el": "article",
                "attrs": { "class": "ballot" },
                "children": [{ "bind": "params.id" }]
            }
        }
    }
}"#;

/// Manifest with one initial chunk and a per-page lazy chunk.
pub const MANIFEST: &str = r#"{
    "publicPath": "/public/",
    "initial": ["runtime.js"],
    "async": { "ballot": ["ballot.js"] },
    "styles": ["main.css"]
}"#;

/// Write a complete site into a fresh temp directory.
///
/// The layout matches what the compilers produce: the template under
/// `templates/`, both artifacts under `dist/`, assets under `public/`.
pub fn site() -> (TempDir, ServerConfig) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("templates")).unwrap();
    fs::create_dir_all(root.join("dist")).unwrap();
    fs::create_dir_all(root.join("public")).unwrap();
    fs::write(root.join("templates/main.html"), TEMPLATE).unwrap();
    fs::write(root.join("dist/server-bundle.json"), BUNDLE).unwrap();
    fs::write(root.join("dist/client-manifest.json"), MANIFEST).unwrap();
    fs::write(root.join("public/runtime.js"), "// runtime").unwrap();

    let config = ServerConfig {
        template: root.join("templates/main.html"),
        artifacts: root.join("dist"),
        public_dir: root.join("public"),
        ..ServerConfig::default()
    };
    (dir, config)
}

/// Load the site's inputs into a store.
pub async fn loaded_store(config: &ServerConfig) -> Arc<RenderDataStore> {
    let data = RenderData::load(config).await.unwrap();
    Arc::new(RenderDataStore::new(data))
}

/// Application state over `store`, running in `mode`.
pub fn app_state(store: Arc<RenderDataStore>, mode: Mode) -> AppState {
    AppState {
        factory: RendererFactory::new(store),
        hub: Arc::new(EventHub::new()),
        mode,
        title: "test site".to_string(),
    }
}
