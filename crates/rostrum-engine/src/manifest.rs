//! Client build manifest.
//!
//! The client compiler emits a JSON manifest describing the assets the
//! browser needs: scripts shared by every page, extra chunks loaded per
//! page, and stylesheets. The renderer turns the manifest into the
//! `<link>` and `<script>` tags of the final document, so a rebuilt client
//! bundle changes rendered pages without touching the server bundle.

use serde::Deserialize;
use std::collections::HashMap;

/// Assets produced by the client compiler.
///
/// All fields are optional in the JSON; an empty object is a valid manifest
/// that produces no asset tags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientManifest {
    /// URL prefix every emitted asset is served under.
    pub public_path: String,
    /// Scripts every page needs, in load order.
    pub initial: Vec<String>,
    /// Additional chunks keyed by page id.
    #[serde(rename = "async")]
    pub lazy: HashMap<String, Vec<String>>,
    /// Stylesheets linked on every page.
    pub styles: Vec<String>,
}

impl Default for ClientManifest {
    fn default() -> Self {
        Self {
            public_path: "/public/".to_string(),
            initial: Vec::new(),
            lazy: HashMap::new(),
            styles: Vec::new(),
        }
    }
}

impl ClientManifest {
    /// Parse a manifest from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Tags for the document head: stylesheet links plus preloads for the
    /// scripts the page will request.
    pub fn head_tags(&self, page: &str) -> String {
        let mut tags = String::new();
        for style in &self.styles {
            tags.push_str(&format!(
                "<link rel=\"stylesheet\" href=\"{}\">",
                self.asset_url(style)
            ));
        }
        for script in self.page_scripts(page) {
            tags.push_str(&format!(
                "<link rel=\"preload\" href=\"{}\" as=\"script\">",
                self.asset_url(script)
            ));
        }
        tags
    }

    /// `<script>` tags for the page, shared chunks first.
    pub fn script_tags(&self, page: &str) -> String {
        let mut tags = String::new();
        for script in self.page_scripts(page) {
            tags.push_str(&format!(
                "<script src=\"{}\" defer></script>",
                self.asset_url(script)
            ));
        }
        tags
    }

    /// Scripts the page needs: the shared `initial` set followed by the
    /// page's own chunks, without duplicates.
    fn page_scripts(&self, page: &str) -> Vec<&str> {
        let mut scripts: Vec<&str> = self.initial.iter().map(String::as_str).collect();
        if let Some(chunks) = self.lazy.get(page) {
            for chunk in chunks {
                if !scripts.contains(&chunk.as_str()) {
                    scripts.push(chunk);
                }
            }
        }
        scripts
    }

    fn asset_url(&self, asset: &str) -> String {
        if self.public_path.is_empty() || self.public_path.ends_with('/') {
            format!("{}{}", self.public_path, asset)
        } else {
            format!("{}/{}", self.public_path, asset)
        }
    }
}
