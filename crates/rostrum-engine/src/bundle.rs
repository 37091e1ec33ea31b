//! Server bundle loading and route resolution.
//!
//! A server bundle is the JSON artifact the server compiler emits: the set
//! of renderable pages plus a route table mapping URL patterns onto them.
//! Bundles are parsed and validated eagerly, so a broken artifact is
//! rejected before it can ever serve a request.
//!
//! Route patterns use the `matchit` syntax: `/ballots/{id}` captures a
//! single segment, `/docs/{*rest}` captures the remainder of the path.

use crate::error::BundleError;
use matchit::Router;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// One node of a page's render tree.
///
/// Trees are plain data. `Text` nodes render escaped character data,
/// `Binding` nodes interpolate a value from page state or route parameters,
/// and `Element` nodes render a tag with attributes and children.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VNode {
    /// Literal text content
    Text {
        /// The text, escaped on output
        text: String,
    },
    /// A value interpolated at render time
    Binding {
        /// Dot-separated path into page state, or `params.<name>` for a
        /// route parameter
        bind: String,
    },
    /// An HTML element
    Element {
        /// Tag name
        el: String,
        /// Attributes, rendered in name order
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        /// Child nodes, ignored for void elements
        #[serde(default)]
        children: Vec<VNode>,
    },
}

/// One renderable page in the bundle.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// State this page publishes into the render context.
    #[serde(default)]
    pub state: Option<Value>,
    /// Root of the page's render tree.
    pub tree: VNode,
}

/// One entry of the bundle's route table.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    /// Route pattern, e.g. `/ballots/{id}`.
    pub path: String,
    /// Page id the pattern maps to.
    pub page: String,
}

#[derive(Deserialize)]
struct RawBundle {
    routes: Vec<RouteEntry>,
    pages: HashMap<String, Page>,
}

/// A parsed and validated server bundle.
///
/// The route table is compiled once at load time; resolution afterwards is
/// read-only.
pub struct ServerBundle {
    routes: Vec<RouteEntry>,
    pages: HashMap<String, Page>,
    table: Router<String>,
}

impl ServerBundle {
    /// Parse a bundle from raw JSON bytes and compile its route table.
    ///
    /// Fails if the JSON is malformed, a route pattern is invalid, or a
    /// route points at a page the bundle does not define.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, BundleError> {
        let raw: RawBundle = serde_json::from_slice(bytes)?;

        let mut table = Router::new();
        for route in &raw.routes {
            if !raw.pages.contains_key(&route.page) {
                return Err(BundleError::UnknownPage {
                    path: route.path.clone(),
                    page: route.page.clone(),
                });
            }
            table
                .insert(&route.path, route.page.clone())
                .map_err(|source| BundleError::InvalidRoute {
                    path: route.path.clone(),
                    source,
                })?;
        }

        Ok(Self {
            routes: raw.routes,
            pages: raw.pages,
            table,
        })
    }

    /// Resolve a request path to a page and its captured route parameters.
    ///
    /// Returns `None` when no pattern matches the path.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute<'_>> {
        let matched = self.table.at(path).ok()?;
        let page = self.pages.get(matched.value.as_str())?;

        let mut params = HashMap::new();
        for (name, value) in matched.params.iter() {
            params.insert(name.to_string(), value.to_string());
        }

        Some(ResolvedRoute {
            name: matched.value,
            page,
            params,
        })
    }

    /// Route table entries in bundle order.
    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }
}

impl fmt::Debug for ServerBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerBundle")
            .field("routes", &self.routes.len())
            .field("pages", &self.pages.len())
            .finish_non_exhaustive()
    }
}

/// Outcome of matching a request path against the bundle's route table.
#[derive(Debug)]
pub struct ResolvedRoute<'a> {
    /// Page id the matched route maps to.
    pub name: &'a str,
    /// The page itself.
    pub page: &'a Page,
    /// Parameters captured from the path pattern.
    pub params: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ballot_bundle() -> ServerBundle {
        ServerBundle::from_slice(
            br#"{
                "routes": [
                    { "path": "/", "page": "home" },
                    { "path": "/ballots/{id}", "page": "ballot" }
                ],
                "pages": {
                    "home": {
                        "state": { "motd": "welcome" },
                        "tree": { "el": "main", "children": [{ "text": "home" }] }
                    },
                    "ballot": {
                        "tree": { "el": "article", "children": [{ "bind": "params.id" }] }
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_static_route() {
        let bundle = ballot_bundle();
        let route = bundle.resolve("/").unwrap();
        assert_eq!(route.name, "home");
        assert!(route.params.is_empty());
        assert!(route.page.state.is_some());
    }

    #[test]
    fn test_resolve_captures_parameters() {
        let bundle = ballot_bundle();
        let route = bundle.resolve("/ballots/42").unwrap();
        assert_eq!(route.name, "ballot");
        assert_eq!(route.params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn test_resolve_miss_returns_none() {
        let bundle = ballot_bundle();
        assert!(bundle.resolve("/nope").is_none());
        assert!(bundle.resolve("/ballots/42/extra").is_none());
    }

    #[test]
    fn test_route_to_unknown_page_is_rejected() {
        let err = ServerBundle::from_slice(
            br#"{
                "routes": [{ "path": "/", "page": "missing" }],
                "pages": {}
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, BundleError::UnknownPage { .. }));
    }

    #[test]
    fn test_conflicting_routes_are_rejected() {
        let err = ServerBundle::from_slice(
            br#"{
                "routes": [
                    { "path": "/a", "page": "home" },
                    { "path": "/a", "page": "home" }
                ],
                "pages": {
                    "home": { "tree": { "text": "home" } }
                }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, BundleError::InvalidRoute { .. }));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = ServerBundle::from_slice(b"{ not json").unwrap_err();
        assert!(matches!(err, BundleError::Json(_)));
    }

    #[test]
    fn test_vnode_variants_deserialize() {
        let node: VNode = serde_json::from_str(
            r#"{ "el": "p", "attrs": { "class": "lead" }, "children": [
                { "text": "hello " },
                { "bind": "user.name" }
            ]}"#,
        )
        .unwrap();

        match node {
            VNode::Element { el, attrs, children } => {
                assert_eq!(el, "p");
                assert_eq!(attrs.get("class").map(String::as_str), Some("lead"));
                assert_eq!(children.len(), 2);
                assert!(matches!(&children[0], VNode::Text { text } if text == "hello "));
                assert!(matches!(&children[1], VNode::Binding { bind } if bind == "user.name"));
            }
            other => panic!("expected element, got {other:?}"),
        }
    }
}
