//! Error types for the rendering engine.
//!
//! Render failures split into two families: `BundleError` covers artifacts
//! that cannot be loaded at all, while `EngineError` covers failures while
//! serving a single request. The server maps `EngineError::RouteNotFound`
//! to a 404 and everything else to a 500.

use thiserror::Error;

/// Errors produced while rendering a single request.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No route in the server bundle matches the requested path
    #[error("no route matches '{path}'")]
    RouteNotFound {
        /// The path that failed to resolve
        path: String,
    },

    /// A `bind` node referenced a value that is missing or not printable
    #[error("binding '{name}' on page '{page}' does not resolve to a printable value")]
    Binding {
        /// The binding name as written in the render tree
        name: String,
        /// Page the tree belongs to
        page: String,
    },

    /// Page template interpolation failed
    #[error("template render failed: {0}")]
    Template(#[from] minijinja::Error),
}

impl EngineError {
    /// True when the failure means the route does not exist, as opposed to
    /// the route existing but failing to render.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::RouteNotFound { .. })
    }
}

/// Errors produced while parsing or validating a server bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The artifact is not valid JSON or is missing required fields
    #[error("malformed bundle JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A route pattern was rejected by the route table
    #[error("route '{path}' is not a valid route pattern: {source}")]
    InvalidRoute {
        /// The offending pattern
        path: String,
        /// Rejection reason from the route table
        #[source]
        source: matchit::InsertError,
    },

    /// A route points at a page id the bundle does not define
    #[error("route '{path}' points at unknown page '{page}'")]
    UnknownPage {
        /// The route pattern
        path: String,
        /// The missing page id
        page: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_not_found_is_not_found() {
        let err = EngineError::RouteNotFound {
            path: "/missing".to_string(),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("/missing"));
    }

    #[test]
    fn test_binding_error_is_server_error() {
        let err = EngineError::Binding {
            name: "user.name".to_string(),
            page: "profile".to_string(),
        };
        assert!(!err.is_not_found());
        let msg = err.to_string();
        assert!(msg.contains("user.name"));
        assert!(msg.contains("profile"));
    }
}
