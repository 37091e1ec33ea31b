//! Per-request render context.

use serde_json::Value;

/// Mutable state that travels with a single render.
///
/// A context is created for each request and discarded once the response is
/// written. During rendering the matched page publishes its state here, and
/// the renderer serializes whatever ends up in `state` into the hydration
/// script of the final document.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Request path being rendered, e.g. `/ballots/42`.
    pub url: String,
    /// Document title interpolated into the page template.
    pub title: String,
    /// State published for client hydration. `None` until a page provides
    /// it; pre-populating it overrides the matched page's own state.
    pub state: Option<Value>,
}

impl RenderContext {
    /// Create a context for one request.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            state: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_has_no_state() {
        let ctx = RenderContext::new("/", "rostrum");
        assert_eq!(ctx.url, "/");
        assert_eq!(ctx.title, "rostrum");
        assert!(ctx.state.is_none());
    }
}
