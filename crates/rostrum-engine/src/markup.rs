//! HTML generation from render trees.
//!
//! Trees are rendered depth-first into a single string. Text and binding
//! values are always escaped; element and attribute names come from the
//! server compiler and are written as-is.

use crate::bundle::VNode;
use crate::error::EngineError;
use serde_json::Value;
use std::collections::HashMap;

/// Elements that take neither children nor a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Values a `bind` node can draw from during one render.
pub struct BindingScope<'a> {
    /// Page id, used in error messages.
    pub page: &'a str,
    /// State object the page publishes.
    pub state: Option<&'a Value>,
    /// Parameters captured from the matched route.
    pub params: &'a HashMap<String, String>,
}

impl BindingScope<'_> {
    /// Resolve a binding name to printable text.
    ///
    /// Names prefixed with `params.` read route parameters; everything else
    /// is a dot-separated path into the page state. Only strings, numbers
    /// and booleans are printable.
    fn resolve(&self, name: &str) -> Option<String> {
        if let Some(param) = name.strip_prefix("params.") {
            return self.params.get(param).cloned();
        }

        let mut current = self.state?;
        for segment in name.split('.') {
            current = current.get(segment)?;
        }
        printable(current)
    }
}

fn printable(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Render a tree to an HTML fragment.
pub fn render_tree(root: &VNode, scope: &BindingScope<'_>) -> Result<String, EngineError> {
    let mut out = String::new();
    write_node(&mut out, root, scope)?;
    Ok(out)
}

fn write_node(out: &mut String, node: &VNode, scope: &BindingScope<'_>) -> Result<(), EngineError> {
    match node {
        VNode::Text { text } => out.push_str(&escape(text)),
        VNode::Binding { bind } => {
            let value = scope.resolve(bind).ok_or_else(|| EngineError::Binding {
                name: bind.clone(),
                page: scope.page.to_string(),
            })?;
            out.push_str(&escape(&value));
        }
        VNode::Element { el, attrs, children } => {
            out.push('<');
            out.push_str(el);
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape(value));
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&el.as_str()) {
                return Ok(());
            }

            for child in children {
                write_node(out, child, scope)?;
            }
            out.push_str("</");
            out.push_str(el);
            out.push('>');
        }
    }
    Ok(())
}

/// Escape text for inclusion in element content or attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
