//! Renderer assembly and the render pipeline.
//!
//! [`create_renderer`] pairs a server bundle with the interpolation inputs
//! it needs: the page template and the client manifest. Renderers are cheap
//! to assemble and short-lived; the server builds a fresh one per request so
//! every response reflects the inputs current at the moment the request
//! arrived.

use crate::bundle::ServerBundle;
use crate::context::RenderContext;
use crate::error::EngineError;
use crate::manifest::ClientManifest;
use crate::markup::{self, BindingScope};
use minijinja::value::Value as TemplateValue;
use minijinja::{context, Environment};
use serde_json::Value;
use std::sync::Arc;

/// Name the page template is registered under. The `.html` suffix turns on
/// HTML auto-escaping for interpolated values.
const TEMPLATE_NAME: &str = "page.html";

/// Global the hydration payload is assigned to in the browser. The client
/// runtime reads this before mounting.
pub const INITIAL_STATE_GLOBAL: &str = "__INITIAL_STATE__";

/// Inputs paired with a bundle to assemble a [`Renderer`].
#[derive(Debug, Clone)]
pub struct RendererOptions {
    /// Page template the rendered fragments are interpolated into.
    pub template: String,
    /// Client build manifest describing browser assets.
    pub manifest: Arc<ClientManifest>,
}

/// A server bundle plus interpolation inputs, ready to render requests.
pub struct Renderer {
    bundle: Arc<ServerBundle>,
    template: String,
    manifest: Arc<ClientManifest>,
}

/// Assemble a renderer from a bundle and interpolation inputs.
pub fn create_renderer(bundle: Arc<ServerBundle>, options: RendererOptions) -> Renderer {
    Renderer {
        bundle,
        template: options.template,
        manifest: options.manifest,
    }
}

impl Renderer {
    /// Render the request described by `ctx` into a complete HTML document.
    ///
    /// Resolution misses surface as [`EngineError::RouteNotFound`]; any
    /// other error means the route exists but could not be rendered. On
    /// success `ctx.state` holds the state that was serialized for
    /// hydration, unless the page published none.
    pub async fn render_to_string(&self, ctx: &mut RenderContext) -> Result<String, EngineError> {
        let route = self
            .bundle
            .resolve(&ctx.url)
            .ok_or_else(|| EngineError::RouteNotFound {
                path: ctx.url.clone(),
            })?;

        // A pre-populated context wins over the page's own state.
        if ctx.state.is_none() {
            ctx.state = route.page.state.clone();
        }

        let scope = BindingScope {
            page: route.name,
            state: ctx.state.as_ref(),
            params: &route.params,
        };
        let app = markup::render_tree(&route.page.tree, &scope)?;

        let head = self.manifest.head_tags(route.name);
        let scripts = self.manifest.script_tags(route.name);
        let state = ctx
            .state
            .as_ref()
            .map(hydration_script)
            .unwrap_or_default();

        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, &self.template)?;
        let template = env.get_template(TEMPLATE_NAME)?;
        let html = template.render(context! {
            title => &ctx.title,
            head => TemplateValue::from_safe_string(head),
            app => TemplateValue::from_safe_string(app),
            state => TemplateValue::from_safe_string(state),
            scripts => TemplateValue::from_safe_string(scripts),
        })?;
        Ok(html)
    }
}

/// Build the inline script that exposes page state to the client runtime.
///
/// `<` is escaped in the serialized JSON so a state value containing
/// `</script>` cannot terminate the script element early.
pub fn hydration_script(state: &Value) -> String {
    let json = state.to_string().replace('<', "\\u003c");
    format!("<script>window.{INITIAL_STATE_GLOBAL} = {json};</script>")
}
