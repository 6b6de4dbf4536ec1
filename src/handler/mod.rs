//! Request handler for a Vite application
//!
//! Dispatches each request in strict order, first match wins:
//! 1. public files (development mode only, never for the index path)
//! 2. the index page, rendered through a template
//! 3. pages with an explicitly registered template
//! 4. static assets from the main filesystem, else 404
//!
//! A handler is built once via [`HandlerBuilder`], which is also where all
//! template registration happens; the built handler is immutable and is
//! shared across concurrent requests behind one `Arc`.

mod template;

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::{Config, Scaffolding};
use crate::error::Error;
use crate::fragment;
use crate::fs::{AssetFs, SubFs};
use crate::manifest::Manifest;
use crate::metadata::Metadata;
use crate::utils::{clean_path, content_type};

pub use template::{PageTemplate, SlotValues};
use template::{FALLBACK_TEMPLATE, FALLBACK_TEMPLATE_NAME};

/// Per-request values threaded into page rendering.
///
/// Attach one to a request via its extensions (or pass it straight to
/// [`Handler::render_page`]); it is an explicit parameter of the render,
/// not ambient state.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Metadata for this page; overrides the handler-wide default.
    pub metadata: Option<Metadata>,

    /// Extra script markup for the `scripts` template slot.
    pub scripts: Option<String>,
}

/// Which data source feeds tag generation. Fixed at build time; changing
/// mode means building a new handler.
enum Mode {
    Development {
        server_url: String,
        public_fs: Arc<dyn AssetFs>,
    },
    Production {
        manifest: Manifest,
    },
}

/// Builds a [`Handler`].
///
/// Registration is only possible here, and `build` consumes the builder,
/// so templates cannot be added once serving has started.
pub struct HandlerBuilder {
    config: Config,
    templates: HashMap<String, PageTemplate>,
    default_metadata: Option<Metadata>,
}

impl HandlerBuilder {
    pub fn new(config: Config) -> Self {
        let mut templates = HashMap::new();
        templates.insert(
            FALLBACK_TEMPLATE_NAME.to_string(),
            FALLBACK_TEMPLATE.clone(),
        );

        Self {
            config,
            templates,
            default_metadata: None,
        }
    }

    /// Register a page template under `name`.
    ///
    /// The name should match the URL path the template serves; use
    /// `index.html` for the root path.
    ///
    /// # Panics
    ///
    /// Panics when a template with this name is already registered. That is
    /// a startup contract violation, not a runtime condition.
    pub fn register_template(mut self, name: &str, text: &str) -> Self {
        if self.templates.contains_key(name) {
            panic!("vite: template {name:?} already registered");
        }
        self.templates
            .insert(name.to_string(), PageTemplate::compile(text));
        self
    }

    /// Metadata used for pages whose request carries none.
    pub fn default_metadata(mut self, metadata: Metadata) -> Self {
        self.default_metadata = Some(metadata);
        self
    }

    /// Construct the handler.
    ///
    /// Production mode opens and parses the manifest here; development
    /// mode validates the dev-server URL and resolves the public
    /// filesystem. Any failure is fatal to this handler.
    pub fn build(self) -> Result<Handler, Error> {
        let config = self.config;
        let fs = config.fs.clone().ok_or(Error::MissingFs)?;

        let mode = if config.dev {
            let server_url = config.dev_server_url().to_string();
            Url::parse(&server_url).map_err(Error::InvalidDevServerUrl)?;

            // Like the conventional `public` directory: an explicit
            // filesystem wins, else peek into `public/` of the app root.
            let public_fs = config
                .public_fs
                .clone()
                .unwrap_or_else(|| Arc::new(SubFs::new(fs.clone(), "public")));

            Mode::Development {
                server_url,
                public_fs,
            }
        } else {
            let bytes = fs
                .read(config.manifest_path())
                .map_err(Error::OpenManifest)?;
            let manifest = Manifest::parse(&bytes).map_err(Error::ParseManifest)?;
            debug!(chunks = manifest.len(), "loaded build manifest");

            Mode::Production { manifest }
        };

        Ok(Handler {
            inner: Arc::new(HandlerInner {
                fs,
                mode,
                entry: config.entry,
                scaffolding: config.scaffolding,
                asset_prefix: config.asset_prefix,
                templates: self.templates,
                default_metadata: self.default_metadata,
            }),
        })
    }
}

/// Serves a Vite application: public files, templated pages, and static
/// build output.
///
/// Cheap to clone; all state is shared and read-only.
#[derive(Clone)]
pub struct Handler {
    inner: Arc<HandlerInner>,
}

struct HandlerInner {
    fs: Arc<dyn AssetFs>,
    mode: Mode,
    entry: Option<String>,
    scaffolding: Scaffolding,
    asset_prefix: String,
    templates: HashMap<String, PageTemplate>,
    default_metadata: Option<Metadata>,
}

impl Handler {
    /// Start building a handler for `config`.
    pub fn builder(config: Config) -> HandlerBuilder {
        HandlerBuilder::new(config)
    }

    /// Shorthand for `Handler::builder(config).build()`.
    pub fn new(config: Config) -> Result<Self, Error> {
        HandlerBuilder::new(config).build()
    }

    /// Dispatch one request.
    ///
    /// A [`RenderContext`] found in the request extensions is passed
    /// through to page rendering.
    pub async fn serve(&self, req: Request) -> Response {
        let ctx = req
            .extensions()
            .get::<RenderContext>()
            .cloned()
            .unwrap_or_default();
        self.serve_path(req.uri(), &ctx)
    }

    /// An axum router that sends every path through this handler.
    pub fn into_router(self) -> Router {
        Router::new().fallback(serve_handler).with_state(self)
    }

    fn serve_path(&self, uri: &Uri, ctx: &RenderContext) -> Response {
        let path = clean_path(uri.path());
        let is_index = path == "/" || path == "/index.html";

        // Public files take precedence in development, but never shadow
        // the rendered index.
        if let Mode::Development { public_fs, .. } = &self.inner.mode {
            if !is_index {
                if let Ok(bytes) = public_fs.read(&path) {
                    debug!(%path, "serving public file");
                    return file_response(&path, bytes);
                }
            }
        }

        if is_index || self.inner.templates.contains_key(path.as_str()) {
            return match self.render_page(&path, ctx) {
                Ok(html) => Html(html).into_response(),
                Err(err) => {
                    error!(%path, error = %err, "failed to render page");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                        .into_response()
                }
            };
        }

        match self.inner.fs.read(&path) {
            Ok(bytes) => file_response(&path, bytes),
            Err(_) => StatusCode::NOT_FOUND.into_response(),
        }
    }

    /// The generated asset tags on their own, without a page template.
    ///
    /// Regenerated per call; only the parsed manifest is cached. Fails when
    /// an explicitly requested entry has no matching entry chunk.
    pub fn fragment_tags(&self) -> Result<String, Error> {
        match &self.inner.mode {
            Mode::Development { server_url, .. } => Ok(fragment::dev_tags(
                server_url,
                self.inner.entry.as_deref(),
                self.inner.scaffolding,
            )),
            Mode::Production { manifest } => fragment::production_tags(
                manifest,
                self.inner.entry.as_deref(),
                &self.inner.asset_prefix,
            ),
        }
    }

    /// Render the page for `path` to an HTML string.
    pub fn render_page(&self, path: &str, ctx: &RenderContext) -> Result<String, Error> {
        let head = self.fragment_tags()?;

        let metadata = ctx
            .metadata
            .as_ref()
            .or(self.inner.default_metadata.as_ref());
        let values = SlotValues {
            head,
            metadata: metadata.map(Metadata::to_head).unwrap_or_default(),
            scripts: ctx.scripts.clone().unwrap_or_default(),
        };

        Ok(self.template_for(path).render(&values))
    }

    /// Find the template for a request path, trying name variants before
    /// settling on the fallback.
    fn template_for(&self, path: &str) -> &PageTemplate {
        let name = if path == "/" { "index.html" } else { path };
        if let Some(tmpl) = self.inner.templates.get(name) {
            return tmpl;
        }

        let bare = name.trim_start_matches('/');
        let variants = [
            bare.to_string(),
            format!("{bare}.html"),
            bare.strip_suffix(".html").unwrap_or(bare).to_string(),
            format!("{name}.html"),
        ];
        for variant in &variants {
            if let Some(tmpl) = self.inner.templates.get(variant) {
                return tmpl;
            }
        }

        // The fallback always exists; anything registered alongside it
        // that still didn't match usually means a template/path naming
        // mismatch worth surfacing.
        if self.inner.templates.len() > 1 {
            let mut names: Vec<&str> =
                self.inner.templates.keys().map(String::as_str).collect();
            names.sort_unstable();
            warn!(
                template = %name,
                available = %names.join(", "),
                "template not found, using fallback"
            );
        }
        &self.inner.templates[FALLBACK_TEMPLATE_NAME]
    }
}

/// axum entry point behind [`Handler::into_router`].
async fn serve_handler(State(handler): State<Handler>, req: Request) -> Response {
    handler.serve(req).await
}

/// A 200 response with the file bytes and extension-derived content type.
fn file_response(path: &str, bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, content_type(path))], Body::from(bytes)).into_response()
}
