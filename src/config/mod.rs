//! Configuration for fragment generation and the request handler.
//!
//! A [`Config`] is built in code (it carries filesystem handles, not file
//! contents) and handed to [`crate::handler::Handler`] or
//! [`crate::fragment::html_fragment`]. Every field except the asset
//! filesystem has a conventional default.

mod scaffolding;

use std::sync::Arc;

use crate::fs::AssetFs;

pub use scaffolding::{PreambleKind, Scaffolding};

/// Default URL of the Vite dev server.
pub const DEFAULT_DEV_SERVER_URL: &str = "http://localhost:5173";

/// Default entry module, relative to the Vite project root.
pub const DEFAULT_ENTRY: &str = "/src/main.tsx";

/// Default manifest location inside the build output directory.
pub const DEFAULT_MANIFEST_PATH: &str = ".vite/manifest.json";

/// Configuration for the handler and for standalone fragment generation.
#[derive(Clone, Default)]
pub struct Config {
    /// Filesystem to serve files from. In production this is the Vite
    /// output directory (usually `dist`); in development the root of the
    /// Vite app. Required: handler construction fails without it.
    pub fs: Option<Arc<dyn AssetFs>>,

    /// Filesystem for public files, usually the `public` directory. Only
    /// consulted in development mode. When unset, a `public/` view of `fs`
    /// is used instead.
    pub public_fs: Option<Arc<dyn AssetFs>>,

    /// True when the assets are served by a running Vite dev server.
    pub dev: bool,

    /// Source path of the manifest entry point to render, e.g.
    /// `src/main.tsx`. Useful for multi-page apps with several entry
    /// chunks. When unset, production mode picks an arbitrary entry chunk
    /// and development mode falls back to [`DEFAULT_ENTRY`].
    pub entry: Option<String>,

    /// Base URL of the Vite dev server, used to load the dev client.
    /// Defaults to [`DEFAULT_DEV_SERVER_URL`]. Unused in production mode.
    pub dev_server_url: Option<String>,

    /// Manifest path relative to `fs`. Defaults to
    /// [`DEFAULT_MANIFEST_PATH`]. Unused in development mode.
    pub manifest_path: Option<String>,

    /// Starter template the frontend was scaffolded from; decides whether a
    /// framework preamble is emitted in development mode.
    pub scaffolding: Scaffolding,

    /// Prefix prepended to every generated asset URL, e.g. a CDN origin.
    /// Defaults to empty.
    pub asset_prefix: String,
}

impl Config {
    /// A configuration serving from the given asset filesystem, with every
    /// other option at its default.
    pub fn new(fs: Arc<dyn AssetFs>) -> Self {
        Self {
            fs: Some(fs),
            ..Self::default()
        }
    }

    pub(crate) fn dev_server_url(&self) -> &str {
        self.dev_server_url
            .as_deref()
            .unwrap_or(DEFAULT_DEV_SERVER_URL)
    }

    pub(crate) fn manifest_path(&self) -> &str {
        self.manifest_path.as_deref().unwrap_or(DEFAULT_MANIFEST_PATH)
    }
}
