//! Error types for the Vite integration.

use thiserror::Error;

/// Errors from handler construction, fragment generation, and response
/// injection.
///
/// Construction-time variants (`MissingFs`, `OpenManifest`, `ParseManifest`,
/// `InvalidDevServerUrl`) are fatal to the handler being built. The rest
/// surface per call and never affect shared state.
#[derive(Debug, Error)]
pub enum Error {
    /// No asset filesystem was supplied in the configuration.
    #[error("vite: asset filesystem is missing")]
    MissingFs,

    /// The manifest file could not be opened in the asset filesystem.
    #[error("vite: open manifest: {0}")]
    OpenManifest(#[source] std::io::Error),

    /// The manifest file exists but is not valid manifest JSON.
    #[error("vite: parse manifest: {0}")]
    ParseManifest(#[source] serde_json::Error),

    /// The requested entry point matches no entry chunk in the manifest.
    #[error("vite: unable to find chunk for entry point {0:?}")]
    EntryNotFound(String),

    /// The configured dev server URL does not parse.
    #[error("vite: invalid dev server URL: {0}")]
    InvalidDevServerUrl(#[source] url::ParseError),

    /// The injection marker was not found in the response body.
    #[error("vite: template marker not found: {0:?}")]
    MarkerNotFound(String),
}
