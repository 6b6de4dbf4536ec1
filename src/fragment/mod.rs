//! Mode resolution and fragment assembly
//!
//! A [`Fragment`] is the block of head tags a page needs to load its Vite
//! assets. Which tags it holds depends on the mode fixed at configuration
//! time: development trusts a running dev server and emits bootstrap
//! script tags; production resolves the build manifest and emits
//! stylesheet, module and preload tags.

use tracing::debug;
use url::Url;

use crate::config::{Config, Scaffolding, DEFAULT_ENTRY};
use crate::error::Error;
use crate::manifest::{Chunk, Manifest};
use crate::utils::join_url;

/// HTML head content generated for a page, ready to embed in a template.
///
/// Has no identity beyond its string value; regenerate it per render
/// rather than caching it (the parsed manifest is the cached artifact).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Script, stylesheet and preload tags, newline-separated.
    pub tags: String,
}

/// Generate the head fragment for the given configuration.
///
/// Development mode never reads the manifest; production mode opens and
/// parses it from the configured asset filesystem and resolves the entry
/// eagerly, so every configuration problem surfaces here rather than at
/// request time.
pub fn html_fragment(config: &Config) -> Result<Fragment, Error> {
    let tags = if config.dev {
        let server_url = config.dev_server_url();
        Url::parse(server_url).map_err(Error::InvalidDevServerUrl)?;
        dev_tags(server_url, config.entry.as_deref(), config.scaffolding)
    } else {
        let fs = config.fs.as_ref().ok_or(Error::MissingFs)?;
        let bytes = fs
            .read(config.manifest_path())
            .map_err(Error::OpenManifest)?;
        let manifest = Manifest::parse(&bytes).map_err(Error::ParseManifest)?;
        production_tags(&manifest, config.entry.as_deref(), &config.asset_prefix)?
    };

    Ok(Fragment { tags })
}

/// Development-mode tags: framework preamble, dev client, entry module.
pub(crate) fn dev_tags(
    server_url: &str,
    entry: Option<&str>,
    scaffolding: Scaffolding,
) -> String {
    let mut tags = Vec::new();

    if let Some(preamble) = scaffolding.preamble(server_url) {
        tags.push(preamble);
    }

    let client = join_url(server_url, "/@vite/client");
    tags.push(format!(r#"<script type="module" src="{client}"></script>"#));

    let entry = join_url(server_url, entry.unwrap_or(DEFAULT_ENTRY));
    tags.push(format!(r#"<script type="module" src="{entry}"></script>"#));

    tags.join("\n")
}

/// Production-mode tags for the resolved entry chunk: stylesheets, the
/// entry module script, then modulepreload links.
pub(crate) fn production_tags(
    manifest: &Manifest,
    entry: Option<&str>,
    prefix: &str,
) -> Result<String, Error> {
    let chunk = resolve_entry(manifest, entry)?;
    debug!(entry = %chunk.src, "resolved manifest entry");

    let blocks = [
        manifest.generate_css(&chunk.src, prefix),
        manifest.generate_modules(&chunk.src, prefix),
        manifest.generate_preload_modules(&chunk.src, prefix),
    ];

    let tags: Vec<String> = blocks.into_iter().filter(|b| !b.is_empty()).collect();
    Ok(tags.join("\n"))
}

/// Resolve which chunk tags are generated from.
///
/// An explicit entry must match an entry chunk's `src` exactly; no match
/// is an error, never a silent fallback to another entry. Without an
/// explicit entry the manifest's arbitrary entry chunk is used.
pub(crate) fn resolve_entry<'a>(
    manifest: &'a Manifest,
    entry: Option<&str>,
) -> Result<&'a Chunk, Error> {
    let chunk = match entry {
        None => manifest.entry_point(),
        Some(src) => manifest
            .entry_points()
            .into_iter()
            .find(|chunk| chunk.src == src),
    };

    chunk.ok_or_else(|| Error::EntryNotFound(entry.unwrap_or_default().to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fs::MemoryFs;

    const MANIFEST: &str = r#"
    {
      "views/foo.js": {
        "file": "assets/foo-BRBmoGS9.js",
        "src": "views/foo.js",
        "isEntry": true,
        "imports": ["_shared-B7PI925R.js"],
        "css": ["assets/foo-5UjPuW-k.css"]
      },
      "_shared-B7PI925R.js": {
        "file": "assets/shared-B7PI925R.js",
        "css": ["assets/shared-ChJ_j-JJ.css"]
      }
    }
    "#;

    fn production_config() -> Config {
        let fs = MemoryFs::new().with_file(".vite/manifest.json", MANIFEST);
        Config::new(Arc::new(fs))
    }

    #[test]
    fn test_production_fragment_for_entry() {
        let mut config = production_config();
        config.entry = Some("views/foo.js".to_string());

        let fragment = html_fragment(&config).unwrap();
        assert_eq!(
            fragment.tags,
            "<link rel=\"stylesheet\" href=\"/assets/foo-5UjPuW-k.css\">\n\
             <link rel=\"stylesheet\" href=\"/assets/shared-ChJ_j-JJ.css\">\n\
             <script type=\"module\" src=\"/assets/foo-BRBmoGS9.js\"></script>\n\
             <link rel=\"modulepreload\" href=\"/assets/foo-BRBmoGS9.js\">\n\
             <link rel=\"modulepreload\" href=\"/assets/shared-B7PI925R.js\">"
        );
    }

    #[test]
    fn test_unknown_entry_is_an_error() {
        let mut config = production_config();
        config.entry = Some("views/nope.js".to_string());

        match html_fragment(&config) {
            Err(Error::EntryNotFound(entry)) => assert_eq!(entry, "views/nope.js"),
            other => panic!("expected EntryNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_manifest_is_open_error() {
        let config = Config::new(Arc::new(MemoryFs::new()));
        assert!(matches!(
            html_fragment(&config),
            Err(Error::OpenManifest(_))
        ));
    }

    #[test]
    fn test_malformed_manifest_is_parse_error() {
        let fs = MemoryFs::new().with_file(".vite/manifest.json", "not json");
        let config = Config::new(Arc::new(fs));
        assert!(matches!(
            html_fragment(&config),
            Err(Error::ParseManifest(_))
        ));
    }

    #[test]
    fn test_dev_fragment_never_touches_the_manifest() {
        // No manifest anywhere in the filesystem, and no filesystem at all:
        // development mode must still succeed.
        let config = Config {
            dev: true,
            ..Config::default()
        };

        let fragment = html_fragment(&config).unwrap();
        assert!(fragment
            .tags
            .contains(r#"<script type="module" src="http://localhost:5173/@vite/client"></script>"#));
        assert!(fragment
            .tags
            .contains(r#"<script type="module" src="http://localhost:5173/src/main.tsx"></script>"#));
        // Default scaffolding is React, so the preamble comes first.
        assert!(fragment.tags.starts_with("<script type=\"module\">"));
        assert!(fragment.tags.contains("@react-refresh"));
    }

    #[test]
    fn test_dev_fragment_without_preamble() {
        let config = Config {
            dev: true,
            entry: Some("src/index.ts".to_string()),
            scaffolding: Scaffolding::Svelte,
            ..Config::default()
        };

        let fragment = html_fragment(&config).unwrap();
        assert!(!fragment.tags.contains("@react-refresh"));
        assert!(fragment
            .tags
            .contains(r#"<script type="module" src="http://localhost:5173/src/index.ts"></script>"#));
    }

    #[test]
    fn test_invalid_dev_server_url() {
        let config = Config {
            dev: true,
            dev_server_url: Some("not a url".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            html_fragment(&config),
            Err(Error::InvalidDevServerUrl(_))
        ));
    }
}
