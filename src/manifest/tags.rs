//! HTML tag generation from the manifest
//!
//! Walks the chunk graph rooted at an entry and renders stylesheet links,
//! the entry module script, and modulepreload links. Tag order is part of
//! the contract: it decides stylesheet cascade and browser preload
//! priority.

use std::collections::HashSet;

use super::Manifest;

impl Manifest {
    /// Stylesheet link tags for the chunk at `key` and its static import
    /// graph.
    ///
    /// Pre-order depth-first over `imports` (never `dynamicImports`): the
    /// root chunk's own CSS first, then each import's CSS in `imports`
    /// order, recursively. A visited set keyed by chunk key makes diamond
    /// and cyclic import graphs safe. Keys that resolve to no chunk end
    /// that branch silently. `prefix` is prepended to every href.
    pub fn generate_css(&self, key: &str, prefix: &str) -> String {
        let mut seen = HashSet::new();
        let mut tags = Vec::new();
        self.collect_css(key, prefix, &mut seen, &mut tags);
        tags.join("\n")
    }

    fn collect_css<'a>(
        &'a self,
        key: &'a str,
        prefix: &str,
        seen: &mut HashSet<&'a str>,
        tags: &mut Vec<String>,
    ) {
        if !seen.insert(key) {
            return;
        }
        let Some(chunk) = self.chunk(key) else { return };

        for css in &chunk.css {
            tags.push(format!(r#"<link rel="stylesheet" href="{prefix}/{css}">"#));
        }
        for import in &chunk.imports {
            self.collect_css(import, prefix, seen, tags);
        }
    }

    /// The module script tag for the chunk at `key` itself.
    ///
    /// Intentionally shallow: only the entry is a top-level script; its
    /// dependencies load through the browser module graph, not through
    /// duplicate script tags. Empty when the chunk is missing or has no
    /// output file.
    pub fn generate_modules(&self, key: &str, prefix: &str) -> String {
        match self.chunk(key) {
            Some(chunk) if !chunk.file.is_empty() => {
                let file = &chunk.file;
                format!(r#"<script type="module" src="{prefix}/{file}"></script>"#)
            }
            _ => String::new(),
        }
    }

    /// Modulepreload link tags for the chunk at `key` and its static import
    /// graph.
    ///
    /// Same traversal as [`Manifest::generate_css`], but one tag per
    /// visited chunk that has an output file (the root included), rather
    /// than one per CSS entry.
    pub fn generate_preload_modules(&self, key: &str, prefix: &str) -> String {
        let mut seen = HashSet::new();
        let mut tags = Vec::new();
        self.collect_preloads(key, prefix, &mut seen, &mut tags);
        tags.join("\n")
    }

    fn collect_preloads<'a>(
        &'a self,
        key: &'a str,
        prefix: &str,
        seen: &mut HashSet<&'a str>,
        tags: &mut Vec<String>,
    ) {
        if !seen.insert(key) {
            return;
        }
        let Some(chunk) = self.chunk(key) else { return };

        if !chunk.file.is_empty() {
            let file = &chunk.file;
            tags.push(format!(r#"<link rel="modulepreload" href="{prefix}/{file}">"#));
        }
        for import in &chunk.imports {
            self.collect_preloads(import, prefix, seen, tags);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::super::tests::EXAMPLE_MANIFEST;
    use super::*;

    fn two_chunk_manifest() -> Manifest {
        Manifest::parse(
            br#"
            {
              "a.js": {
                "file": "out/a.js",
                "src": "a.js",
                "isEntry": true,
                "imports": ["b.js"]
              },
              "b.js": {
                "file": "out/b.js",
                "src": "b.js",
                "css": ["out/b.css"]
              }
            }
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_css_collects_imports_with_prefix() {
        let manifest = two_chunk_manifest();

        assert_eq!(
            manifest.generate_css("a.js", "/assets"),
            r#"<link rel="stylesheet" href="/assets/out/b.css">"#
        );
    }

    #[test]
    fn test_preloads_cover_root_and_imports_in_order() {
        let manifest = two_chunk_manifest();

        assert_eq!(
            manifest.generate_preload_modules("a.js", "/assets"),
            "<link rel=\"modulepreload\" href=\"/assets/out/a.js\">\n\
             <link rel=\"modulepreload\" href=\"/assets/out/b.js\">"
        );
    }

    #[test]
    fn test_modules_is_root_only() {
        let manifest = two_chunk_manifest();

        assert_eq!(
            manifest.generate_modules("a.js", "/assets"),
            r#"<script type="module" src="/assets/out/a.js"></script>"#
        );
        // Never more than one tag, no matter how many imports.
        assert_eq!(
            manifest.generate_modules("a.js", "").matches("<script").count(),
            1
        );
    }

    #[test]
    fn test_example_manifest_foo_entry() {
        let manifest = Manifest::parse(EXAMPLE_MANIFEST.as_bytes()).unwrap();

        assert_eq!(
            manifest.generate_css("views/foo.js", ""),
            "<link rel=\"stylesheet\" href=\"/assets/foo-5UjPuW-k.css\">\n\
             <link rel=\"stylesheet\" href=\"/assets/shared-ChJ_j-JJ.css\">"
        );
        assert_eq!(
            manifest.generate_modules("views/foo.js", ""),
            r#"<script type="module" src="/assets/foo-BRBmoGS9.js"></script>"#
        );
        assert_eq!(
            manifest.generate_preload_modules("views/foo.js", ""),
            "<link rel=\"modulepreload\" href=\"/assets/foo-BRBmoGS9.js\">\n\
             <link rel=\"modulepreload\" href=\"/assets/shared-B7PI925R.js\">"
        );
    }

    #[test]
    fn test_dynamic_imports_are_not_walked() {
        let manifest = Manifest::parse(EXAMPLE_MANIFEST.as_bytes()).unwrap();

        // views/bar.js dynamically imports baz.js; baz must not be
        // preloaded or scripted eagerly.
        let preloads = manifest.generate_preload_modules("views/bar.js", "");
        assert!(!preloads.contains("baz"));
    }

    #[test]
    fn test_missing_chunk_yields_empty_output() {
        let manifest = two_chunk_manifest();

        assert_eq!(manifest.generate_css("nope.js", ""), "");
        assert_eq!(manifest.generate_modules("nope.js", ""), "");
        assert_eq!(manifest.generate_preload_modules("nope.js", ""), "");
    }

    #[test]
    fn test_missing_import_key_is_skipped() {
        let manifest = Manifest::parse(
            br#"
            {
              "a.js": {
                "file": "out/a.js",
                "src": "a.js",
                "isEntry": true,
                "imports": ["gone.js", "b.js"],
                "css": ["out/a.css"]
              },
              "b.js": {
                "file": "out/b.js",
                "css": ["out/b.css"]
              }
            }
            "#,
        )
        .unwrap();

        assert_eq!(
            manifest.generate_css("a.js", ""),
            "<link rel=\"stylesheet\" href=\"/out/a.css\">\n\
             <link rel=\"stylesheet\" href=\"/out/b.css\">"
        );
    }

    #[test]
    fn test_cyclic_imports_visit_each_chunk_once() {
        let manifest = Manifest::parse(
            br#"
            {
              "a.js": {"file": "out/a.js", "css": ["out/a.css"], "imports": ["b.js"]},
              "b.js": {"file": "out/b.js", "css": ["out/b.css"], "imports": ["a.js"]}
            }
            "#,
        )
        .unwrap();

        let css = manifest.generate_css("a.js", "");
        assert_eq!(css.matches("out/a.css").count(), 1);
        assert_eq!(css.matches("out/b.css").count(), 1);

        let preloads = manifest.generate_preload_modules("a.js", "");
        assert_eq!(preloads.matches("<link").count(), 2);
    }

    #[test]
    fn test_diamond_imports_visit_shared_chunk_once() {
        let manifest = Manifest::parse(
            br#"
            {
              "root.js": {"file": "out/root.js", "imports": ["left.js", "right.js"]},
              "left.js": {"file": "out/left.js", "imports": ["shared.js"]},
              "right.js": {"file": "out/right.js", "imports": ["shared.js"]},
              "shared.js": {"file": "out/shared.js", "css": ["out/shared.css"]}
            }
            "#,
        )
        .unwrap();

        let css = manifest.generate_css("root.js", "");
        assert_eq!(css.matches("out/shared.css").count(), 1);

        // Pre-order: root, left, shared (under left), right.
        assert_eq!(
            manifest.generate_preload_modules("root.js", ""),
            "<link rel=\"modulepreload\" href=\"/out/root.js\">\n\
             <link rel=\"modulepreload\" href=\"/out/left.js\">\n\
             <link rel=\"modulepreload\" href=\"/out/shared.js\">\n\
             <link rel=\"modulepreload\" href=\"/out/right.js\">"
        );
    }

    #[test]
    fn test_chunk_without_css_or_imports_yields_empty_css() {
        let manifest =
            Manifest::parse(br#"{"a.js": {"file": "out/a.js"}}"#).unwrap();
        assert_eq!(manifest.generate_css("a.js", "/p"), "");
    }
}
