//! Page metadata
//!
//! Typed head metadata (title, description, social cards, robots) rendered
//! into the `metadata` template slot. Build one per page through a
//! [`crate::handler::RenderContext`], or set a handler-wide default.
//! Unset fields emit nothing; values are attribute-escaped.

use std::fmt;

/// Head metadata for a rendered page.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    /// Page title.
    pub title: Option<String>,

    /// Meta description.
    pub description: Option<String>,

    /// Meta keywords, joined with `, `.
    pub keywords: Vec<String>,

    /// Page authors.
    pub authors: Vec<Author>,

    /// Canonical URL of the page.
    pub canonical_url: Option<String>,

    /// Open Graph card.
    pub open_graph: Option<OpenGraph>,

    /// Twitter card.
    pub twitter: Option<Twitter>,

    /// Robots directives.
    pub robots: Option<Robots>,
}

/// A content author.
#[derive(Debug, Clone, Default)]
pub struct Author {
    pub name: String,

    /// Optional link to the author's page.
    pub url: Option<String>,
}

/// Open Graph card data (`og:*` properties).
#[derive(Debug, Clone, Default)]
pub struct OpenGraph {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub site_name: Option<String>,

    /// `og:type`, e.g. `website` or `article`.
    pub kind: Option<String>,

    pub locale: Option<String>,
    pub images: Vec<OpenGraphImage>,
}

/// One `og:image` with its optional dimensions.
#[derive(Debug, Clone, Default)]
pub struct OpenGraphImage {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub alt: Option<String>,
}

/// Twitter card data (`twitter:*` names).
#[derive(Debug, Clone, Default)]
pub struct Twitter {
    /// e.g. `summary_large_image`.
    pub card: Option<String>,

    pub title: Option<String>,
    pub description: Option<String>,

    /// `@username` of the site.
    pub site: Option<String>,

    /// `@username` of the content creator.
    pub creator: Option<String>,

    pub images: Vec<String>,
}

/// Robots directives. Defaults allow indexing and following.
#[derive(Debug, Clone)]
pub struct Robots {
    pub index: bool,
    pub follow: bool,
    pub no_cache: bool,
}

impl Default for Robots {
    fn default() -> Self {
        Self {
            index: true,
            follow: true,
            no_cache: false,
        }
    }
}

impl Metadata {
    /// Render the metadata as a block of head tags, one per line.
    pub fn to_head(&self) -> String {
        let mut tags = Vec::new();

        if let Some(title) = &self.title {
            tags.push(format!("<title>{}</title>", escape(title)));
        }
        if let Some(description) = &self.description {
            tags.push(meta("description", description));
        }
        if !self.keywords.is_empty() {
            tags.push(meta("keywords", &self.keywords.join(", ")));
        }
        for author in &self.authors {
            tags.push(meta("author", &author.name));
            if let Some(url) = &author.url {
                tags.push(link("author", url));
            }
        }
        if let Some(url) = &self.canonical_url {
            tags.push(link("canonical", url));
        }
        if let Some(og) = &self.open_graph {
            og.append_tags(&mut tags);
        }
        if let Some(twitter) = &self.twitter {
            twitter.append_tags(&mut tags);
        }
        if let Some(robots) = &self.robots {
            tags.push(meta("robots", &robots.directives()));
        }

        tags.join("\n")
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_head())
    }
}

impl OpenGraph {
    fn append_tags(&self, tags: &mut Vec<String>) {
        if let Some(title) = &self.title {
            tags.push(property("og:title", title));
        }
        if let Some(description) = &self.description {
            tags.push(property("og:description", description));
        }
        if let Some(url) = &self.url {
            tags.push(property("og:url", url));
        }
        if let Some(site_name) = &self.site_name {
            tags.push(property("og:site_name", site_name));
        }
        if let Some(kind) = &self.kind {
            tags.push(property("og:type", kind));
        }
        if let Some(locale) = &self.locale {
            tags.push(property("og:locale", locale));
        }
        for image in &self.images {
            tags.push(property("og:image", &image.url));
            if let Some(width) = image.width {
                tags.push(property("og:image:width", &width.to_string()));
            }
            if let Some(height) = image.height {
                tags.push(property("og:image:height", &height.to_string()));
            }
            if let Some(alt) = &image.alt {
                tags.push(property("og:image:alt", alt));
            }
        }
    }
}

impl Twitter {
    fn append_tags(&self, tags: &mut Vec<String>) {
        if let Some(card) = &self.card {
            tags.push(meta("twitter:card", card));
        }
        if let Some(title) = &self.title {
            tags.push(meta("twitter:title", title));
        }
        if let Some(description) = &self.description {
            tags.push(meta("twitter:description", description));
        }
        if let Some(site) = &self.site {
            tags.push(meta("twitter:site", site));
        }
        if let Some(creator) = &self.creator {
            tags.push(meta("twitter:creator", creator));
        }
        for image in &self.images {
            tags.push(meta("twitter:image", image));
        }
    }
}

impl Robots {
    fn directives(&self) -> String {
        let mut parts = vec![
            if self.index { "index" } else { "noindex" },
            if self.follow { "follow" } else { "nofollow" },
        ];
        if self.no_cache {
            parts.push("noarchive");
        }
        parts.join(", ")
    }
}

fn meta(name: &str, content: &str) -> String {
    format!(r#"<meta name="{name}" content="{}">"#, escape(content))
}

fn property(property: &str, content: &str) -> String {
    format!(r#"<meta property="{property}" content="{}">"#, escape(content))
}

fn link(rel: &str, href: &str) -> String {
    format!(r#"<link rel="{rel}" href="{}">"#, escape(href))
}

/// Minimal text/attribute escaping.
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
