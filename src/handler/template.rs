//! Compiled page templates
//!
//! A page template is HTML text with named slots written `{{ head }}`,
//! `{{ metadata }}` and `{{ scripts }}`. Compilation splits the text into
//! literal segments and slots once, at registration time; rendering is a
//! single pass over the segments and cannot fail.

use once_cell::sync::Lazy;

/// Name of the always-registered fallback template.
pub const FALLBACK_TEMPLATE_NAME: &str = "fallback.html";

/// Minimal page used when no registered template matches a path.
const FALLBACK_HTML: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    {{ metadata }}
    {{ head }}
    {{ scripts }}
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

pub static FALLBACK_TEMPLATE: Lazy<PageTemplate> =
    Lazy::new(|| PageTemplate::compile(FALLBACK_HTML));

/// Slots a template may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Generated asset tags (preamble, stylesheets, scripts, preloads).
    Head,
    /// Rendered page metadata.
    Metadata,
    /// Extra per-request scripts.
    Scripts,
}

impl Slot {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "head" => Some(Slot::Head),
            "metadata" => Some(Slot::Metadata),
            "scripts" => Some(Slot::Scripts),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Slot(Slot),
}

/// A page template compiled into literal segments and slots.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    segments: Vec<Segment>,
}

/// Values substituted into a template's slots when rendering a page.
#[derive(Debug, Clone, Default)]
pub struct SlotValues {
    pub head: String,
    pub metadata: String,
    pub scripts: String,
}

impl PageTemplate {
    /// Compile template text.
    ///
    /// Compilation cannot fail: text without slots compiles to a single
    /// literal segment, and `{{ ... }}` sequences naming anything other
    /// than a known slot stay literal text.
    pub fn compile(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = text;

        while let Some(start) = rest.find("{{") {
            let Some(close) = rest[start..].find("}}") else {
                break;
            };
            let name = rest[start + 2..start + close].trim();

            match Slot::from_name(name) {
                Some(slot) => {
                    literal.push_str(&rest[..start]);
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(slot));
                }
                None => {
                    literal.push_str(&rest[..start + close + 2]);
                }
            }
            rest = &rest[start + close + 2..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Render the template with the given slot values.
    pub fn render(&self, values: &SlotValues) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(Slot::Head) => out.push_str(&values.head),
                Segment::Slot(Slot::Metadata) => out.push_str(&values.metadata),
                Segment::Slot(Slot::Scripts) => out.push_str(&values.scripts),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_fills_slots() {
        let template =
            PageTemplate::compile("<head>{{ metadata }}{{ head }}</head>{{ scripts }}");
        let values = SlotValues {
            head: "<script></script>".to_string(),
            metadata: "<title>t</title>".to_string(),
            scripts: "<script>x</script>".to_string(),
        };

        assert_eq!(
            template.render(&values),
            "<head><title>t</title><script></script></head><script>x</script>"
        );
    }

    #[test]
    fn test_unset_slots_render_empty() {
        let template = PageTemplate::compile("a{{ head }}b");
        assert_eq!(template.render(&SlotValues::default()), "ab");
    }

    #[test]
    fn test_unknown_slot_names_stay_literal() {
        let template = PageTemplate::compile("{{ title }} and {{ head }}");
        let values = SlotValues {
            head: "H".to_string(),
            ..SlotValues::default()
        };
        assert_eq!(template.render(&values), "{{ title }} and H");
    }

    #[test]
    fn test_text_without_slots_is_passed_through() {
        let html = "<!doctype html><html></html>";
        let template = PageTemplate::compile(html);
        assert_eq!(template.render(&SlotValues::default()), html);
    }

    #[test]
    fn test_unclosed_slot_stays_literal() {
        let template = PageTemplate::compile("before {{ head");
        assert_eq!(template.render(&SlotValues::default()), "before {{ head");
    }

    #[test]
    fn test_fallback_template_has_all_slots() {
        let values = SlotValues {
            head: "<!--head-->".to_string(),
            metadata: "<!--metadata-->".to_string(),
            scripts: "<!--scripts-->".to_string(),
        };
        let html = FALLBACK_TEMPLATE.render(&values);

        assert!(html.contains("<!--head-->"));
        assert!(html.contains("<!--metadata-->"));
        assert!(html.contains("<!--scripts-->"));
        assert!(html.contains(r#"<div id="root"></div>"#));
    }
}
