//! Vite starter templates and their development-mode preambles.

use crate::utils::join_url;

/// Starter template the frontend project was scaffolded from.
///
/// The variants mirror the official `create-vite` template list. The only
/// behavior attached to a template is its development preamble, looked up
/// through [`Scaffolding::preamble_kind`] so per-variant branching lives in
/// one place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scaffolding {
    /// React project. Needs the Fast Refresh preamble in development.
    #[default]
    React,
    /// TypeScript React project.
    ReactTs,
    /// React project compiled with SWC.
    ReactSwc,
    /// TypeScript React project compiled with SWC.
    ReactSwcTs,
    Vanilla,
    VanillaTs,
    Vue,
    VueTs,
    Preact,
    PreactTs,
    Lit,
    LitTs,
    Svelte,
    SvelteTs,
    Solid,
    SolidTs,
    Qwik,
    QwikTs,
    /// Opt out of template-specific behavior.
    None,
}

/// Development-mode bootstrap a template needs before its module graph
/// loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreambleKind {
    /// No preamble required.
    None,
    /// React Fast Refresh runtime hook-up.
    ReactRefresh,
}

impl Scaffolding {
    /// The single mapping from template to preamble behavior.
    pub fn preamble_kind(self) -> PreambleKind {
        match self {
            Scaffolding::React
            | Scaffolding::ReactTs
            | Scaffolding::ReactSwc
            | Scaffolding::ReactSwcTs => PreambleKind::ReactRefresh,
            _ => PreambleKind::None,
        }
    }

    /// Whether this template needs a preamble script in development mode.
    pub fn requires_preamble(self) -> bool {
        self.preamble_kind() != PreambleKind::None
    }

    /// The preamble script for the dev server at `server_url`, if any.
    pub fn preamble(self, server_url: &str) -> Option<String> {
        self.preamble_kind().render(server_url)
    }
}

impl PreambleKind {
    fn render(self, server_url: &str) -> Option<String> {
        match self {
            PreambleKind::None => None,
            PreambleKind::ReactRefresh => Some(react_refresh_preamble(server_url)),
        }
    }
}

/// The script tag wiring up React Fast Refresh against a dev server.
pub fn react_refresh_preamble(server_url: &str) -> String {
    let url = join_url(server_url, "/@react-refresh");
    format!(
        r#"<script type="module">
  import RefreshRuntime from '{url}'
  RefreshRuntime.injectIntoGlobalHook(window)
  window.$RefreshReg$ = () => {{}}
  window.$RefreshSig$ = () => (type) => type
  window.__vite_plugin_react_preamble_installed__ = true
</script>"#
    )
}
