//! Vite build manifest model
//!
//! Parses the manifest file written by `vite build` (by default
//! `.vite/manifest.json` in the output directory) into an in-memory chunk
//! map. The manifest is what makes backend integration possible: it maps
//! original source paths to hashed output files and records each chunk's
//! stylesheet and import graph.

mod tags;

use std::collections::HashMap;

use serde::Deserialize;

/// The manifest written by `vite build`: a map from source path to output
/// chunk.
///
/// Loaded once at startup in production mode and immutable afterwards, so
/// it can be shared across concurrent requests without synchronization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    chunks: HashMap<String, Chunk>,
}

/// A single entry in the manifest: one build output unit.
///
/// Every field is optional on the wire; absent fields take their empty
/// defaults, since manifests are externally produced and only structurally
/// trusted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Chunk {
    /// Output path of the compiled asset.
    pub file: String,

    /// Logical chunk name, for display only.
    pub name: String,

    /// Original source path; the key entry-point lookups match against.
    pub src: String,

    /// Stylesheet output paths this chunk requires directly, in order.
    pub css: Vec<String>,

    /// True for chunks loaded lazily through a dynamic import. Never
    /// reached by the eager tag walk.
    pub is_dynamic_entry: bool,

    /// True for root entry chunks included directly in the page.
    pub is_entry: bool,

    /// Manifest keys of statically imported chunks.
    pub imports: Vec<String>,

    /// Manifest keys of dynamically imported chunks.
    pub dynamic_imports: Vec<String>,
}

impl Manifest {
    /// Parse a manifest document.
    pub fn parse(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// An arbitrary entry chunk, or `None` when the build has no entries.
    ///
    /// When the manifest holds several entry chunks the choice between them
    /// is unspecified (map iteration order). Callers that care which entry
    /// they get must request one by source path and match it through
    /// [`Manifest::entry_points`].
    pub fn entry_point(&self) -> Option<&Chunk> {
        self.chunks.values().find(|chunk| chunk.is_entry)
    }

    /// All entry chunks, in map iteration order.
    pub fn entry_points(&self) -> Vec<&Chunk> {
        self.chunks.values().filter(|chunk| chunk.is_entry).collect()
    }

    /// Look up a chunk by its manifest key (the source file path).
    pub fn chunk(&self, key: &str) -> Option<&Chunk> {
        self.chunks.get(key)
    }

    /// Number of chunks in the manifest.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True when the manifest holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
