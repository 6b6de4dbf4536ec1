//! Asset filesystem abstraction
//!
//! Everything the handler serves or parses is read through [`AssetFs`]:
//! the build output directory in production, the project root and its
//! `public/` directory in development. Tests and embedded deployments
//! swap the disk for an in-memory tree at the same seam.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::utils::clean_path;

/// A read-only filesystem the handler serves assets from.
///
/// Paths are `/`-separated and relative to the filesystem root; a leading
/// slash is ignored. Reads are synchronous and must be cheap to issue
/// concurrently, since the dispatcher probes them on every request.
pub trait AssetFs: Send + Sync {
    /// Read the file at `path` in full.
    ///
    /// `ErrorKind::NotFound` doubles as the existence probe: the dispatcher
    /// treats it as "try the next source", never as a request failure.
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Assets on disk under a root directory.
///
/// Request paths are cleaned before they touch the disk, so `..` segments
/// cannot escape the root.
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    /// Serve files from the directory at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetFs for DirFs {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        let clean = clean_path(path);
        let rel = clean.trim_start_matches('/');
        if rel.is_empty() {
            return Err(io::ErrorKind::NotFound.into());
        }

        let full = self.root.join(rel);
        if !full.is_file() {
            return Err(io::ErrorKind::NotFound.into());
        }
        std::fs::read(full)
    }
}

/// In-memory assets, keyed by relative path.
///
/// Mirrors the shape of a build output directory without touching disk.
/// Tests use it the same way production code uses [`DirFs`].
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, returning `self` so fixtures can chain inserts.
    pub fn with_file(mut self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        let key = clean_path(path).trim_start_matches('/').to_string();
        self.files.insert(key, contents.into());
        self
    }
}

impl AssetFs for MemoryFs {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        let clean = clean_path(path);
        self.files
            .get(clean.trim_start_matches('/'))
            .cloned()
            .ok_or_else(|| io::ErrorKind::NotFound.into())
    }
}

/// A view of one subdirectory of another filesystem.
///
/// Used for the conventional `public/` directory inside the project root in
/// development mode. A missing subdirectory is not an error; reads through
/// it simply never succeed.
pub struct SubFs {
    inner: Arc<dyn AssetFs>,
    prefix: String,
}

impl SubFs {
    /// A view of `prefix/` inside `inner`.
    pub fn new(inner: Arc<dyn AssetFs>, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }
}

impl AssetFs for SubFs {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        let rel = path.trim_start_matches('/');
        self.inner
            .read(&format!("{}/{}", self.prefix.trim_end_matches('/'), rel))
    }
}
