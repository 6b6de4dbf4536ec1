//! Vite backend integration for Rust web servers.
//!
//! Serves a Vite-built frontend from an axum application, in two modes:
//! development (script tags pointing at a running Vite dev server) and
//! production (asset tags resolved from the build manifest).
//!
//! # Features
//! - Build manifest parsing and entry-point resolution
//! - Ordered, deduplicated stylesheet / module / preload tag generation
//! - Development passthrough against the Vite dev server, including the
//!   React Fast Refresh preamble
//! - A request handler dispatching between public files, templated pages
//!   and static build output
//! - Response-stream injection for externally rendered HTML

pub mod config;
pub mod error;
pub mod fragment;
pub mod fs;
pub mod handler;
pub mod manifest;
pub mod metadata;
pub mod middleware;
pub mod utils;

pub use config::{Config, Scaffolding};
pub use error::Error;
pub use fragment::{html_fragment, Fragment};
pub use fs::{AssetFs, DirFs, MemoryFs, SubFs};
pub use handler::{Handler, HandlerBuilder, RenderContext};
pub use manifest::{Chunk, Manifest};
pub use metadata::Metadata;
