//! `apiref_core` turns a single flat markdown API reference into a filtered,
//! reordered and navigable HTML page. The document uses two heading levels as
//! its only structure: `# Class` and `## member`.
//!
//! ## Processing Pipeline
//!
//! ```text
//! doc.md
//!   → Block parser (splits lines into class blocks with nested member blocks)
//!   → Class filter (whitelist / blacklist policy, drops whole classes)
//!   → Member sorter (public members first, warning divider, then `_internal` ones)
//!   → Navigation builder (re-scans the final text, slugs every heading)
//!   → Renderer (markdown → HTML with matching heading ids and highlighted code)
//!   → Page template (navigation + archived version selector + body)
//! ```
//!
//! Archived versions are discovered independently by [`scan_versions`] and
//! only feed the version selector.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `apiref.toml`, including the
//!   filter policy, archive location and version source.
//! - [`heading`]: The heading grammar shared by every line scan.
//! - [`versions`]: Archived version discovery and ordering.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apiref_core::{build_site, load_site, write_site};
//! use std::path::Path;
//!
//! let ctx = load_site(Path::new(".")).unwrap();
//! let result = build_site(&ctx).unwrap();
//! println!("{} classes in navigation", result.navigation.len());
//! write_site(&result).unwrap();
//! ```
//!
//! The pipeline stages can also be used on their own:
//!
//! ```rust
//! use apiref_core::{FilterPolicy, TransformOptions, transform_document};
//!
//! let source = "# Color\n## _cache\n## rgb\n# Renderer\n## draw\n";
//! let options = TransformOptions {
//! 	policy: FilterPolicy::blacklist(["Renderer"]),
//! 	..TransformOptions::default()
//! };
//! let transformed = transform_document(source, &options);
//!
//! assert_eq!(transformed.navigation.len(), 1);
//! assert_eq!(transformed.navigation[0].members[0].name, "rgb");
//! ```

pub use config::*;
pub use error::*;
pub use filter::*;
pub use highlight::*;
pub use navigation::*;
pub use page::*;
pub use parser::*;
pub use pipeline::*;
pub use render::*;
pub use site::*;
pub use slug::*;
pub use sorter::*;
pub use version_source::*;
pub use versions::*;

pub mod config;
#[allow(unused_assignments)]
mod error;
mod filter;
pub mod heading;
mod highlight;
mod navigation;
mod page;
mod parser;
mod pipeline;
mod render;
mod site;
mod slug;
mod sorter;
mod version_source;
pub mod versions;

#[cfg(test)]
mod __fixtures;
