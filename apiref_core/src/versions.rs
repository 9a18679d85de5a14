//! Discovery of archived page versions.
//!
//! An archive root holds one directory per published version, named
//! `v<major>.<minor>.<patch>`, each containing a marker file (the rendered
//! page) once the archive is complete. Discovery is best effort: a missing or
//! unreadable root, unreadable entries and malformed names all shrink the
//! result instead of failing the build.

use std::cmp::Ordering;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use derive_more::Display;
use serde::Serialize;

use crate::ApirefError;

/// A parsed `v<major>.<minor>.<patch>` identifier.
///
/// Ordering compares the numeric triple, so `v1.10.0 > v1.2.9`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Display, Serialize)]
#[display("v{major}.{minor}.{patch}")]
pub struct VersionId {
	pub major: u64,
	pub minor: u64,
	pub patch: u64,
}

impl VersionId {
	pub fn new(major: u64, minor: u64, patch: u64) -> Self {
		Self {
			major,
			minor,
			patch,
		}
	}
}

impl FromStr for VersionId {
	type Err = ApirefError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		let invalid = || ApirefError::InvalidVersion(value.to_string());
		let rest = value.strip_prefix('v').ok_or_else(invalid)?;

		let mut parts = rest.split('.').map(parse_component);
		let (Some(Some(major)), Some(Some(minor)), Some(Some(patch)), None) =
			(parts.next(), parts.next(), parts.next(), parts.next())
		else {
			return Err(invalid());
		};

		Ok(Self::new(major, minor, patch))
	}
}

/// Parse one numeric component. Signs, whitespace and empty parts are
/// rejected even though `u64::from_str` would accept a leading `+`.
fn parse_component(part: &str) -> Option<u64> {
	if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	part.parse().ok()
}

/// An archived version discovered on disk.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct VersionEntry {
	/// Directory name, used verbatim in links.
	pub name: String,
	pub version: VersionId,
}

impl VersionEntry {
	/// Newest first; equal triples fall back to the directory name so the
	/// order never depends on directory iteration order.
	pub fn newest_first(a: &Self, b: &Self) -> Ordering {
		b.version.cmp(&a.version).then_with(|| a.name.cmp(&b.name))
	}
}

/// Sort entries newest first.
pub fn sort_versions(entries: &mut [VersionEntry]) {
	entries.sort_by(VersionEntry::newest_first);
}

/// Discover completed archived versions under `root`, newest first.
///
/// Only immediate subdirectories whose names start with `v`, contain a file
/// named `marker`, and parse as a [`VersionId`] are returned. Never fails.
pub fn scan_versions(root: &Path, marker: &str) -> Vec<VersionEntry> {
	let entries = match std::fs::read_dir(root) {
		Ok(entries) => entries,
		Err(error) if error.kind() == ErrorKind::NotFound => {
			tracing::debug!(root = %root.display(), "no archived versions directory");
			return Vec::new();
		}
		Err(error) => {
			tracing::warn!(root = %root.display(), %error, "could not scan versions directory");
			return Vec::new();
		}
	};

	let mut versions = Vec::new();
	for entry in entries {
		let entry = match entry {
			Ok(entry) => entry,
			Err(error) => {
				tracing::warn!(root = %root.display(), %error, "skipping unreadable entry");
				continue;
			}
		};

		let path = entry.path();
		if !path.is_dir() {
			continue;
		}

		let Some(name) = entry.file_name().to_str().map(str::to_string) else {
			continue;
		};
		if !name.starts_with('v') || !path.join(marker).is_file() {
			continue;
		}

		match name.parse::<VersionId>() {
			Ok(version) => versions.push(VersionEntry { name, version }),
			Err(_) => {
				tracing::warn!(directory = %name, "skipping malformed version directory");
			}
		}
	}

	sort_versions(&mut versions);
	tracing::debug!(count = versions.len(), "discovered archived versions");
	versions
}
