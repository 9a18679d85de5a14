use std::path::Path;

use crate::AnyEmptyResult;

/// Three classes, the middle one mixing public and internal members.
pub(crate) fn three_class_document() -> &'static str {
	"# A\n\nClass A.\n\n## alpha\n\nAlpha.\n\n# B\n\nClass B.\n\n## pub1\n\nFirst.\n\n## \
	 _int1\n\nHidden.\n\n## pub2\n\nSecond.\n\n## _int2\n\nHidden too.\n\n# C\n\n## gamma\n\nGamma.\n"
}

/// A class with interleaved public and internal members and no body text.
pub(crate) fn interleaved_members_document() -> &'static str {
	"# A\n## pub1\n## _int1\n## pub2\n## _int2"
}

/// Create `root/<name>/<marker>` for each name.
pub(crate) fn create_archives(root: &Path, names: &[&str], marker: &str) -> AnyEmptyResult {
	for name in names {
		let dir = root.join(name);
		std::fs::create_dir_all(&dir)?;
		std::fs::write(dir.join(marker), "<html></html>")?;
	}

	Ok(())
}

/// Write a minimal project: config, document and optional archives.
pub(crate) fn write_project(root: &Path, config: &str, document: &str) -> AnyEmptyResult {
	std::fs::write(root.join("apiref.toml"), config)?;
	std::fs::write(root.join("doc.md"), document)?;

	Ok(())
}
