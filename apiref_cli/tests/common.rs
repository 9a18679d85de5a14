#![allow(dead_code)]

use std::path::Path;

use apiref_core::AnyEmptyResult;
use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn apiref_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("apiref"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("APIREF_LOG");
	cmd
}

pub const SAMPLE_DOCUMENT: &str = "# Color\n\nColor helpers.\n\n## _cache\n\nInternal cache.\n\n## \
                                   rgb\n\nCreate a color.\n\n# Renderer\n\n## draw\n\nDraw \
                                   everything.\n";

/// Write `apiref.toml` and `doc.md` into `root`.
pub fn write_project(root: &Path, config: &str, document: &str) -> AnyEmptyResult {
	std::fs::write(root.join("apiref.toml"), config)?;
	std::fs::write(root.join("doc.md"), document)?;

	Ok(())
}

/// Create `root/versions/<name>/api.html` for each name.
pub fn create_archives(root: &Path, names: &[&str]) -> AnyEmptyResult {
	for name in names {
		let dir = root.join("versions").join(name);
		std::fs::create_dir_all(&dir)?;
		std::fs::write(dir.join("api.html"), "<html></html>")?;
	}

	Ok(())
}
