mod common;

use apiref_core::AnyEmptyResult;
use apiref_core::ApirefConfig;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::apiref_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created apiref.toml"))
		.stdout(predicates::str::contains("Created doc.md"));

	let config = ApirefConfig::load_or_default(tmp.path())?;
	assert_eq!(config.title, "My Library");

	let document = std::fs::read_to_string(tmp.path().join("doc.md"))?;
	assert!(document.contains("# Greeter"));
	assert!(document.contains("## _cache"));

	Ok(())
}

#[test]
fn init_output_builds() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::apiref_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::apiref_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("1 class(es), 3 member(s)"));

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("apiref.toml"), "title = \"Existing\"")?;
	std::fs::write(tmp.path().join("doc.md"), "existing content")?;

	common::apiref_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"))
		.stdout(predicates::str::contains("Next steps").not());

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("apiref.toml"))?,
		"title = \"Existing\""
	);
	assert_eq!(
		std::fs::read_to_string(tmp.path().join("doc.md"))?,
		"existing content"
	);

	Ok(())
}

#[test]
fn init_respects_existing_nested_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(tmp.path().join(".config/apiref.toml"), "title = \"Nested\"")?;

	common::apiref_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Config file already exists"));

	assert!(!tmp.path().join("apiref.toml").exists());

	Ok(())
}
