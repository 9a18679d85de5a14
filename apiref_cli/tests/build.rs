mod common;

use apiref_cli::ApirefCli;
use apiref_cli::Commands;
use apiref_core::AnyEmptyResult;
use clap::Parser;
use predicates::prelude::PredicateBooleanExt;

const BLACKLIST_RENDERER: &str = "title = \"Demo\"\nversion = \"1.0.0\"\n\n[filter]\nmode = \
                                  \"blacklist\"\nexclude = [\"Renderer\"]\n";

#[test]
fn build_writes_filtered_page() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path(), BLACKLIST_RENDERER, common::SAMPLE_DOCUMENT)?;

	common::apiref_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Built api.html (1 class(es), 2 member(s), 0 archived version(s)).",
		));

	let html = std::fs::read_to_string(tmp.path().join("api.html"))?;
	assert!(html.contains("<title>Demo v1.0.0 - API Reference</title>"));
	assert!(html.contains(
		"<h1 id=\"color\" tabindex=\"-1\"><a class=\"header-anchor\" href=\"#color\">Color</a></h1>"
	));
	assert!(html.contains("<h2 id=\"-internal-properties\""));
	assert!(html.contains("<a href=\"#rgb\" class=\"nav-member\">rgb</a>"));
	assert!(!html.contains("Renderer"));
	assert!(!html.contains("version-dropdown"));

	let rgb = html.find("id=\"rgb\"");
	let cache = html.find("id=\"-cache\"");
	assert!(rgb.is_some() && cache.is_some() && rgb < cache);

	Ok(())
}

#[test]
fn build_lists_archived_versions() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path(), BLACKLIST_RENDERER, common::SAMPLE_DOCUMENT)?;
	common::create_archives(tmp.path(), &["v0.9.0", "v0.10.0"])?;

	common::apiref_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("2 archived version(s)"));

	let html = std::fs::read_to_string(tmp.path().join("api.html"))?;
	let newer = html.find("<option value=\"v0.10.0\">");
	let older = html.find("<option value=\"v0.9.0\">");
	assert!(newer.is_some() && older.is_some() && newer < older);

	Ok(())
}

#[test]
fn build_dry_run_does_not_write() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path(), "", common::SAMPLE_DOCUMENT)?;

	common::apiref_cmd()
		.arg("build")
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run: api.html would change"));

	assert!(!tmp.path().join("api.html").exists());

	Ok(())
}

#[test]
fn build_without_document_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::apiref_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("apiref::input_read"));

	assert!(!tmp.path().join("api.html").exists());

	Ok(())
}

#[test]
fn build_reports_invalid_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(
		tmp.path(),
		"[filter]\nmode = \"greylist\"\n",
		common::SAMPLE_DOCUMENT,
	)?;

	common::apiref_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("apiref::config_parse"))
		.stdout(predicates::str::contains("Built").not());

	Ok(())
}

#[test]
fn build_highlights_fenced_code() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(
		tmp.path(),
		"",
		"# Color\n\n## rgb\n\n```lua\nlocal c = Color.rgb(1, 0, 0)\n```\n",
	)?;

	common::apiref_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let html = std::fs::read_to_string(tmp.path().join("api.html"))?;
	assert!(html.contains("<pre style=\""));
	assert!(html.contains("<span style=\""));
	assert!(!html.contains("highlight.js"));

	Ok(())
}

#[test]
fn build_rejects_unknown_highlight_theme() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(
		tmp.path(),
		"highlight_theme = \"neon\"\n",
		common::SAMPLE_DOCUMENT,
	)?;

	common::apiref_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("apiref::highlight_theme"));

	assert!(!tmp.path().join("api.html").exists());

	Ok(())
}

#[test]
fn build_writes_to_nested_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(
		tmp.path(),
		"output = \"site/reference/api.html\"\n",
		common::SAMPLE_DOCUMENT,
	)?;

	common::apiref_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert!(tmp.path().join("site/reference/api.html").is_file());

	Ok(())
}

#[test]
fn build_verbose_emits_debug_logs() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path(), "", common::SAMPLE_DOCUMENT)?;

	common::apiref_cmd()
		.arg("build")
		.arg("--verbose")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("internal members moved: 1"))
		.stderr(predicates::str::contains("transformed document"));

	Ok(())
}

#[test]
fn build_flags_parse() {
	let cli = ApirefCli::parse_from(["apiref", "build", "--dry-run", "--watch"]);
	match cli.command {
		Some(Commands::Build { dry_run, watch }) => {
			assert!(dry_run);
			assert!(watch);
		}
		_ => panic!("expected Build command"),
	}

	let cli = ApirefCli::parse_from(["apiref", "build"]);
	match cli.command {
		Some(Commands::Build { dry_run, watch }) => {
			assert!(!dry_run);
			assert!(!watch);
		}
		_ => panic!("expected Build command"),
	}
}
