use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use apiref_cli::ApirefCli;
use apiref_cli::Commands;
use apiref_cli::OutputFormat;
use apiref_core::ApirefConfig;
use apiref_core::CONFIG_FILE_CANDIDATES;
use apiref_core::FilterMode;
use apiref_core::PreambleMode;
use apiref_core::SiteContext;
use apiref_core::UNKNOWN_VERSION;
use apiref_core::build_site;
use apiref_core::check_site;
use apiref_core::load_site;
use apiref_core::navigation_link_count;
use apiref_core::resolve_product_version;
use apiref_core::scan_versions;
use apiref_core::stamp_index;
use apiref_core::write_site;
use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "APIREF_LOG";

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = ApirefCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_logging(args.verbose, use_color);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Build { dry_run, watch }) => run_build(&args, dry_run, watch),
		Some(Commands::Check { diff }) => run_check(&args, diff),
		Some(Commands::Nav { format }) => run_nav(&args, format),
		Some(Commands::Versions { format }) => run_versions(&args, format),
		Some(Commands::Stamp) => run_stamp(&args),
		Some(Commands::Info) => run_info(&args),
		None => {
			eprintln!("No subcommand specified. Run `apiref --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<apiref_core::ApirefError>() {
			Ok(apiref_err) => {
				let report: miette::Report = (*apiref_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Send `tracing` events to stderr. `APIREF_LOG` takes precedence over the
/// level implied by `--verbose`.
fn init_logging(verbose: bool, use_color: bool) {
	let env_filter = match EnvFilter::try_from_env(LOG_ENV) {
		Ok(filter) => filter,
		Err(_) => EnvFilter::new(if verbose { "debug" } else { "warn" }),
	};

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn resolve_root(args: &ApirefCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn print_section(title: &str) {
	println!();
	println!("{}", colored!(title, bold));
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("{label:<28} {value}");
}

const SAMPLE_CONFIG: &str = "# apiref configuration\n\n# Markdown document to transform and \
                             HTML page to write.\ninput = \"doc.md\"\noutput = \
                             \"api.html\"\ntitle = \"My Library\"\n\n# Pin the version shown \
                             in the page, or extract it from a source file.\n# version = \
                             \"0.1.0\"\n# [version_source]\n# path = \"src/lib.lua\"\n# \
                             pattern = '_VERSION\\s*=\\s*\"([^\"]+)\"'\n\n# Keep only the \
                             listed classes (whitelist) or drop them (blacklist).\n[filter]\nmode \
                             = \"blacklist\"\nexclude = []\n\n# Archived builds live in \
                             versions/v<major>.<minor>.<patch>/api.html.\n[versions]\ndir = \
                             \"versions\"\nmarker = \"api.html\"\n";

const SAMPLE_DOCUMENT: &str = "# Greeter\n\nSays hello.\n\n## new\n\nCreate a greeter.\n\n## \
                               _cache\n\nInternal lookup table.\n\n## greet\n\nReturn a \
                               greeting for `name`.\n";

fn run_init(args: &ApirefCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config_path = ApirefConfig::resolve_path(&root)
		.unwrap_or_else(|| root.join(CONFIG_FILE_CANDIDATES[0]));
	let document_path = root.join(apiref_core::DEFAULT_INPUT);

	let config_exists = config_path.exists();
	let document_exists = document_path.exists();

	if config_exists {
		println!("Config file already exists: {}", config_path.display());
	} else {
		std::fs::write(&config_path, SAMPLE_CONFIG)?;
		println!("Created {}", make_relative(&config_path, &root));
	}

	if document_exists {
		println!("Document already exists: {}", document_path.display());
	} else {
		std::fs::write(&document_path, SAMPLE_DOCUMENT)?;
		println!("Created {}", make_relative(&document_path, &root));
	}

	if !config_exists || !document_exists {
		println!();
		println!("Next steps:");
		println!("  1. Describe each class as `# Class` and each member as `## member`");
		println!("  2. Prefix internal members with `_` to move them behind a warning");
		println!("  3. Run `apiref build` to render the page");
	}

	Ok(())
}

fn run_build(args: &ApirefCli, dry_run: bool, watch: bool) -> Result<(), Box<dyn std::error::Error>> {
	run_build_once(args, dry_run)?;

	if !watch || dry_run {
		return Ok(());
	}

	println!("\nWatching for file changes... (press Ctrl+C to stop)");
	let root = std::fs::canonicalize(resolve_root(args))?;
	let output_path = load_site(&root)?.output_path();
	let ignored_output = output_path.clone();
	let (tx, rx) = mpsc::channel();
	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			let Ok(event) = res else {
				return;
			};
			let relevant = matches!(
				event.kind,
				notify::EventKind::Modify(_) | notify::EventKind::Create(_)
			);
			// Writing the page would otherwise trigger another build.
			if relevant && !event.paths.iter().all(|path| is_output_file(path, &ignored_output)) {
				let _ = tx.send(());
			}
		})?;

	use notify::Watcher;
	watcher.watch(&root, notify::RecursiveMode::Recursive)?;
	tracing::debug!(root = %root.display(), output = %output_path.display(), "watching project");

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, rebuilding...");
		if let Err(e) = run_build_once(args, false) {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

/// The output page itself or one of its temporary siblings.
fn is_output_file(path: &Path, output_path: &Path) -> bool {
	if path == output_path {
		return true;
	}

	path.parent() == output_path.parent()
		&& path
			.file_name()
			.is_some_and(|name| name.to_string_lossy().contains(".tmp-"))
}

fn run_build_once(args: &ApirefCli, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let ctx = load_site(&root)?;
	let result = build_site(&ctx)?;
	let rel = make_relative(&result.output_path, &root);
	let summary = format!(
		"{} class(es), {} member(s), {} archived version(s)",
		result.stats.classes_kept,
		result.stats.members,
		result.versions.len()
	);

	if dry_run {
		let status = if check_site(&result)?.is_ok() {
			"unchanged"
		} else {
			"would change"
		};
		println!("Dry run: {rel} {status} ({summary}).");
		return Ok(());
	}

	write_site(&result)?;
	println!("Built {rel} ({summary}).");

	if args.verbose {
		println!(
			"  classes dropped by filter: {}",
			result.stats.classes_found - result.stats.classes_kept
		);
		println!("  internal members moved: {}", result.stats.internal_members);
		println!("  product version: {}", result.product_version);
	}

	Ok(())
}

fn run_check(args: &ApirefCli, show_diff: bool) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let ctx = load_site(&root)?;
	let result = build_site(&ctx)?;
	let check = check_site(&result)?;
	let rel = make_relative(&result.output_path, &root);

	if check.is_ok() {
		println!("Check passed: {rel} is up to date.");
		return Ok(());
	}

	match &check.current {
		None => eprintln!("Check failed: {rel} does not exist."),
		Some(current) => {
			eprintln!("Check failed: {rel} is out of date.");
			if show_diff {
				eprintln!();
				print_diff(current, &check.expected);
			}
		}
	}

	eprintln!();
	eprintln!("Run `apiref build` to fix.");
	process::exit(1);
}

fn run_nav(args: &ApirefCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let result = build_site(&load_site(&root)?)?;

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string(&result.navigation)?);
		}
		OutputFormat::Text => {
			if result.navigation.is_empty() {
				println!("No classes found.");
				return Ok(());
			}

			for node in &result.navigation {
				println!("{} #{}", colored!(node.name, bold), node.id);
				for member in &node.members {
					println!("  {} #{}", member.name, member.id);
				}
			}

			println!(
				"\n{} class(es), {} link(s)",
				result.navigation.len(),
				navigation_link_count(&result.navigation)
			);
		}
	}

	Ok(())
}

fn run_versions(args: &ApirefCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let ctx = load_site(&root)?;
	let versions = scan_versions(&ctx.versions_dir(), &ctx.config.versions.marker);

	match format {
		OutputFormat::Json => {
			let entries: Vec<serde_json::Value> = versions
				.iter()
				.map(|entry| {
					serde_json::json!({
						"name": entry.name,
						"major": entry.version.major,
						"minor": entry.version.minor,
						"patch": entry.version.patch,
					})
				})
				.collect();
			println!("{}", serde_json::Value::Array(entries));
		}
		OutputFormat::Text => {
			let dir = make_relative(&ctx.versions_dir(), &root);
			if versions.is_empty() {
				println!("No archived versions found in {dir}.");
				return Ok(());
			}

			for entry in &versions {
				println!("{}", entry.name);
			}
			println!("\n{} archived version(s) in {dir}", versions.len());
		}
	}

	Ok(())
}

fn run_stamp(args: &ApirefCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let ctx = load_site(&root)?;

	let Some(index) = &ctx.config.index else {
		return Err("no `[index]` section in the configuration; nothing to stamp".into());
	};

	let version = resolve_product_version(&ctx.root, &ctx.config)?;
	if version == UNKNOWN_VERSION {
		return Err(
			"could not determine the product version; set `version` or `[version_source]`".into(),
		);
	}

	let path = ctx.root.join(&index.path);
	let count = stamp_index(&path, &ctx.config.title, &version)?;
	let rel = make_relative(&path, &root);

	if count == 0 {
		eprintln!(
			"{} no `{} v<version>` mentions found in {rel}",
			colored!("warning:", yellow),
			ctx.config.title
		);
	} else {
		println!("Stamped {rel} with v{version} ({count} replacement(s)).");
	}

	Ok(())
}

fn run_info(args: &ApirefCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let ctx = load_site(&root)?;
	let config = &ctx.config;

	let resolved_config = ctx
		.config_path
		.as_ref()
		.map_or_else(|| "none (defaults)".to_string(), |path| make_relative(path, &root));

	println!("{}", colored!("apiref info", bold));

	print_section("Project");
	print_field("Project root", root.display());
	print_field("Resolved config", resolved_config);
	print_field("Title", &config.title);

	print_section("Document");
	print_field("Input", make_relative(&ctx.input_path(), &root));
	print_field("Output", make_relative(&ctx.output_path(), &root));
	print_field(
		"Preamble",
		match config.preamble {
			PreambleMode::Keep => "keep",
			PreambleMode::Discard => "discard",
		},
	);
	print_field("Raw HTML", if config.allow_html { "allowed" } else { "escaped" });
	print_field(
		"Highlighting",
		if config.highlight {
			config.highlight_theme.as_str()
		} else {
			"off"
		},
	);
	print_field(
		"Template",
		config
			.template
			.as_ref()
			.map_or_else(|| "built-in".to_string(), |path| path.display().to_string()),
	);

	print_section("Filter");
	print_field(
		"Mode",
		match config.filter.mode {
			FilterMode::Whitelist => "whitelist",
			FilterMode::Blacklist => "blacklist",
		},
	);
	let classes = config.filter.active_set();
	if classes.is_empty() {
		print_field("Classes", "none");
	} else {
		print_field(
			"Classes",
			classes.iter().map(String::as_str).collect::<Vec<_>>().join(", "),
		);
	}

	print_stats(&ctx);

	print_section("Versions");
	print_field("Archive dir", make_relative(&ctx.versions_dir(), &root));
	print_field("Marker file", &config.versions.marker);
	let versions = scan_versions(&ctx.versions_dir(), &config.versions.marker);
	print_field("Archived versions", versions.len());
	if let Some(newest) = versions.first() {
		print_field("Newest archive", &newest.name);
	}
	print_field("Product version", resolve_product_version(&ctx.root, config)?);

	Ok(())
}

/// Document statistics, or a note when the input cannot be read.
fn print_stats(ctx: &SiteContext) {
	print_section("Statistics");

	let result = match build_site(ctx) {
		Ok(result) => result,
		Err(e) => {
			print_field("Status", format!("unavailable ({e})"));
			return;
		}
	};

	print_field("Classes found", result.stats.classes_found);
	print_field("Classes kept", result.stats.classes_kept);
	print_field("Members", result.stats.members);
	print_field("Internal members", result.stats.internal_members);
	print_field("Warning sections", result.stats.warning_sections);
	print_field("Navigation links", navigation_link_count(&result.navigation));
	print_field(
		"Output status",
		match check_site(&result) {
			Ok(check) if check.is_ok() => "up to date",
			Ok(check) if check.current.is_none() => "missing",
			Ok(_) => "stale",
			Err(_) => "unreadable",
		},
	);
}

/// Print a line diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
