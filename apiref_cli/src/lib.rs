use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Turn one flat markdown API reference into a filtered, navigable HTML page.",
	long_about = "apiref reads a markdown document structured as `# Class` and `## member` \
	              headings, drops classes excluded by the configured filter, moves `_internal` \
	              members behind a warning divider and renders a single HTML page with a \
	              navigation sidebar and a selector for archived versions.\n\nQuick start:\n  \
	              apiref init      Create a sample config and document\n  apiref build     \
	              Render the page\n  apiref check     Verify the page is up to date\n  apiref \
	              info      Inspect the resolved configuration"
)]
pub struct ApirefCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output and debug logging.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `apiref.toml` and `doc.md` in the project root.
	///
	/// Existing files are left untouched, so running this twice is safe.
	Init,
	/// Build the HTML page from the configured markdown document.
	///
	/// Runs the whole pipeline: filters classes, moves internal members
	/// behind a warning section, renders the markdown, discovers archived
	/// versions and writes the page. The page is replaced atomically.
	Build {
		/// Run the pipeline and report what would be written without
		/// touching the output file.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Rebuild automatically whenever a file in the project changes.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// Check that the page on disk matches a fresh build.
	///
	/// Exits with status `1` when the output is missing or stale. Ideal for
	/// CI pipelines that commit the generated page.
	Check {
		/// Show a line diff between the page on disk and a fresh build.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// Print the navigation tree of the transformed document.
	Nav {
		/// Output format. Use `text` for an indented tree or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List archived versions, newest first.
	Versions {
		/// Output format. Use `text` for one version per line or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Rewrite `<title> v<version>` mentions in the configured index page.
	///
	/// Requires an `[index]` section in `apiref.toml`. The version comes from
	/// the `version` field or the `[version_source]` file.
	Stamp,
	/// Print the resolved configuration and document statistics.
	Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
