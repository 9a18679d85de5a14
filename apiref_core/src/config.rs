use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::ApirefError;
use crate::ApirefResult;
use crate::DEFAULT_HIGHLIGHT_THEME;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["apiref.toml", ".apiref.toml", ".config/apiref.toml"];

/// Default markdown document read by `apiref build`.
pub const DEFAULT_INPUT: &str = "doc.md";

/// Default HTML page written by `apiref build`.
pub const DEFAULT_OUTPUT: &str = "api.html";

/// Default directory holding archived versions of the rendered page.
pub const DEFAULT_VERSIONS_DIR: &str = "versions";

/// File that must exist inside an archived version directory for it to count
/// as a completed build.
pub const DEFAULT_VERSION_MARKER: &str = "api.html";

/// Configuration loaded from an `apiref.toml` file.
///
/// ```toml
/// input = "doc.md"
/// output = "api.html"
/// title = "FlexLöve"
/// preamble = "keep"
/// highlight_theme = "base16-ocean.dark"
///
/// [filter]
/// mode = "whitelist"
/// include = ["Animation", "Color", "Element"]
/// exclude = ["Renderer"]
///
/// [versions]
/// dir = "versions"
/// marker = "api.html"
///
/// [version_source]
/// path = "../FlexLove.lua"
/// pattern = '_VERSION\s*=\s*"([^"]+)"'
///
/// [index]
/// path = "index.html"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ApirefConfig {
	/// Markdown document to transform, relative to the project root.
	#[serde(default = "default_input")]
	pub input: PathBuf,
	/// HTML page to write, relative to the project root.
	#[serde(default = "default_output")]
	pub output: PathBuf,
	/// Product name shown in the page header and title.
	#[serde(default = "default_title")]
	pub title: String,
	/// Explicit product version. Takes precedence over `[version_source]`.
	#[serde(default)]
	pub version: Option<String>,
	/// What happens to lines that appear before the first class heading.
	#[serde(default)]
	pub preamble: PreambleMode,
	/// Whether raw HTML inside the document is passed through to the page.
	#[serde(default = "default_allow_html")]
	pub allow_html: bool,
	/// Whether fenced code with a known language is syntax highlighted.
	#[serde(default = "default_highlight")]
	pub highlight: bool,
	/// Bundled syntect theme used for highlighted code.
	#[serde(default = "default_highlight_theme")]
	pub highlight_theme: String,
	/// Custom page template replacing the built-in one.
	#[serde(default)]
	pub template: Option<PathBuf>,
	/// Which classes survive into the published page.
	#[serde(default)]
	pub filter: FilterPolicy,
	/// Where archived versions of the page live.
	#[serde(default)]
	pub versions: VersionsConfig,
	/// Source file to extract the product version from.
	#[serde(default)]
	pub version_source: Option<VersionSourceConfig>,
	/// Landing page whose version mentions are restamped by `apiref stamp`.
	#[serde(default)]
	pub index: Option<IndexConfig>,
}

impl Default for ApirefConfig {
	fn default() -> Self {
		Self {
			input: default_input(),
			output: default_output(),
			title: default_title(),
			version: None,
			preamble: PreambleMode::default(),
			allow_html: default_allow_html(),
			highlight: default_highlight(),
			highlight_theme: default_highlight_theme(),
			template: None,
			filter: FilterPolicy::default(),
			versions: VersionsConfig::default(),
			version_source: None,
			index: None,
		}
	}
}

fn default_input() -> PathBuf {
	PathBuf::from(DEFAULT_INPUT)
}

fn default_output() -> PathBuf {
	PathBuf::from(DEFAULT_OUTPUT)
}

fn default_title() -> String {
	"API Reference".to_string()
}

fn default_allow_html() -> bool {
	true
}

fn default_highlight() -> bool {
	true
}

fn default_highlight_theme() -> String {
	DEFAULT_HIGHLIGHT_THEME.to_string()
}

/// Controls what happens to content that appears before the first class
/// heading.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PreambleMode {
	/// Emit the preamble verbatim ahead of the first class.
	#[default]
	Keep,
	/// Drop the preamble entirely.
	Discard,
}

/// Which of the two class sets is consulted.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
	/// Only classes named in `include` pass.
	Whitelist,
	/// Every class passes except those named in `exclude`.
	#[default]
	Blacklist,
}

/// Class-level include/exclude policy.
///
/// Exactly one of the sets is active, selected by `mode`. The default policy
/// is an empty blacklist, which keeps every class.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct FilterPolicy {
	#[serde(default)]
	pub mode: FilterMode,
	#[serde(default)]
	pub include: BTreeSet<String>,
	#[serde(default)]
	pub exclude: BTreeSet<String>,
}

impl FilterPolicy {
	/// Keep only the named classes.
	pub fn whitelist<I, S>(include: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			mode: FilterMode::Whitelist,
			include: include.into_iter().map(Into::into).collect(),
			exclude: BTreeSet::new(),
		}
	}

	/// Keep everything except the named classes.
	pub fn blacklist<I, S>(exclude: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			mode: FilterMode::Blacklist,
			include: BTreeSet::new(),
			exclude: exclude.into_iter().map(Into::into).collect(),
		}
	}

	/// Returns `true` when a class with this name survives the policy.
	pub fn allows(&self, class_name: &str) -> bool {
		match self.mode {
			FilterMode::Whitelist => self.include.contains(class_name),
			FilterMode::Blacklist => !self.exclude.contains(class_name),
		}
	}

	/// The set consulted by the active mode.
	pub fn active_set(&self) -> &BTreeSet<String> {
		match self.mode {
			FilterMode::Whitelist => &self.include,
			FilterMode::Blacklist => &self.exclude,
		}
	}
}

/// Location of archived page versions.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionsConfig {
	/// Directory containing one `v<major>.<minor>.<patch>` folder per archived
	/// version.
	#[serde(default = "default_versions_dir")]
	pub dir: PathBuf,
	/// File that marks an archived version as complete.
	#[serde(default = "default_version_marker")]
	pub marker: String,
}

impl Default for VersionsConfig {
	fn default() -> Self {
		Self {
			dir: default_versions_dir(),
			marker: default_version_marker(),
		}
	}
}

fn default_versions_dir() -> PathBuf {
	PathBuf::from(DEFAULT_VERSIONS_DIR)
}

fn default_version_marker() -> String {
	DEFAULT_VERSION_MARKER.to_string()
}

/// Extract the product version from a source file with a regular expression.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionSourceConfig {
	/// File to search, relative to the project root.
	pub path: PathBuf,
	/// Regular expression whose first capture group is the version.
	pub pattern: String,
}

/// Landing page kept in sync with the product version.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
	pub path: PathBuf,
}

impl ApirefConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> ApirefResult<Option<ApirefConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;

		Ok(Some(config))
	}

	/// Parse a config from TOML text.
	pub fn from_toml(content: &str) -> ApirefResult<ApirefConfig> {
		toml::from_str(content).map_err(|e| ApirefError::ConfigParse(e.to_string()))
	}

	/// Load the config at `root`, falling back to defaults when no config
	/// file exists.
	pub fn load_or_default(root: &Path) -> ApirefResult<ApirefConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}
}
