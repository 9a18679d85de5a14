use std::path::Path;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use crate::ApirefError;
use crate::ApirefResult;
use crate::config::ApirefConfig;
use crate::navigation::NavigationNode;
use crate::page::DEFAULT_TEMPLATE;
use crate::page::PageContext;
use crate::page::load_template;
use crate::page::render_page;
use crate::pipeline::TransformOptions;
use crate::pipeline::TransformStats;
use crate::pipeline::transform_document;
use crate::render::RenderOptions;
use crate::render::render_markdown;
use crate::version_source::resolve_product_version;
use crate::versions::VersionEntry;
use crate::versions::scan_versions;

/// A project root together with its loaded configuration.
#[derive(Debug, Clone)]
pub struct SiteContext {
	pub root: PathBuf,
	pub config: ApirefConfig,
	/// The config file that was loaded, if any.
	pub config_path: Option<PathBuf>,
}

impl SiteContext {
	pub fn new(root: impl Into<PathBuf>, config: ApirefConfig) -> Self {
		Self {
			root: root.into(),
			config,
			config_path: None,
		}
	}

	pub fn input_path(&self) -> PathBuf {
		self.root.join(&self.config.input)
	}

	pub fn output_path(&self) -> PathBuf {
		self.root.join(&self.config.output)
	}

	pub fn versions_dir(&self) -> PathBuf {
		self.root.join(&self.config.versions.dir)
	}

	pub fn transform_options(&self) -> TransformOptions {
		TransformOptions {
			policy: self.config.filter.clone(),
			preamble: self.config.preamble,
		}
	}
}

/// Discover and load the configuration for the project at `root`.
pub fn load_site(root: &Path) -> ApirefResult<SiteContext> {
	let config_path = ApirefConfig::resolve_path(root);
	let config = ApirefConfig::load_or_default(root)?;
	tracing::debug!(
		root = %root.display(),
		config = ?config_path,
		"loaded site configuration"
	);

	Ok(SiteContext {
		root: root.to_path_buf(),
		config,
		config_path,
	})
}

/// A fully assembled page that has not been written yet.
#[derive(Debug, Clone)]
pub struct BuildResult {
	pub output_path: PathBuf,
	pub html: String,
	/// The transformed markdown that was rendered.
	pub markdown: String,
	pub navigation: Vec<NavigationNode>,
	pub versions: Vec<VersionEntry>,
	pub product_version: String,
	pub stats: TransformStats,
}

/// Read the input document (fatal on failure), run the pipeline, discover
/// archived versions (never fatal) and assemble the page in memory.
pub fn build_site(ctx: &SiteContext) -> ApirefResult<BuildResult> {
	let input_path = ctx.input_path();
	let source = std::fs::read_to_string(&input_path).map_err(|e| {
		ApirefError::InputRead {
			path: input_path.display().to_string(),
			reason: e.to_string(),
		}
	})?;

	let transformed = transform_document(&source, &ctx.transform_options());
	let markdown = transformed.markdown();
	let content = render_markdown(
		&markdown,
		&RenderOptions {
			allow_html: ctx.config.allow_html,
			highlight_theme: ctx
				.config
				.highlight
				.then(|| ctx.config.highlight_theme.clone()),
		},
	)?;

	let versions = scan_versions(&ctx.versions_dir(), &ctx.config.versions.marker);
	let product_version = resolve_product_version(&ctx.root, &ctx.config)?;

	let template = match &ctx.config.template {
		Some(path) => load_template(&ctx.root.join(path))?,
		None => DEFAULT_TEMPLATE.to_string(),
	};
	let html = render_page(
		&template,
		&PageContext {
			title: &ctx.config.title,
			version: &product_version,
			navigation: &transformed.navigation,
			versions: &versions,
			content: &content,
		},
	)?;

	Ok(BuildResult {
		output_path: ctx.output_path(),
		html,
		markdown,
		navigation: transformed.navigation,
		versions,
		product_version,
		stats: transformed.stats,
	})
}

/// Write the page through a temporary file and a rename, so a failure never
/// leaves a partially written output behind.
pub fn write_site(result: &BuildResult) -> ApirefResult<()> {
	let path = &result.output_path;
	let output_error = |e: std::io::Error| {
		ApirefError::OutputWrite {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	};

	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		std::fs::create_dir_all(parent).map_err(output_error)?;
	}

	let temp_path = path.with_extension(format!(
		"html.tmp-{}-{}",
		std::process::id(),
		std::time::SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_or(0, |duration| duration.as_nanos())
	));

	std::fs::write(&temp_path, &result.html).map_err(output_error)?;
	if let Err(e) = std::fs::rename(&temp_path, path) {
		let _ = std::fs::remove_file(&temp_path);
		return Err(output_error(e));
	}

	tracing::info!(path = %path.display(), bytes = result.html.len(), "wrote page");
	Ok(())
}

/// Comparison between a fresh build and the page on disk.
#[derive(Debug, Clone)]
pub struct CheckResult {
	/// Current content of the output file, `None` when it does not exist.
	pub current: Option<String>,
	pub expected: String,
}

impl CheckResult {
	/// Returns true when the output exists and matches the fresh build.
	pub fn is_ok(&self) -> bool {
		self.current.as_deref() == Some(self.expected.as_str())
	}
}

/// Compare a build against the output file currently on disk.
pub fn check_site(result: &BuildResult) -> ApirefResult<CheckResult> {
	let current = match std::fs::read_to_string(&result.output_path) {
		Ok(content) => Some(content),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
		Err(e) => return Err(e.into()),
	};

	Ok(CheckResult {
		current,
		expected: result.html.clone(),
	})
}
