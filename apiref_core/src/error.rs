use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ApirefError {
	#[error(transparent)]
	#[diagnostic(code(apiref::io_error))]
	Io(#[from] std::io::Error),

	#[error("failure to render markdown: {0}")]
	#[diagnostic(code(apiref::markdown))]
	Markdown(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(apiref::config_parse),
		help(
			"check that apiref.toml is valid TOML with optional [filter], [versions], \
			 [version_source] and [index] sections"
		)
	)]
	ConfigParse(String),

	#[error("failed to read input document `{path}`: {reason}")]
	#[diagnostic(
		code(apiref::input_read),
		help("set `input` in apiref.toml to the markdown reference you want to publish")
	)]
	InputRead { path: String, reason: String },

	#[error("failed to write output `{path}`: {reason}")]
	#[diagnostic(code(apiref::output_write))]
	OutputWrite { path: String, reason: String },

	#[error("invalid version identifier: `{0}`")]
	#[diagnostic(
		code(apiref::invalid_version),
		help("version identifiers look like `v<major>.<minor>.<patch>`, e.g. `v1.2.0`")
	)]
	InvalidVersion(String),

	#[error("invalid version pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(apiref::invalid_version_pattern),
		help("`[version_source] pattern` must be a regular expression with one capture group")
	)]
	InvalidVersionPattern { pattern: String, reason: String },

	#[error("failed to load page template `{path}`: {reason}")]
	#[diagnostic(code(apiref::template_load))]
	TemplateLoad { path: String, reason: String },

	#[error("unknown highlight theme `{theme}`")]
	#[diagnostic(
		code(apiref::highlight_theme),
		help("set `highlight_theme` in apiref.toml to one of: {available}")
	)]
	HighlightTheme { theme: String, available: String },

	#[error("page template rendering failed: {0}")]
	#[diagnostic(code(apiref::template_render))]
	TemplateRender(String),
}

pub type ApirefResult<T> = Result<T, ApirefError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
