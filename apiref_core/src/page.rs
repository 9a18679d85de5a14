use std::path::Path;

use serde::Serialize;

use crate::ApirefError;
use crate::ApirefResult;
use crate::navigation::NavigationNode;
use crate::versions::VersionEntry;

/// The built-in page template.
pub const DEFAULT_TEMPLATE: &str = include_str!("templates/api.html");

/// Name the template is registered under. The `.html` suffix turns on
/// minijinja's HTML auto-escaping.
const TEMPLATE_NAME: &str = "api.html";

/// Everything the page template can reference.
#[derive(Debug, Serialize)]
pub struct PageContext<'a> {
	pub title: &'a str,
	pub version: &'a str,
	pub navigation: &'a [NavigationNode],
	/// Archived versions, newest first. The selector is omitted when empty.
	pub versions: &'a [VersionEntry],
	/// Rendered HTML body, inserted without escaping.
	pub content: &'a str,
}

/// Read a custom template from disk.
pub fn load_template(path: &Path) -> ApirefResult<String> {
	std::fs::read_to_string(path).map_err(|e| {
		ApirefError::TemplateLoad {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})
}

/// Assemble the final page.
pub fn render_page(template: &str, context: &PageContext<'_>) -> ApirefResult<String> {
	let mut env = minijinja::Environment::new();
	env.set_keep_trailing_newline(true);
	env.add_template(TEMPLATE_NAME, template)
		.map_err(|e| ApirefError::TemplateRender(e.to_string()))?;

	let template = env
		.get_template(TEMPLATE_NAME)
		.map_err(|e| ApirefError::TemplateRender(e.to_string()))?;

	template
		.render(context)
		.map_err(|e| ApirefError::TemplateRender(e.to_string()))
}
