use std::sync::LazyLock;

use syntect::highlighting::Theme;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::ApirefError;
use crate::ApirefResult;

/// Theme used for fenced code blocks when the config does not name one.
pub const DEFAULT_HIGHLIGHT_THEME: &str = "base16-ocean.dark";

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Turns fenced code into inline-styled HTML with one of syntect's bundled
/// themes. The output needs no stylesheet.
#[derive(Debug, Clone, Copy)]
pub struct Highlighter {
	theme: &'static Theme,
}

impl Highlighter {
	/// Look up a bundled theme by name.
	pub fn new(theme: &str) -> ApirefResult<Self> {
		let Some(found) = THEMES.themes.get(theme) else {
			return Err(ApirefError::HighlightTheme {
				theme: theme.to_string(),
				available: available_themes().join(", "),
			});
		};

		Ok(Self { theme: found })
	}

	/// Highlight `code` written in `lang`, matched against syntax names and
	/// file extensions. Returns `None` for languages syntect does not know.
	pub fn highlight(&self, code: &str, lang: &str) -> Option<String> {
		let syntax = SYNTAXES.find_syntax_by_token(lang)?;

		match highlighted_html_for_string(code, &SYNTAXES, syntax, self.theme) {
			Ok(html) => Some(html),
			Err(error) => {
				tracing::warn!(lang, %error, "could not highlight code block");
				None
			}
		}
	}
}

/// Names of the bundled themes, sorted.
pub fn available_themes() -> Vec<&'static str> {
	THEMES.themes.keys().map(String::as_str).collect()
}
