use std::path::Path;

use regex::NoExpand;
use regex::Regex;

use crate::ApirefError;
use crate::ApirefResult;
use crate::config::ApirefConfig;
use crate::config::VersionSourceConfig;

/// Product version used when none can be determined.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Compile a `[version_source] pattern`, requiring at least one capture group.
pub fn compile_version_pattern(pattern: &str) -> ApirefResult<Regex> {
	let regex = Regex::new(pattern).map_err(|e| {
		ApirefError::InvalidVersionPattern {
			pattern: pattern.to_string(),
			reason: e.to_string(),
		}
	})?;

	if regex.captures_len() < 2 {
		return Err(ApirefError::InvalidVersionPattern {
			pattern: pattern.to_string(),
			reason: "pattern has no capture group".to_string(),
		});
	}

	Ok(regex)
}

/// First capture of `pattern` in `content`.
pub fn extract_version(content: &str, pattern: &Regex) -> Option<String> {
	pattern
		.captures(content)
		.and_then(|captures| captures.get(1))
		.map(|m| m.as_str().to_string())
}

/// Resolve the product version shown in the page.
///
/// An explicit `version` wins. Otherwise the `[version_source]` file is
/// searched; an unreadable file or a pattern with no match degrades to
/// [`UNKNOWN_VERSION`]. Only an invalid pattern is an error.
pub fn resolve_product_version(root: &Path, config: &ApirefConfig) -> ApirefResult<String> {
	if let Some(version) = &config.version {
		return Ok(version.clone());
	}

	let Some(source) = &config.version_source else {
		return Ok(UNKNOWN_VERSION.to_string());
	};

	read_source_version(root, source)
}

fn read_source_version(root: &Path, source: &VersionSourceConfig) -> ApirefResult<String> {
	let pattern = compile_version_pattern(&source.pattern)?;
	let path = root.join(&source.path);

	let content = match std::fs::read_to_string(&path) {
		Ok(content) => content,
		Err(error) => {
			tracing::warn!(path = %path.display(), %error, "could not read version source");
			return Ok(UNKNOWN_VERSION.to_string());
		}
	};

	Ok(extract_version(&content, &pattern).unwrap_or_else(|| {
		tracing::warn!(path = %path.display(), "version pattern did not match");
		UNKNOWN_VERSION.to_string()
	}))
}

/// Replace every `"<title> v<digits and dots>"` mention with the given
/// version. Returns the new text and the number of replacements.
pub fn stamp_text(content: &str, title: &str, version: &str) -> ApirefResult<(String, usize)> {
	let pattern = format!(r"{} v[\d.]+", regex::escape(title));
	let regex = Regex::new(&pattern).map_err(|e| {
		ApirefError::InvalidVersionPattern {
			pattern,
			reason: e.to_string(),
		}
	})?;

	let count = regex.find_iter(content).count();
	let replacement = format!("{title} v{version}");
	let stamped = regex.replace_all(content, NoExpand(&replacement)).into_owned();

	Ok((stamped, count))
}

/// Restamp the landing page at `path` in place. Returns the replacement
/// count; the file is only rewritten when something changed.
pub fn stamp_index(path: &Path, title: &str, version: &str) -> ApirefResult<usize> {
	let content = std::fs::read_to_string(path).map_err(|e| {
		ApirefError::InputRead {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})?;

	let (stamped, count) = stamp_text(&content, title, version)?;
	if stamped != content {
		std::fs::write(path, stamped).map_err(|e| {
			ApirefError::OutputWrite {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})?;
	}

	Ok(count)
}
