use serde::Serialize;

use crate::config::FilterPolicy;
use crate::config::PreambleMode;
use crate::filter::filter_document;
use crate::navigation::NavigationNode;
use crate::navigation::build_navigation;
use crate::parser::Document;
use crate::parser::parse_document;
use crate::sorter::sort_document;

/// Settings for [`transform_document`].
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
	pub policy: FilterPolicy,
	pub preamble: PreambleMode,
}

/// Counts gathered while transforming a document.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct TransformStats {
	/// Classes present in the input.
	pub classes_found: usize,
	/// Classes that passed the filter.
	pub classes_kept: usize,
	/// Members of the kept classes.
	pub members: usize,
	/// Internal members of the kept classes.
	pub internal_members: usize,
	/// Warning sections inserted ahead of internal members.
	pub warning_sections: usize,
	/// Lines dropped because they appeared before the first class.
	pub preamble_lines_dropped: usize,
}

/// A filtered, reordered document and the navigation derived from it.
#[derive(Debug, Clone)]
pub struct TransformedDocument {
	/// The markdown handed to the renderer.
	pub document: Document,
	/// Navigation scanned from `document`.
	pub navigation: Vec<NavigationNode>,
	pub stats: TransformStats,
}

impl TransformedDocument {
	pub fn markdown(&self) -> String {
		self.document.to_source()
	}
}

/// Run the document pipeline: parse, filter classes, sort members, then
/// build navigation from the resulting text.
pub fn transform_document(source: impl AsRef<str>, options: &TransformOptions) -> TransformedDocument {
	let parsed = parse_document(&Document::from_source(source));
	let classes_found = parsed.classes.len();

	let filtered = filter_document(parsed, &options.policy);
	let document = sort_document(&filtered, options.preamble);
	let navigation = build_navigation(document.to_source());

	let members = filtered.classes.iter().map(|c| c.members.len()).sum();
	let internal_members = filtered.classes.iter().map(|c| c.internal_count()).sum();
	let warning_sections = filtered
		.classes
		.iter()
		.filter(|c| c.internal_count() > 0)
		.count();
	let preamble_lines_dropped = match options.preamble {
		PreambleMode::Keep => 0,
		PreambleMode::Discard => filtered.preamble.len(),
	};

	let stats = TransformStats {
		classes_found,
		classes_kept: filtered.classes.len(),
		members,
		internal_members,
		warning_sections,
		preamble_lines_dropped,
	};
	tracing::debug!(?stats, "transformed document");

	TransformedDocument {
		document,
		navigation,
		stats,
	}
}
