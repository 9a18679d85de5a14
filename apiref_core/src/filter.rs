use crate::config::FilterPolicy;
use crate::parser::ClassBlock;
use crate::parser::ParsedDocument;

/// Keep the classes whose names satisfy `policy`, in their original order.
///
/// Dropped classes go with all their members. Filtering is idempotent.
pub fn filter_classes(classes: Vec<ClassBlock>, policy: &FilterPolicy) -> Vec<ClassBlock> {
	let total = classes.len();
	let kept: Vec<ClassBlock> = classes
		.into_iter()
		.filter(|class| {
			let allowed = policy.allows(&class.name);
			if !allowed {
				tracing::trace!(class = %class.name, mode = ?policy.mode, "dropping class");
			}
			allowed
		})
		.collect();

	tracing::debug!(total, kept = kept.len(), mode = ?policy.mode, "filtered classes");
	kept
}

/// Apply [`filter_classes`] to a parsed document. The preamble is untouched.
pub fn filter_document(parsed: ParsedDocument, policy: &FilterPolicy) -> ParsedDocument {
	ParsedDocument {
		preamble: parsed.preamble,
		classes: filter_classes(parsed.classes, policy),
	}
}
