use crate::config::PreambleMode;
use crate::heading::HeadingLevel;
use crate::heading::heading_line;
use crate::parser::ClassBlock;
use crate::parser::Document;
use crate::parser::MemberBlock;
use crate::parser::ParsedDocument;

/// Heading text of the section inserted before internal members.
pub const INTERNAL_SECTION_HEADING: &str = "⚠️ Internal Properties";

/// Prose shown under [`INTERNAL_SECTION_HEADING`].
pub const INTERNAL_SECTION_WARNING: &str = "> **Warning:** The following properties are internal \
                                            implementation details and should not be accessed \
                                            directly. They are prefixed with `_` to indicate \
                                            they are private. Accessing these properties may \
                                            break in future versions without notice.";

/// Lines of the divider section inserted ahead of a class's internal members.
pub fn internal_section_lines() -> Vec<String> {
	vec![
		String::new(),
		"---".to_string(),
		String::new(),
		heading_line(HeadingLevel::Member, INTERNAL_SECTION_HEADING),
		String::new(),
		INTERNAL_SECTION_WARNING.to_string(),
		String::new(),
		"---".to_string(),
		String::new(),
	]
}

/// Stable partition of members into `(public, internal)`.
pub fn partition_members(members: &[MemberBlock]) -> (Vec<&MemberBlock>, Vec<&MemberBlock>) {
	members.iter().partition(|member| !member.is_internal())
}

/// Append a class to `out` with public members first, then the warning
/// section and internal members when there are any.
pub fn write_sorted_class(class: &ClassBlock, out: &mut Vec<String>) {
	out.push(heading_line(HeadingLevel::Class, &class.name));
	out.extend(class.preceding_lines.iter().cloned());

	let (public, internal) = partition_members(&class.members);
	for member in public {
		out.extend(member.lines());
	}

	if internal.is_empty() {
		return;
	}

	out.extend(internal_section_lines());
	for member in internal {
		out.extend(member.lines());
	}
}

/// Reorder the members of every class and rebuild the document text.
///
/// The output is plain lines rather than blocks: it is exactly what the
/// navigation builder scans and what the renderer receives.
pub fn sort_document(parsed: &ParsedDocument, preamble: PreambleMode) -> Document {
	let mut lines = Vec::new();
	if preamble == PreambleMode::Keep {
		lines.extend(parsed.preamble.iter().cloned());
	}

	for class in &parsed.classes {
		write_sorted_class(class, &mut lines);
	}

	Document::from(lines)
}
