use std::fmt;

use derive_more::Deref;
use derive_more::DerefMut;
use derive_more::From;

use crate::config::PreambleMode;
use crate::heading::HeadingLevel;
use crate::heading::HeadingScanner;
use crate::heading::heading_line;

/// Name prefix that marks a member as internal.
pub const INTERNAL_PREFIX: char = '_';

/// Returns `true` when a member name carries the internal prefix.
pub fn is_internal_name(name: &str) -> bool {
	name.starts_with(INTERNAL_PREFIX)
}

/// A document as an ordered sequence of lines.
///
/// Lines are split on `\n` and joined back with `\n`, so a trailing newline
/// survives as a final empty line. A trailing `\r` is stripped from every
/// line, which normalizes CRLF input to LF output.
#[derive(Debug, Clone, Default, Eq, PartialEq, Deref, DerefMut, From)]
pub struct Document(Vec<String>);

impl Document {
	/// Split raw text into lines.
	pub fn from_source(source: impl AsRef<str>) -> Self {
		Self(
			source
				.as_ref()
				.split('\n')
				.map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
				.collect(),
		)
	}

	/// Join the lines back into text.
	pub fn to_source(&self) -> String {
		self.0.join("\n")
	}

	pub fn into_lines(self) -> Vec<String> {
		self.0
	}
}

impl fmt::Display for Document {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_source())
	}
}

/// A `## Name` section nested under a class.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MemberBlock {
	/// Heading text without the `## ` marker.
	pub name: String,
	/// Every line after the heading up to the next heading of either level.
	pub body: Vec<String>,
}

impl MemberBlock {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			body: Vec::new(),
		}
	}

	/// Whether this member is internal. Always derived from `name`.
	pub fn is_internal(&self) -> bool {
		is_internal_name(&self.name)
	}

	/// The heading line followed by the body.
	pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
		std::iter::once(heading_line(HeadingLevel::Member, &self.name))
			.chain(self.body.iter().cloned())
	}
}

/// A `# Name` section and everything under it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ClassBlock {
	/// Heading text without the `# ` marker.
	pub name: String,
	/// Class description: lines between the heading and the first member.
	pub preceding_lines: Vec<String>,
	pub members: Vec<MemberBlock>,
}

impl ClassBlock {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			preceding_lines: Vec::new(),
			members: Vec::new(),
		}
	}

	/// Number of members whose names mark them as internal.
	pub fn internal_count(&self) -> usize {
		self.members.iter().filter(|m| m.is_internal()).count()
	}

	/// Append the class to `out` exactly as parsed, without reordering.
	pub fn write_lines(&self, out: &mut Vec<String>) {
		out.push(heading_line(HeadingLevel::Class, &self.name));
		out.extend(self.preceding_lines.iter().cloned());
		for member in &self.members {
			out.extend(member.lines());
		}
	}
}

/// The result of splitting a document into class and member blocks.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ParsedDocument {
	/// Lines before the first class heading.
	pub preamble: Vec<String>,
	pub classes: Vec<ClassBlock>,
}

impl ParsedDocument {
	/// Reassemble the document in its current block order.
	pub fn to_document(&self, preamble: PreambleMode) -> Document {
		let mut lines = Vec::new();
		if preamble == PreambleMode::Keep {
			lines.extend(self.preamble.iter().cloned());
		}
		for class in &self.classes {
			class.write_lines(&mut lines);
		}
		Document::from(lines)
	}

	pub fn class_names(&self) -> impl Iterator<Item = &str> {
		self.classes.iter().map(|c| c.name.as_str())
	}
}

/// Split a document into ordered class blocks with nested member blocks.
///
/// Body text is kept verbatim. A `##` heading that appears before any class
/// heading is treated as preamble text, since it has no class to attach to.
pub fn parse_document(document: &Document) -> ParsedDocument {
	let mut scanner = HeadingScanner::new();
	let mut parsed = ParsedDocument::default();

	for line in document.iter() {
		let heading = scanner.scan(line);
		let Some(class) = parsed.classes.last_mut() else {
			match heading {
				Some(heading) if heading.level == HeadingLevel::Class => {
					parsed.classes.push(ClassBlock::new(heading.name));
				}
				_ => parsed.preamble.push(line.clone()),
			}
			continue;
		};

		match heading {
			Some(heading) if heading.level == HeadingLevel::Class => {
				parsed.classes.push(ClassBlock::new(heading.name));
			}
			Some(heading) => class.members.push(MemberBlock::new(heading.name)),
			None => {
				match class.members.last_mut() {
					Some(member) => member.body.push(line.clone()),
					None => class.preceding_lines.push(line.clone()),
				}
			}
		}
	}

	parsed
}

/// Convenience wrapper: split raw text into lines and parse it.
pub fn parse(source: impl AsRef<str>) -> ParsedDocument {
	parse_document(&Document::from_source(source))
}
