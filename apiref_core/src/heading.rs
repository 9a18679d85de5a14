//! The two-tier heading grammar shared by the block parser, the navigation
//! builder and the renderer's anchor pass.
//!
//! A line is a class heading when it reads `# <name>` and a member heading
//! when it reads `## <name>`, where `<name>` is non-empty. Nothing else is
//! structural: `#name`, `### name` and indented headings are body text. Lines
//! inside fenced code blocks and raw HTML blocks are never headings, following
//! the CommonMark rules for where those blocks open and close.

use serde::Serialize;

/// Structural level of a heading.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
	/// `# Name`: starts a class block.
	Class,
	/// `## Name`: starts a member block inside the open class.
	Member,
}

impl HeadingLevel {
	/// The markdown heading depth (`1` or `2`).
	pub fn depth(self) -> u8 {
		match self {
			Self::Class => 1,
			Self::Member => 2,
		}
	}

	/// The marker written in front of the heading name.
	pub fn marker(self) -> &'static str {
		match self {
			Self::Class => "#",
			Self::Member => "##",
		}
	}
}

/// A heading recognized on a single line.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Heading<'a> {
	pub level: HeadingLevel,
	pub name: &'a str,
}

impl Heading<'_> {
	/// Render the heading back to its markdown line.
	pub fn to_line(&self) -> String {
		heading_line(self.level, self.name)
	}
}

/// Build the markdown line for a heading of the given level.
pub fn heading_line(level: HeadingLevel, name: &str) -> String {
	format!("{} {name}", level.marker())
}

/// Recognize a class or member heading on a single line, ignoring fences.
pub fn parse_heading(line: &str) -> Option<Heading<'_>> {
	let line = line.strip_suffix('\r').unwrap_or(line);

	if let Some(name) = line.strip_prefix("## ") {
		return (!name.is_empty()).then_some(Heading {
			level: HeadingLevel::Member,
			name,
		});
	}

	let name = line.strip_prefix("# ")?;
	(!name.is_empty()).then_some(Heading {
		level: HeadingLevel::Class,
		name,
	})
}

/// Line-by-line heading recognizer that tracks the CommonMark blocks able to
/// hide a heading line: fenced code and raw HTML blocks.
///
/// Feed every line of a document through [`HeadingScanner::scan`] in order.
#[derive(Debug, Clone, Default)]
pub struct HeadingScanner {
	open: Option<OpenBlock>,
	/// The previous line continued a paragraph, which a generic HTML tag
	/// cannot interrupt.
	in_paragraph: bool,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum OpenBlock {
	Fence(Fence),
	Html(HtmlEnd),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Fence {
	marker: char,
	len: usize,
}

/// How an open HTML block ends.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum HtmlEnd {
	/// A line containing the closing tag of a raw text element.
	RawTag,
	/// A line containing the given marker, such as `-->`.
	Marker(&'static str),
	/// A blank line.
	BlankLine,
}

impl HtmlEnd {
	fn is_end(self, line: &str) -> bool {
		match self {
			Self::RawTag => {
				let lower = line.to_ascii_lowercase();
				RAW_TAGS
					.iter()
					.any(|tag| lower.contains(&format!("</{tag}>")))
			}
			Self::Marker(marker) => line.contains(marker),
			Self::BlankLine => line.trim().is_empty(),
		}
	}
}

/// Elements whose content is never parsed as markdown.
const RAW_TAGS: [&str; 4] = ["pre", "script", "style", "textarea"];

/// Block-level tag names that start an HTML block even inside a paragraph.
const BLOCK_TAGS: [&str; 62] = [
	"address", "article", "aside", "base", "basefont", "blockquote", "body", "caption", "center",
	"col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset",
	"figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5",
	"h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link", "main", "menu",
	"menuitem", "nav", "noframes", "ol", "optgroup", "option", "p", "param", "search", "section",
	"summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "track", "ul",
];

impl HeadingScanner {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the heading on this line, if any, and advances block state.
	pub fn scan<'a>(&mut self, line: &'a str) -> Option<Heading<'a>> {
		let text = line.strip_suffix('\r').unwrap_or(line);

		match self.open {
			Some(OpenBlock::Fence(open)) => {
				if fence_of(text).is_some_and(|(fence, rest)| closes_fence(open, fence, rest)) {
					self.open = None;
				}
				return None;
			}
			Some(OpenBlock::Html(end)) => {
				if end.is_end(text) {
					self.open = None;
					self.in_paragraph = false;
				}
				return None;
			}
			None => {}
		}

		if let Some((fence, _)) = fence_of(text).filter(|(fence, info)| opens_fence(*fence, info)) {
			self.open = Some(OpenBlock::Fence(fence));
			self.in_paragraph = false;
			return None;
		}

		if let Some(end) = html_block_start(text, self.in_paragraph) {
			if !end.is_end(text) {
				self.open = Some(OpenBlock::Html(end));
			}
			self.in_paragraph = false;
			return None;
		}

		let heading = parse_heading(text);
		self.in_paragraph = heading.is_none()
			&& !text.trim().is_empty()
			&& (self.in_paragraph || !starts_indented_code(text));
		heading
	}

	/// Whether the scanner is currently inside a fenced code block.
	pub fn in_fence(&self) -> bool {
		matches!(self.open, Some(OpenBlock::Fence(_)))
	}

	/// Whether the scanner is currently inside a raw HTML block.
	pub fn in_html_block(&self) -> bool {
		matches!(self.open, Some(OpenBlock::Html(_)))
	}
}

/// Detect a code fence (up to three spaces of indentation, then three or more
/// backticks or tildes). Returns the fence and the text after it.
fn fence_of(line: &str) -> Option<(Fence, &str)> {
	let indent = line.len() - line.trim_start_matches(' ').len();
	if indent > 3 {
		return None;
	}

	let trimmed = &line[indent..];
	let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
	let len = trimmed.len() - trimmed.trim_start_matches(marker).len();
	if len < 3 {
		return None;
	}

	Some((Fence { marker, len }, &trimmed[len..]))
}

/// Four columns of indentation outside a paragraph start indented code.
fn starts_indented_code(line: &str) -> bool {
	line.starts_with('\t') || line.starts_with("    ")
}

/// A backtick fence whose info string contains a backtick is paragraph text.
fn opens_fence(fence: Fence, info: &str) -> bool {
	fence.marker == '~' || !info.contains('`')
}

fn closes_fence(open: Fence, fence: Fence, rest: &str) -> bool {
	fence.marker == open.marker && fence.len >= open.len && rest.trim().is_empty()
}

/// Detect the start of a CommonMark HTML block and how it will end.
fn html_block_start(line: &str, in_paragraph: bool) -> Option<HtmlEnd> {
	let indent = line.len() - line.trim_start_matches(' ').len();
	if indent > 3 {
		return None;
	}

	let text = &line[indent..];
	if !text.starts_with('<') {
		return None;
	}
	let lower = text.to_ascii_lowercase();

	let opening = &lower[1..];
	if RAW_TAGS
		.iter()
		.any(|tag| opening.strip_prefix(tag).is_some_and(ends_tag_name))
	{
		return Some(HtmlEnd::RawTag);
	}
	if lower.starts_with("<!--") {
		return Some(HtmlEnd::Marker("-->"));
	}
	if lower.starts_with("<?") {
		return Some(HtmlEnd::Marker("?>"));
	}
	if lower.starts_with("<![cdata[") {
		return Some(HtmlEnd::Marker("]]>"));
	}
	if lower.starts_with("<!") && lower[2..].starts_with(|c: char| c.is_ascii_alphabetic()) {
		return Some(HtmlEnd::Marker(">"));
	}

	let (closing, name, after) = split_tag_name(&lower)?;
	if BLOCK_TAGS.contains(&name) && (ends_tag_name(after) || after.starts_with("/>")) {
		return Some(HtmlEnd::BlankLine);
	}

	let complete = if closing {
		after.trim_start() == ">"
	} else {
		is_open_tag_rest(after)
	};
	(!in_paragraph && complete && !RAW_TAGS.contains(&name)).then_some(HtmlEnd::BlankLine)
}

fn ends_tag_name(after: &str) -> bool {
	after.is_empty() || after.starts_with(|c: char| c == '>' || c.is_ascii_whitespace())
}

/// Split `<name...` or `</name...` into `(closing, name, rest)`. The rest has
/// trailing whitespace removed.
fn split_tag_name(tag: &str) -> Option<(bool, &str, &str)> {
	let body = tag.strip_prefix('<')?;
	let (closing, body) = match body.strip_prefix('/') {
		Some(body) => (true, body),
		None => (false, body),
	};

	if !body.starts_with(|c: char| c.is_ascii_alphabetic()) {
		return None;
	}
	let len = body
		.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
		.unwrap_or(body.len());

	Some((closing, &body[..len], body[len..].trim_end()))
}

/// The attributes and end of an open tag that fills the rest of the line.
fn is_open_tag_rest(rest: &str) -> bool {
	let Some(attributes) = rest.strip_suffix('>') else {
		return false;
	};
	let attributes = attributes.strip_suffix('/').unwrap_or(attributes);

	(attributes.is_empty() || attributes.starts_with(|c: char| c.is_ascii_whitespace()))
		&& !attributes.contains(['<', '>'])
}

/// Iterate over every heading in `lines`, yielding the zero-based line index.
pub fn scan_headings<'a, I>(lines: I) -> impl Iterator<Item = (usize, Heading<'a>)>
where
	I: IntoIterator<Item = &'a str>,
{
	let mut scanner = HeadingScanner::new();
	lines
		.into_iter()
		.enumerate()
		.filter_map(move |(index, line)| scanner.scan(line).map(|heading| (index, heading)))
}
