use std::collections::HashMap;

use markdown::Options;
use markdown::mdast::Node;
use markdown::to_html_with_options;
use markdown::to_mdast;

use crate::ApirefError;
use crate::ApirefResult;
use crate::AnchoredHeading;
use crate::anchor_headings;
use crate::highlight::DEFAULT_HIGHLIGHT_THEME;
use crate::highlight::Highlighter;

/// Options for the markdown renderer.
#[derive(Debug, Clone)]
pub struct RenderOptions {
	/// Pass raw HTML in the document through to the output.
	pub allow_html: bool,
	/// Bundled syntect theme for fenced code. `None` leaves code blocks plain.
	pub highlight_theme: Option<String>,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			allow_html: true,
			highlight_theme: Some(DEFAULT_HIGHLIGHT_THEME.to_string()),
		}
	}
}

/// A fenced or indented code block as it appears in the source.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CodeBlock {
	pub lang: Option<String>,
	pub value: String,
}

/// What the compiled HTML will contain, in output order.
///
/// `anchors` has one entry per bare `<h1>`/`<h2>` opening tag and
/// `code_blocks` one entry per `<pre><code` sequence. Tags that come from raw
/// HTML in the document hold `None` so the pairing stays aligned.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct RenderPlan {
	pub anchors: Vec<Option<String>>,
	pub code_blocks: Vec<Option<CodeBlock>>,
}

/// Render markdown to HTML, giving every class and member heading an `id`
/// and a self link that match the navigation tree.
///
/// Anchors come from [`anchor_headings`], the same pass that builds the
/// navigation. A heading the markdown parser produces on a line the scan did
/// not report (setext, indented, inside a container) is rendered without an
/// id. Fenced code with a known language is highlighted when a theme is set.
pub fn render_markdown(source: &str, options: &RenderOptions) -> ApirefResult<String> {
	let mut md_options = Options::gfm();
	md_options.compile.allow_dangerous_html = options.allow_html;

	let html = to_html_with_options(source, &md_options)
		.map_err(|e| ApirefError::Markdown(e.to_string()))?;
	let plan = plan_render(source, &md_options)?;
	let html = inject_heading_ids(&html, &plan.anchors);

	match &options.highlight_theme {
		Some(theme) => {
			let highlighter = Highlighter::new(theme)?;
			Ok(highlight_code_blocks(&html, &plan.code_blocks, &highlighter))
		}
		None => Ok(html),
	}
}

/// Walk the parsed document once and record the heading anchors and code
/// blocks in the order the compiler emits them.
pub fn plan_render(source: &str, options: &Options) -> ApirefResult<RenderPlan> {
	let mdast =
		to_mdast(source, &options.parse).map_err(|e| ApirefError::Markdown(e.to_string()))?;
	let headings: HashMap<usize, AnchoredHeading<'_>> = anchor_headings(source)
		.into_iter()
		.map(|anchored| (anchored.line, anchored))
		.collect();
	let mut plan = RenderPlan::default();

	collect_plan(
		&mdast,
		&headings,
		options.compile.allow_dangerous_html,
		&mut plan,
	);

	Ok(plan)
}

fn collect_plan(
	node: &Node,
	headings: &HashMap<usize, AnchoredHeading<'_>>,
	raw_html: bool,
	plan: &mut RenderPlan,
) {
	match node {
		Node::Heading(heading) if heading.depth <= 2 => {
			let anchor = heading
				.position
				.as_ref()
				.filter(|position| position.start.column == 1)
				.and_then(|position| headings.get(&position.start.line.checked_sub(1)?))
				.filter(|anchored| anchored.heading.level.depth() == heading.depth)
				.map(|anchored| anchored.id.clone());
			let anchored = anchor.is_some();
			plan.anchors.push(anchor);

			// The content of an anchored heading is copied without scanning.
			if !anchored {
				for child in &heading.children {
					collect_plan(child, headings, raw_html, plan);
				}
			}
		}
		Node::Code(code) => {
			plan.code_blocks.push(Some(CodeBlock {
				lang: code.lang.clone(),
				value: code.value.clone(),
			}));
		}
		Node::Html(html) if raw_html => {
			let mut rest = html.value.as_str();
			while let Some(start) = next_heading_tag(rest) {
				plan.anchors.push(None);
				rest = &rest[start + 4..];
			}
			let code_tags = html.value.matches(CODE_BLOCK_OPEN).count();
			plan.code_blocks.extend(std::iter::repeat_n(None, code_tags));
		}
		_ => {
			if let Some(children) = node.children() {
				for child in children {
					collect_plan(child, headings, raw_html, plan);
				}
			}
		}
	}
}

/// Give the rendered `<h1>` and `<h2>` elements an `id` and wrap their
/// content in a link to themselves, pairing the n-th tag with the n-th anchor.
pub fn inject_heading_ids(html: &str, anchors: &[Option<String>]) -> String {
	let mut output = String::with_capacity(html.len() + anchors.len() * 80);
	let mut rest = html;
	let mut index = 0;

	while let Some(start) = next_heading_tag(rest) {
		output.push_str(&rest[..start]);
		let level = &rest[start + 2..start + 3];
		let body = start + 4;

		let end = match anchors.get(index) {
			Some(Some(id)) => {
				let close = format!("</h{level}>");
				let end = rest[body..].find(&close).map_or(rest.len(), |offset| body + offset);
				output.push_str(&format!(
					"<h{level} id=\"{id}\" tabindex=\"-1\"><a class=\"header-anchor\" href=\"#{id}\">"
				));
				output.push_str(&rest[body..end]);
				output.push_str("</a>");
				end
			}
			_ => {
				output.push_str(&rest[start..body]);
				body
			}
		};

		index += 1;
		rest = &rest[end..];
	}

	output.push_str(rest);
	output
}

/// Byte offset of the next bare `<h1>` or `<h2>` opening tag.
fn next_heading_tag(html: &str) -> Option<usize> {
	let bytes = html.as_bytes();
	html.match_indices("<h").map(|(index, _)| index).find(|&index| {
		matches!(
			bytes.get(index + 2..index + 4),
			Some([b'1' | b'2', b'>'])
		)
	})
}

const CODE_BLOCK_OPEN: &str = "<pre><code";
const CODE_BLOCK_CLOSE: &str = "</code></pre>";

/// Replace each rendered code block that has a known language with its
/// highlighted form, pairing the n-th `<pre><code` with the n-th block.
///
/// A block is only replaced when its rendered text still matches the source,
/// so a mispaired block is left as the compiler wrote it.
pub fn highlight_code_blocks(
	html: &str,
	blocks: &[Option<CodeBlock>],
	highlighter: &Highlighter,
) -> String {
	let mut output = String::with_capacity(html.len() * 2);
	let mut rest = html;
	let mut index = 0;

	while let Some(start) = rest.find(CODE_BLOCK_OPEN) {
		output.push_str(&rest[..start]);
		let block = blocks.get(index).and_then(Option::as_ref);
		index += 1;

		let (Some(block), Some(close)) = (block, rest[start..].find(CODE_BLOCK_CLOSE)) else {
			let open_end = start + CODE_BLOCK_OPEN.len();
			output.push_str(&rest[start..open_end]);
			rest = &rest[open_end..];
			continue;
		};
		let end = start + close + CODE_BLOCK_CLOSE.len();
		let rendered = &rest[start..end];

		let highlighted = block
			.lang
			.as_deref()
			.filter(|_| rendered_text(rendered) == Some(escape_html(&block.value).as_str()))
			.and_then(|lang| highlighter.highlight(&block.value, lang));

		match highlighted {
			Some(highlighted) => output.push_str(highlighted.trim_end_matches('\n')),
			None => output.push_str(rendered),
		}

		rest = &rest[end..];
	}

	output.push_str(rest);
	output
}

/// Inner text of a rendered `<pre><code ...>...</code></pre>` block without
/// the trailing newline the compiler adds.
fn rendered_text(rendered: &str) -> Option<&str> {
	let after_open = &rendered[CODE_BLOCK_OPEN.len()..];
	let text = &after_open[after_open.find('>')? + 1..];
	let text = text.strip_suffix(CODE_BLOCK_CLOSE)?;

	Some(text.strip_suffix('\n').unwrap_or(text))
}

fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());

	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			_ => escaped.push(c),
		}
	}

	escaped
}
