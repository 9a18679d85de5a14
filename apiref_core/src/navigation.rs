use serde::Serialize;

use crate::heading::Heading;
use crate::heading::HeadingLevel;
use crate::heading::scan_headings;
use crate::slug::Slugger;

/// One class entry in the navigation panel.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct NavigationNode {
	pub name: String,
	/// Anchor id of the class heading.
	pub id: String,
	pub members: Vec<NavigationMember>,
}

/// One member link nested under a class.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct NavigationMember {
	pub name: String,
	pub id: String,
}

/// A structural heading together with its zero-based source line and the
/// anchor id it is published under.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AnchoredHeading<'a> {
	pub line: usize,
	pub heading: Heading<'a>,
	pub id: String,
}

/// Scan a document once and slug every class and member heading in order.
///
/// This is the single source of anchor ids: the navigation tree and the
/// renderer's `id` attributes are both read from it.
pub fn anchor_headings(document: &str) -> Vec<AnchoredHeading<'_>> {
	let mut slugger = Slugger::new();

	scan_headings(document.split('\n'))
		.map(|(line, heading)| {
			AnchoredHeading {
				line,
				heading,
				id: slugger.slug(heading.name),
			}
		})
		.collect()
}

/// Build the navigation tree by scanning the final document text.
///
/// This re-reads the text instead of walking parsed blocks, so every node
/// corresponds to a heading that will actually be rendered. Member headings
/// that appear before the first class still reserve their anchor id but are
/// not listed.
pub fn build_navigation(document: impl AsRef<str>) -> Vec<NavigationNode> {
	let mut navigation: Vec<NavigationNode> = Vec::new();

	for AnchoredHeading { heading, id, .. } in anchor_headings(document.as_ref()) {
		match heading.level {
			HeadingLevel::Class => {
				navigation.push(NavigationNode {
					name: heading.name.to_string(),
					id,
					members: Vec::new(),
				});
			}
			HeadingLevel::Member => {
				if let Some(class) = navigation.last_mut() {
					class.members.push(NavigationMember {
						name: heading.name.to_string(),
						id,
					});
				}
			}
		}
	}

	navigation
}

/// Total number of links in a navigation tree (classes plus members).
pub fn navigation_link_count(navigation: &[NavigationNode]) -> usize {
	navigation.iter().map(|node| 1 + node.members.len()).sum()
}
