use std::collections::HashMap;
use std::collections::HashSet;

/// Derive an anchor id from heading text.
///
/// The text is lowercased and every maximal run of characters outside
/// `[a-z0-9]` becomes a single `-`. Leading and trailing runs are kept, so
/// `"_value"` becomes `"-value"`.
pub fn slugify(text: &str) -> String {
	let mut slug = String::with_capacity(text.len());
	let mut in_separator = false;

	for c in text.chars().flat_map(char::to_lowercase) {
		if c.is_ascii_lowercase() || c.is_ascii_digit() {
			slug.push(c);
			in_separator = false;
		} else if !in_separator {
			slug.push('-');
			in_separator = true;
		}
	}

	slug
}

/// Hands out unique slugs within one document.
///
/// The first heading with a given slug keeps it; later ones get `-1`, `-2`
/// and so on, skipping any suffixed id that an earlier heading already owns.
/// Two walks over the same heading sequence produce the same ids.
#[derive(Debug, Clone, Default)]
pub struct Slugger {
	taken: HashSet<String>,
	repeats: HashMap<String, usize>,
}

impl Slugger {
	pub fn new() -> Self {
		Self::default()
	}

	/// Slug `text` and reserve the result.
	pub fn slug(&mut self, text: &str) -> String {
		let base = slugify(text);
		let mut candidate = base.clone();

		while self.taken.contains(&candidate) {
			let count = self.repeats.entry(base.clone()).or_insert(0);
			*count += 1;
			candidate = format!("{base}-{count}");
		}

		self.taken.insert(candidate.clone());
		candidate
	}
}
