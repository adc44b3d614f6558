//! Input state for typing a tag name.
//!
//! `Idle -> Editing -> Committing -> Idle`. A commit is produced by submit or
//! blur with non-blank text; cancel and blank text go straight back to idle.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TagInput {
	#[default]
	Idle,
	Editing(String),
	Committing(String),
}

impl TagInput {
	pub fn begin(&mut self) {
		if *self == TagInput::Idle {
			*self = TagInput::Editing(String::new());
		}
	}

	pub fn input(&mut self, text: &str) {
		match self {
			TagInput::Idle => *self = TagInput::Editing(text.to_string()),
			TagInput::Editing(current) => {
				current.clear();
				current.push_str(text);
			}
			TagInput::Committing(_) => {}
		}
	}

	/// Enter pressed.
	pub fn submit(&mut self) -> Option<String> {
		self.commit()
	}

	/// Focus left the input; same as submit.
	pub fn blur(&mut self) -> Option<String> {
		self.commit()
	}

	/// Escape pressed: drop whatever was typed.
	pub fn cancel(&mut self) {
		if let TagInput::Editing(_) = self {
			*self = TagInput::Idle;
		}
	}

	/// The committed tag has been handled.
	pub fn finish(&mut self) {
		if let TagInput::Committing(_) = self {
			*self = TagInput::Idle;
		}
	}

	pub fn text(&self) -> &str {
		match self {
			TagInput::Idle => "",
			TagInput::Editing(text) | TagInput::Committing(text) => text,
		}
	}

	pub fn is_editing(&self) -> bool {
		matches!(self, TagInput::Editing(_))
	}

	fn commit(&mut self) -> Option<String> {
		let TagInput::Editing(text) = self else {
			return None;
		};
		let tag = text.trim().to_string();
		if tag.is_empty() {
			*self = TagInput::Idle;
			return None;
		}
		*self = TagInput::Committing(tag.clone());
		Some(tag)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn submit_commits_trimmed_text() {
		let mut input = TagInput::default();
		input.begin();
		input.input("  funding ");
		assert_eq!(input.submit(), Some("funding".to_string()));
		assert_eq!(input, TagInput::Committing("funding".into()));
		input.finish();
		assert_eq!(input, TagInput::Idle);
	}

	#[test]
	fn blur_commits_like_submit() {
		let mut input = TagInput::default();
		input.input("carry");
		assert_eq!(input.blur(), Some("carry".to_string()));
	}

	#[test]
	fn blank_text_never_commits() {
		let mut input = TagInput::default();
		input.begin();
		input.input("   ");
		assert_eq!(input.submit(), None);
		assert_eq!(input, TagInput::Idle);
	}

	#[test]
	fn cancel_discards_text() {
		let mut input = TagInput::default();
		input.input("oops");
		input.cancel();
		assert_eq!(input, TagInput::Idle);
		assert_eq!(input.blur(), None);
	}

	#[test]
	fn committing_ignores_further_triggers() {
		let mut input = TagInput::default();
		input.input("a");
		input.submit();
		input.input("b");
		assert_eq!(input.blur(), None);
		assert_eq!(input.text(), "a");
	}
}
