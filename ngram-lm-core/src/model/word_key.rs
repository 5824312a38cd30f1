use std::fmt;

use serde::{Deserialize, Serialize};

use super::tokens::START;

/// Ordered tuple of tokens used as a key in count and parameter tables.
///
/// Two keys are equal when every position holds the same string. A key is
/// never modified once built: rewriting a key produces a new one.
///
/// ## Invariants
/// - A key stored in a table of order `k` has exactly `k` tokens
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordKey {
	words: Vec<String>,
}

impl WordKey {
	/// Builds a key from its tokens.
	pub fn new<I, S>(words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { words: words.into_iter().map(Into::into).collect() }
	}

	/// Extracts the window of `order` tokens ending at position `end`.
	///
	/// Positions before the start of `tokens` are filled with `<START>`.
	pub fn window<S: AsRef<str>>(tokens: &[S], end: usize, order: usize) -> Self {
		let words = (0..order)
			.map(|offset| {
				// position of this slot is end + 1 - order + offset
				match (end + 1 + offset).checked_sub(order) {
					Some(pos) => tokens[pos].as_ref().to_owned(),
					None => START.to_owned(),
				}
			})
			.collect();
		Self { words }
	}

	/// Number of tokens in the key.
	pub fn order(&self) -> usize {
		self.words.len()
	}

	pub fn words(&self) -> &[String] {
		&self.words
	}

	/// The first `len` tokens (the conditioning context of an n-gram).
	pub fn prefix(&self, len: usize) -> Self {
		Self { words: self.words[..len].to_vec() }
	}

	/// The last `len` tokens.
	pub fn suffix(&self, len: usize) -> Self {
		Self { words: self.words[self.words.len() - len..].to_vec() }
	}

	/// Returns a new key with every token passed through `f`.
	pub fn map<F>(&self, f: F) -> Self
	where
		F: FnMut(&str) -> String,
	{
		Self { words: self.words.iter().map(String::as_str).map(f).collect() }
	}
}

impl fmt::Display for WordKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.words.join(" "))
	}
}
