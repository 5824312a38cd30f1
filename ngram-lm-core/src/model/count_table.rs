use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::word_key::WordKey;

/// Occurrence counts of every n-gram of a single order.
///
/// ## Responsibilities:
/// - Accumulate occurrences during training
/// - Rewrite keys in place (rare-word classes, `<UNK>`), merging counts
///   of keys that become equal
///
/// ## Invariants
/// - Every key has exactly `order` tokens
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CountTable {
	/// Length of every key in the table.
	order: usize,
	/// Example: { "the cat" => 42, "a cat" => 3 }
	counts: HashMap<WordKey, u64>,
}

impl CountTable {
	/// Creates an empty table for keys of length `order`.
	pub fn new(order: usize) -> Self {
		Self { order, counts: HashMap::new() }
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Records one occurrence of `key`.
	pub fn increment(&mut self, key: WordKey) {
		self.add(key, 1);
	}

	/// Adds `count` occurrences of `key`, creating the entry if absent.
	pub fn add(&mut self, key: WordKey, count: u64) {
		debug_assert_eq!(key.order(), self.order);
		*self.counts.entry(key).or_insert(0) += count;
	}

	pub fn get(&self, key: &WordKey) -> Option<u64> {
		self.counts.get(key).copied()
	}

	pub fn contains(&self, key: &WordKey) -> bool {
		self.counts.contains_key(key)
	}

	/// Removes `key` and returns its count.
	pub fn remove(&mut self, key: &WordKey) -> Option<u64> {
		self.counts.remove(key)
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Sum of all counts.
	pub fn total(&self) -> u64 {
		self.counts.values().sum()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&WordKey, u64)> {
		self.counts.iter().map(|(key, count)| (key, *count))
	}

	/// Entries sorted by count (descending), ties broken by key (ascending).
	pub fn ranked(&self) -> Vec<(WordKey, u64)> {
		let mut entries: Vec<(WordKey, u64)> = self.counts.iter().map(|(key, count)| (key.clone(), *count)).collect();
		entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
		entries
	}

	/// Rewrites every key through `f`.
	///
	/// Entries whose rewritten key differs are removed and their count is
	/// accumulated into the rewritten key, merging with any existing entry.
	pub fn rewrite_keys<F>(&mut self, mut f: F)
	where
		F: FnMut(&WordKey) -> WordKey,
	{
		let mut moved: Vec<(WordKey, u64)> = Vec::new();
		self.counts.retain(|key, count| {
			let new_key = f(key);
			if new_key == *key {
				true
			} else {
				moved.push((new_key, *count));
				false
			}
		});
		for (key, count) in moved {
			self.add(key, count);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn unigram(word: &str) -> WordKey {
		WordKey::new([word])
	}

	#[test]
	fn test_increment_and_total() {
		let mut table = CountTable::new(1);
		table.increment(unigram("a"));
		table.increment(unigram("a"));
		table.increment(unigram("b"));
		assert_eq!(table.get(&unigram("a")), Some(2));
		assert_eq!(table.get(&unigram("c")), None);
		assert_eq!(table.len(), 2);
		assert_eq!(table.total(), 3);
	}

	#[test]
	fn test_ranked_is_deterministic() {
		let mut table = CountTable::new(1);
		table.add(unigram("zeta"), 2);
		table.add(unigram("alpha"), 2);
		table.add(unigram("mid"), 7);
		let ranked: Vec<String> = table.ranked().into_iter().map(|(k, _)| k.to_string()).collect();
		assert_eq!(ranked, vec!["mid", "alpha", "zeta"]);
	}

	#[test]
	fn test_rewrite_keys_merges_collisions() {
		let mut table = CountTable::new(2);
		table.add(WordKey::new(["x", "a"]), 2);
		table.add(WordKey::new(["x", "b"]), 3);
		table.add(WordKey::new(["x", "c"]), 1);
		table.rewrite_keys(|key| key.map(|w| if w == "a" || w == "b" { "<UNK>".to_owned() } else { w.to_owned() }));
		assert_eq!(table.get(&WordKey::new(["x", "<UNK>"])), Some(5));
		assert_eq!(table.get(&WordKey::new(["x", "c"])), Some(1));
		assert_eq!(table.len(), 2);
		assert_eq!(table.total(), 6);
	}
}
