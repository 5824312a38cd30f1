use std::collections::{BTreeSet, HashMap, HashSet};

use fancy_regex::Regex;
use serde::{Deserialize, Serialize};

use super::count_table::CountTable;
use super::tokens::{OTHER, UNK};
use super::word_key::WordKey;
use crate::error::Result;

/// Word-shape rules, in evaluation order.
///
/// Every rule is tested and the label of the last matching one wins, so a
/// later, more specific shape overrides an earlier one (`"A"` is both
/// all-caps and initial-capital and ends up initial-capital).
const SHAPE_RULES: [(&str, &str); 12] = [
	(r"[0-9]{2}", "<TWO_DIGIT_NUM>"),
	(r"[0-9]{4,}", "<FOUR_DIGIT_NUM>"),
	(r"(?=.*[0-9])(?=.*[a-zA-Z])[a-zA-Z0-9_-]+", "<DIGIT_AND_ALPHA>"),
	(r"(?=.*[0-9])(?=.*-)[0-9-]+", "<DIGIT_AND_DASH>"),
	(r"(?=.*[0-9])(?=.*/)[0-9/]+", "<DIGIT_AND_SLASH>"),
	(r"(?=.*[0-9])(?=.*,)[0-9,]+", "<DIGIT_AND_COMMA>"),
	(r"(?=.*[0-9])(?=.*\.)[0-9.]+", "<DIGIT_AND_PERIOD>"),
	(r"[0-9]|[0-9]{3}|[0-9]{5,}", "<OTHER_NUM>"),
	(r"[A-Z]+", "<ALL_CAPS>"),
	(r"[A-Z]\.", "<CAP_PERIOD>"),
	(r"[A-Z][a-z]*", "<INIT_CAP>"),
	(r"[a-z]+", "<LOWER_CASE>"),
];

/// Ordered table of (pattern, label) rules assigning a class to a token
/// from its shape.
pub struct ShapeClassifier {
	rules: Vec<(Regex, &'static str)>,
}

impl ShapeClassifier {
	/// Compiles the built-in word-shape rules.
	pub fn new() -> Result<Self> {
		let rules = SHAPE_RULES
			.iter()
			.map(|(pattern, label)| -> Result<(Regex, &'static str)> {
				Ok((Regex::new(&format!("^(?:{})$", pattern))?, *label))
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(Self { rules })
	}

	/// Returns the label of the last rule matching the whole token,
	/// or `<OTHER>` if none does.
	pub fn classify(&self, word: &str) -> Result<&'static str> {
		let mut label = OTHER;
		for (regex, rule_label) in &self.rules {
			if regex.is_match(word)? {
				label = *rule_label;
			}
		}
		Ok(label)
	}
}

/// Mapping from rare surface tokens to their class label.
///
/// Built once at training time, read-only afterwards. Entries keep the
/// order of the unigram ranking they were assigned in.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct WordClassMap {
	labels: HashMap<String, String>,
	/// Tokens in ranking order (count descending, token ascending).
	ranked: Vec<String>,
}

impl WordClassMap {
	fn insert(&mut self, word: &str, label: &str) {
		if self.labels.insert(word.to_owned(), label.to_owned()).is_none() {
			self.ranked.push(word.to_owned());
		}
	}

	/// Class label of `word`, if it was classified.
	pub fn get(&self, word: &str) -> Option<&str> {
		self.labels.get(word).map(String::as_str)
	}

	/// Replaces `word` by its label when it has one.
	pub fn substitute<'a>(&'a self, word: &'a str) -> &'a str {
		self.get(word).unwrap_or(word)
	}

	pub fn len(&self) -> usize {
		self.labels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.labels.is_empty()
	}

	/// `(token, label)` pairs in ranking order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.ranked.iter().filter_map(|word| self.labels.get(word).map(|label| (word.as_str(), label.as_str())))
	}
}

/// Outcome of rare-word handling over the count tables.
#[derive(Debug)]
pub struct Classification {
	pub word_classes: WordClassMap,
	/// Retained unigrams, `<UNK>` included.
	pub vocabulary: BTreeSet<String>,
	/// Tokens (after class substitution) collapsed into `<UNK>`.
	pub converted: HashSet<String>,
}

/// Rewrites the count tables for rare and unknown words.
///
/// `tables[0]` must be the unigram table; `tables[k]` holds n-grams of
/// order `k + 1` (possibly empty when that order is not counted).
///
/// 1. Unigrams seen at most `low_frequency_threshold` times get a class
///    label and their counts move to the label entry.
/// 2. Remaining unigrams seen at most `unk_threshold` times collapse into
///    `<UNK>`; the others form the vocabulary.
/// 3. Keys of every higher order are rewritten the same way, merging the
///    counts of keys that become equal.
pub fn classify_rare_words(
	tables: &mut [CountTable],
	low_frequency_threshold: u64,
	unk_threshold: u64,
) -> Result<Classification> {
	let classifier = ShapeClassifier::new()?;
	let Some((unigrams, higher)) = tables.split_first_mut() else {
		return Ok(Classification {
			word_classes: WordClassMap::default(),
			vocabulary: BTreeSet::from([UNK.to_owned()]),
			converted: HashSet::new(),
		});
	};

	let mut word_classes = WordClassMap::default();
	for (key, count) in unigrams.ranked() {
		if count <= low_frequency_threshold {
			let word = &key.words()[0];
			word_classes.insert(word, classifier.classify(word)?);
		}
	}

	// Remove every classified entry first, then pour the counts into the labels.
	let mut label_counts: Vec<(WordKey, u64)> = Vec::with_capacity(word_classes.len());
	for (word, label) in word_classes.iter() {
		if let Some(count) = unigrams.remove(&WordKey::new([word])) {
			label_counts.push((WordKey::new([label]), count));
		}
	}
	for (key, count) in label_counts {
		unigrams.add(key, count);
	}
	log::info!("{} rare words mapped to word classes", word_classes.len());

	let unk = WordKey::new([UNK]);
	let mut unk_count = unigrams.remove(&unk).unwrap_or(0);
	let mut vocabulary = BTreeSet::new();
	let mut converted = HashSet::new();
	for (key, count) in unigrams.ranked() {
		if count <= unk_threshold {
			unigrams.remove(&key);
			unk_count += count;
			converted.insert(key.words()[0].clone());
		} else {
			vocabulary.insert(key.words()[0].clone());
		}
	}
	unigrams.add(unk, unk_count);
	vocabulary.insert(UNK.to_owned());
	log::info!("{} words collapsed into {}", converted.len(), UNK);

	for table in higher.iter_mut() {
		table.rewrite_keys(|key| key.map(|word| normalize_training_word(&word_classes, &converted, word).to_owned()));
	}

	Ok(Classification { word_classes, vocabulary, converted })
}

/// Class substitution followed by `<UNK>` substitution, as applied to
/// training n-grams.
fn normalize_training_word<'a>(word_classes: &'a WordClassMap, converted: &HashSet<String>, word: &'a str) -> &'a str {
	let word = word_classes.substitute(word);
	if converted.contains(word) { UNK } else { word }
}
