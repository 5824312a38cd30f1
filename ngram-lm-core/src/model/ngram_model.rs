use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::count_table::CountTable;
use super::estimator::{self, ParameterTable, Smoothing};
use super::evaluation::Prediction;
use super::model_config::ModelConfig;
use super::scorer::Scorer;
use super::tokens::{UNK, tokenize};
use super::word_class::{self, WordClassMap};
use super::word_key::WordKey;
use crate::error::{LmError, Result};

/// Word-level n-gram language model.
///
/// The model owns one count table and one parameter table per order
/// `1..=N`, the vocabulary and the word→class map built at training time.
///
/// # Responsibilities
/// - Count n-grams over a tokenized corpus (`train`)
/// - Rewrite rare words into word-shape classes and `<UNK>`
/// - Estimate add-K smoothed parameters, optionally interpolated
/// - Score new sentences (`predict`)
/// - Save and load a trained model
///
/// # Invariants
/// - `counts[i]` and `params[i]` hold keys of order `i + 1`
/// - The vocabulary holds exactly the keys of the unigram table after rewriting
/// - Training happens at most once per instance
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NGramLanguageModel {
	config: ModelConfig,
	/// Number of lines consumed by `train`.
	line_count: u64,
	counts: Vec<CountTable>,
	params: Vec<ParameterTable>,
	vocabulary: BTreeSet<String>,
	word_classes: WordClassMap,
	/// Raw unigram counts in ranking order, captured before rewriting.
	original_vocabulary_counts: Vec<(WordKey, u64)>,
	trained: bool,
}

impl NGramLanguageModel {
	/// Creates an untrained model.
	///
	/// # Errors
	/// Returns `LmError::InvalidConfig` if the configuration is rejected.
	pub fn new(config: ModelConfig) -> Result<Self> {
		config.validate()?;
		let order = config.order;
		Ok(Self {
			counts: (1..=order).map(CountTable::new).collect(),
			params: (1..=order).map(ParameterTable::new).collect(),
			config,
			line_count: 0,
			vocabulary: BTreeSet::new(),
			word_classes: WordClassMap::default(),
			original_vocabulary_counts: Vec::new(),
			trained: false,
		})
	}

	/// Loads a model saved with [`save`](Self::save).
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = std::fs::read(path)?;
		let model: Self = postcard::from_bytes(&bytes)?;
		model.config.validate()?;
		Ok(model)
	}

	/// Serializes the whole model with `postcard`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(path, bytes)?;
		Ok(())
	}

	/// Orders whose n-grams are counted during training.
	///
	/// Interpolation needs every order. Otherwise the unigrams (vocabulary),
	/// the top order and its conditioning order are enough.
	fn counted_orders(&self) -> BTreeSet<usize> {
		let n = self.config.order;
		if self.config.interpolated() {
			(1..=n).collect()
		} else {
			[1, n, n.saturating_sub(1)].into_iter().filter(|order| *order >= 1).collect()
		}
	}

	/// Trains the model on a corpus, one sentence per line.
	///
	/// # Behavior
	/// - Each line is split on whitespace and terminated by `<STOP>`
	/// - Windows before the start of a line are padded with `<START>`
	/// - Rare words are classified and collapsed, then parameters estimated
	///
	/// # Errors
	/// Returns `LmError::AlreadyTrained` on a second call: training is single-shot.
	pub fn train<I, S>(&mut self, lines: I) -> Result<()>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		if self.trained {
			return Err(LmError::AlreadyTrained);
		}

		let orders = self.counted_orders();
		for line in lines {
			let tokens = tokenize(line.as_ref());
			for end in 0..tokens.len() {
				for &order in &orders {
					self.counts[order - 1].increment(WordKey::window(&tokens, end, order));
				}
			}
			self.line_count += 1;
		}
		log::info!("Counted n-grams over {} training lines", self.line_count);

		self.original_vocabulary_counts = self.counts[0].ranked();
		let classification = word_class::classify_rare_words(
			&mut self.counts,
			self.config.low_frequency_threshold,
			self.config.unk_threshold,
		)?;
		self.vocabulary = classification.vocabulary;
		self.word_classes = classification.word_classes;
		for table in &self.counts {
			log::debug!("order {}: {} distinct n-grams after rewriting", table.order(), table.len());
		}

		self.estimate_parameters();
		self.trained = true;
		log::info!("Training is done! Vocabulary size: {}", self.vocabulary.len());
		Ok(())
	}

	fn estimate_parameters(&mut self) {
		let n = self.config.order;
		let smoothing = self.smoothing();
		match &self.config.interpolation {
			None => {
				self.params[n - 1] = estimator::estimate_order(&self.counts, n, &smoothing);
			}
			Some(weights) => {
				for order in 1..=n {
					self.params[order - 1] = estimator::estimate_order(&self.counts, order, &smoothing);
				}
				self.params[n - 1] = estimator::interpolate(&self.params, weights, &smoothing);
			}
		}
	}

	/// Scores a corpus, one sentence per line.
	///
	/// Estimates of contexts unseen in training are computed on demand and
	/// cached for the duration of this call only.
	///
	/// # Errors
	/// Returns `LmError::NotTrained` if `train` was never called.
	pub fn predict<I, S>(&self, lines: I) -> Result<Prediction>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		if !self.trained {
			return Err(LmError::NotTrained);
		}

		let mut scorer = Scorer::new(self);
		for line in lines {
			scorer.score_sentence(line.as_ref());
		}
		let prediction = scorer.finish();
		if prediction.skipped_tokens > 0 {
			log::warn!("{} tokens had a zero probability and were skipped", prediction.skipped_tokens);
		}
		log::info!("Prediction is done! {} sentences scored", prediction.sentence_log_probs.len());
		Ok(prediction)
	}

	/// Maps a surface token to the symbol the tables know it by: its class
	/// label if it has one, then `<UNK>` if that is outside the vocabulary.
	pub fn normalize<'a>(&'a self, word: &'a str) -> &'a str {
		let word = self.word_classes.substitute(word);
		if self.vocabulary.contains(word) { word } else { UNK }
	}

	/// Smoothing statistics of the rewritten count tables.
	pub fn smoothing(&self) -> Smoothing {
		Smoothing::from_counts(self.config.k, &self.counts, self.line_count)
	}

	pub fn config(&self) -> &ModelConfig {
		&self.config
	}

	pub fn order(&self) -> usize {
		self.config.order
	}

	pub fn is_trained(&self) -> bool {
		self.trained
	}

	pub fn line_count(&self) -> u64 {
		self.line_count
	}

	/// Retained vocabulary, sorted, `<UNK>` and class labels included.
	pub fn vocabulary(&self) -> &BTreeSet<String> {
		&self.vocabulary
	}

	pub fn word_classes(&self) -> &WordClassMap {
		&self.word_classes
	}

	/// Unigram counts before rare-word rewriting, count descending then token ascending.
	pub fn original_vocabulary_counts(&self) -> &[(WordKey, u64)] {
		&self.original_vocabulary_counts
	}

	/// Count table of `order` (1-based).
	pub fn counts(&self, order: usize) -> Option<&CountTable> {
		order.checked_sub(1).and_then(|i| self.counts.get(i))
	}

	/// Parameter table of `order` (1-based).
	pub fn parameters(&self, order: usize) -> Option<&ParameterTable> {
		order.checked_sub(1).and_then(|i| self.params.get(i))
	}

	pub(crate) fn count_tables(&self) -> &[CountTable] {
		&self.counts
	}

	pub(crate) fn parameter_tables(&self) -> &[ParameterTable] {
		&self.params
	}

	/// Trained estimate of `key` at its own order, if any.
	pub fn probability(&self, key: &WordKey) -> Option<f64> {
		self.parameters(key.order())?.get(key)
	}
}
