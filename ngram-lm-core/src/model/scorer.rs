use std::collections::HashMap;

use super::estimator::Smoothing;
use super::evaluation::Prediction;
use super::ngram_model::NGramLanguageModel;
use super::tokens::tokenize;
use super::word_key::WordKey;

/// Scores sentences against a trained model.
///
/// A `Scorer` lives for one prediction run. Estimates of top-order keys
/// never seen in training are computed once and kept in `backoff_cache`,
/// which is separate from the trained parameters and dropped with the
/// scorer.
pub(crate) struct Scorer<'m> {
	model: &'m NGramLanguageModel,
	smoothing: Smoothing,
	/// Estimates computed during this run for keys with no trained parameter.
	backoff_cache: HashMap<WordKey, f64>,
	prediction: Prediction,
}

impl<'m> Scorer<'m> {
	pub(crate) fn new(model: &'m NGramLanguageModel) -> Self {
		Self {
			model,
			smoothing: model.smoothing(),
			backoff_cache: HashMap::new(),
			prediction: Prediction::default(),
		}
	}

	/// Scores one sentence and records its base-2 log-probability.
	///
	/// Every token, `<STOP>` included, counts toward the token total. A token
	/// whose estimate is zero adds nothing to the log-probability.
	pub(crate) fn score_sentence(&mut self, line: &str) {
		let model = self.model;
		let words = tokenize(line);
		let tokens: Vec<&str> = words.iter().map(|word| model.normalize(word)).collect();
		let n = model.order();

		let mut log_prob = 0.0;
		for end in 0..tokens.len() {
			let key = WordKey::window(&tokens, end, n);
			match self.estimate(key) {
				Some(estimate) => log_prob += estimate.log2(),
				None => self.prediction.skipped_tokens += 1,
			}
		}

		self.prediction.token_count += tokens.len();
		self.prediction.sentence_log_probs.push(log_prob);
	}

	pub(crate) fn finish(self) -> Prediction {
		self.prediction
	}

	/// Estimate of a normalized top-order key; `None` when it is zero.
	fn estimate(&mut self, key: WordKey) -> Option<f64> {
		let estimate = match self.model.probability(&key) {
			Some(estimate) => estimate,
			None => match self.backoff_cache.get(&key) {
				Some(estimate) => *estimate,
				None => {
					let estimate = self.backoff(&key);
					self.backoff_cache.insert(key, estimate);
					estimate
				}
			},
		};
		(estimate > 0.0).then_some(estimate)
	}

	/// Estimate for a key with no trained parameter.
	///
	/// Without interpolation, the key was never seen: its add-K estimate with
	/// a zero count. With interpolation, each order contributes its trained
	/// parameter for the matching suffix, or the zero-count add-K estimate
	/// of that suffix when it has none.
	fn backoff(&self, key: &WordKey) -> f64 {
		let counts = self.model.count_tables();
		let Some(weights) = &self.model.config().interpolation else {
			return self.smoothing.estimate(counts, key, 0).unwrap_or(0.0);
		};

		let params = self.model.parameter_tables();
		let n = key.order();
		(0..n)
			.filter_map(|i| {
				let order = n - i;
				let suffix = key.suffix(order);
				let estimate = match params[order - 1].get(&suffix) {
					Some(estimate) => estimate,
					None => self.smoothing.estimate(counts, &suffix, 0)?,
				};
				Some(weights[order - 1] * estimate)
			})
			.sum()
	}
}

#[cfg(test)]
mod tests {
	use crate::model::tokens::UNK;
	use crate::model::{ModelConfig, NGramLanguageModel, WordKey};

	fn train(config: ModelConfig, lines: &[&str]) -> NGramLanguageModel {
		let mut model = NGramLanguageModel::new(config.with_low_frequency_threshold(1).with_unk_threshold(1)).unwrap();
		model.train(lines).unwrap();
		model
	}

	#[test]
	fn test_backoff_for_unseen_bigram() {
		let model = train(ModelConfig::new(2).with_k(1.0), &["a b", "b a", "a b"]);
		// counts: a 3, b 3, <STOP> 3, <UNK> 0 -> |V| = 4
		assert_eq!(model.probability(&WordKey::new(["a", "a"])), None);

		let prediction = model.predict(["a a"]).unwrap();
		// P(a|<START>) = (2+1)/(3+4), P(a|a) = 1/(3+4), P(<STOP>|a) = (1+1)/(3+4)
		let expected = (3.0f64 / 7.0).log2() + (1.0f64 / 7.0).log2() + (2.0f64 / 7.0).log2();
		assert!((prediction.sentence_log_probs[0] - expected).abs() < 1e-12);
		assert_eq!(prediction.token_count, 3);
		assert_eq!(prediction.skipped_tokens, 0);
	}

	#[test]
	fn test_unknown_words_score_as_unk() {
		let model = train(ModelConfig::new(1).with_k(1.0), &["a b", "b a"]);
		let unk = model.predict(["zzz"]).unwrap();
		let expected = model.probability(&WordKey::new([UNK])).unwrap().log2()
			+ model.probability(&WordKey::new(["<STOP>"])).unwrap().log2();
		assert!((unk.sentence_log_probs[0] - expected).abs() < 1e-12);
	}

	#[test]
	fn test_zero_estimates_are_skipped() {
		let model = train(ModelConfig::new(2), &["a b", "a b"]);
		let prediction = model.predict(["a b b"]).unwrap();
		// P(b|b) is zero without smoothing, every other bigram has probability 1
		assert_eq!(prediction.skipped_tokens, 1);
		assert_eq!(prediction.sentence_log_probs, vec![0.0]);
		assert_eq!(prediction.token_count, 4);
	}

	#[test]
	fn test_interpolated_backoff() {
		let config = ModelConfig::new(2).with_k(1.0).with_interpolation(vec![0.4, 0.6]);
		let model = train(config, &["a b", "b a", "a b"]);
		let prediction = model.predict(["a a"]).unwrap();

		// bigram estimates: (count + 1) / (prefix + 4); unigram: (count + 1) / (9 + 4)
		let p_a: f64 = 4.0 / 13.0;
		let p_stop: f64 = 4.0 / 13.0;
		let start_a = 0.6 * (3.0 / 7.0) + 0.4 * p_a;
		let a_a = 0.6 * (1.0 / 7.0) + 0.4 * p_a;
		let a_stop = 0.6 * (2.0 / 7.0) + 0.4 * p_stop;
		let expected = start_a.log2() + a_a.log2() + a_stop.log2();
		assert!((prediction.sentence_log_probs[0] - expected).abs() < 1e-12);
	}

	#[test]
	fn test_predict_does_not_mutate_model() {
		let model = train(ModelConfig::new(2).with_k(1.0), &["a b", "b a"]);
		let before = model.parameters(2).unwrap().len();
		let first = model.predict(["a a", "b b"]).unwrap();
		let second = model.predict(["a a", "b b"]).unwrap();
		assert_eq!(first, second);
		assert_eq!(model.parameters(2).unwrap().len(), before);
	}
}
