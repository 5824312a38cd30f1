use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::count_table::CountTable;
use super::word_key::WordKey;

/// Smoothed probability estimates for every n-gram of a single order.
///
/// ## Invariants
/// - Every key has exactly `order` tokens
/// - Every stored value lies in (0, 1] when K > 0
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ParameterTable {
	order: usize,
	params: HashMap<WordKey, f64>,
}

impl ParameterTable {
	pub fn new(order: usize) -> Self {
		Self { order, params: HashMap::new() }
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn get(&self, key: &WordKey) -> Option<f64> {
		self.params.get(key).copied()
	}

	pub fn insert(&mut self, key: WordKey, estimate: f64) {
		debug_assert_eq!(key.order(), self.order);
		self.params.insert(key, estimate);
	}

	pub fn len(&self) -> usize {
		self.params.len()
	}

	pub fn is_empty(&self) -> bool {
		self.params.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&WordKey, f64)> {
		self.params.iter().map(|(key, estimate)| (key, *estimate))
	}
}

/// Add-K smoothing over rewritten count tables.
///
/// `P(w | prefix) = (count(prefix w) + K) / (count(prefix) + K * |V|)`
///
/// An unseen prefix counts as one occurrence per training line, which is
/// exactly the count of an all-`<START>` context and keeps the
/// denominator positive when K = 0. The empty prefix of a unigram
/// counts every token.
#[derive(Clone, Copy, Debug)]
pub struct Smoothing {
	pub k: f64,
	/// Number of entries of the unigram table after rare-word rewriting.
	pub vocabulary_size: usize,
	/// Number of training lines.
	pub line_count: u64,
	/// Sum of the unigram counts.
	pub unigram_total: u64,
}

impl Smoothing {
	/// Captures the statistics needed by the estimates from rewritten tables.
	pub fn from_counts(k: f64, counts: &[CountTable], line_count: u64) -> Self {
		let (vocabulary_size, unigram_total) = counts.first().map_or((0, 0), |unigrams| (unigrams.len(), unigrams.total()));
		Self { k, vocabulary_size, line_count, unigram_total }
	}

	/// Denominator for n-grams conditioned on `prefix`.
	///
	/// `counts[i]` is the table of order `i + 1`.
	pub fn denominator(&self, counts: &[CountTable], prefix: &WordKey) -> f64 {
		let observed = match prefix.order() {
			0 => self.unigram_total,
			order => counts
				.get(order - 1)
				.and_then(|table| table.get(prefix))
				.unwrap_or(self.line_count),
		};
		observed as f64 + self.k * self.vocabulary_size as f64
	}

	/// Smoothed estimate of `key` having been seen `count` times.
	///
	/// Returns `None` when the denominator is zero (K = 0 with no data),
	/// in which case there is no usable estimate.
	pub fn estimate(&self, counts: &[CountTable], key: &WordKey, count: u64) -> Option<f64> {
		let denominator = self.denominator(counts, &key.prefix(key.order() - 1));
		if denominator <= 0.0 {
			return None;
		}
		Some((count as f64 + self.k) / denominator)
	}

	/// Probability every key shares under a uniform distribution over the vocabulary.
	pub fn uniform(&self) -> f64 {
		if self.vocabulary_size == 0 { 0.0 } else { 1.0 / self.vocabulary_size as f64 }
	}
}

/// Computes the smoothed estimate of every key counted at `order`.
pub fn estimate_order(counts: &[CountTable], order: usize, smoothing: &Smoothing) -> ParameterTable {
	let mut table = ParameterTable::new(order);
	if let Some(observed) = counts.get(order - 1) {
		for (key, count) in observed.iter() {
			if let Some(estimate) = smoothing.estimate(counts, key, count) {
				table.insert(key.clone(), estimate);
			}
		}
	}
	log::debug!("order {}: {} parameters estimated", order, table.len());
	table
}

/// Blends the per-order estimates of every top-order key.
///
/// For a key of order N, the term for order `N - i` uses the trailing
/// `N - i` tokens of the key, weighted by `weights[N - i - 1]`. A suffix
/// with no estimate at its order contributes the uniform probability.
///
/// `params[i]` is the table of order `i + 1`; the returned table replaces
/// the top-order one.
pub fn interpolate(params: &[ParameterTable], weights: &[f64], smoothing: &Smoothing) -> ParameterTable {
	let n = params.len();
	let mut interpolated = ParameterTable::new(n);
	let Some(top) = params.last() else {
		return interpolated;
	};

	for (key, _) in top.iter() {
		let estimate: f64 = (0..n)
			.map(|i| {
				let order = n - i;
				let param = params[order - 1].get(&key.suffix(order)).unwrap_or_else(|| smoothing.uniform());
				weights[order - 1] * param
			})
			.sum();
		interpolated.insert(key.clone(), estimate);
	}
	interpolated
}
