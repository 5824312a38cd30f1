use serde::{Deserialize, Serialize};

use crate::error::{LmError, Result};

/// Tolerance accepted on the sum of interpolation weights.
pub const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// Hyperparameters of an n-gram language model.
///
/// Immutable once the model is built: `NGramLanguageModel::new` validates
/// the configuration and keeps its own copy.
///
/// # Invariants (after `validate`)
/// - `order >= 1`
/// - `k >= 0`
/// - `interpolation`, when present, has `order` non-negative weights summing to 1
/// - both thresholds are strictly positive
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModelConfig {
	/// N, the length of the longest n-gram.
	pub order: usize,

	/// Constant added to every count (add-K smoothing). 0 gives maximum likelihood.
	pub k: f64,

	/// Optional interpolation weights. `weights[i]` applies to order `i + 1`.
	pub interpolation: Option<Vec<f64>>,

	/// Unigrams seen at most this many times are mapped to a word-shape class.
	pub low_frequency_threshold: u64,

	/// Unigrams (after classification) seen at most this many times collapse into `<UNK>`.
	pub unk_threshold: u64,
}

impl ModelConfig {
	/// Configuration of order `order` with the default smoothing and thresholds.
	pub fn new(order: usize) -> Self {
		Self {
			order,
			k: 0.0,
			interpolation: None,
			low_frequency_threshold: 5,
			unk_threshold: 6,
		}
	}

	pub fn with_k(mut self, k: f64) -> Self {
		self.k = k;
		self
	}

	pub fn with_interpolation(mut self, weights: Vec<f64>) -> Self {
		self.interpolation = Some(weights);
		self
	}

	pub fn with_low_frequency_threshold(mut self, threshold: u64) -> Self {
		self.low_frequency_threshold = threshold;
		self
	}

	pub fn with_unk_threshold(mut self, threshold: u64) -> Self {
		self.unk_threshold = threshold;
		self
	}

	/// Returns `true` when the orders are blended by linear interpolation.
	pub fn interpolated(&self) -> bool {
		self.interpolation.is_some()
	}

	/// Checks every hyperparameter.
	///
	/// # Errors
	/// Returns `LmError::InvalidConfig` describing the first rejected value.
	pub fn validate(&self) -> Result<()> {
		if self.order < 1 {
			return Err(LmError::InvalidConfig("n-gram order must be greater than 0".to_owned()));
		}
		if !self.k.is_finite() || self.k < 0.0 {
			return Err(LmError::InvalidConfig(format!("smoothing constant K must be non-negative, got {}", self.k)));
		}
		if let Some(weights) = &self.interpolation {
			if weights.len() != self.order {
				return Err(LmError::InvalidConfig(format!(
					"expected {} interpolation weights, got {}",
					self.order,
					weights.len()
				)));
			}
			if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
				return Err(LmError::InvalidConfig("interpolation weights must be non-negative".to_owned()));
			}
			let sum: f64 = weights.iter().sum();
			if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
				return Err(LmError::InvalidConfig(format!("interpolation weights must sum to 1, got {}", sum)));
			}
		}
		if self.low_frequency_threshold == 0 || self.unk_threshold == 0 {
			return Err(LmError::InvalidConfig(
				"the low frequency threshold and the unk threshold must be greater than 0".to_owned(),
			));
		}
		Ok(())
	}
}
