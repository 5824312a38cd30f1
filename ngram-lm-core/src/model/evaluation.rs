use serde::{Deserialize, Serialize};

use crate::error::{LmError, Result};

/// Output of a prediction run.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Prediction {
	/// Base-2 log-probability of each scored sentence, in input order.
	pub sentence_log_probs: Vec<f64>,
	/// Number of tokens scored across all sentences, `<STOP>` markers included.
	pub token_count: usize,
	/// Tokens whose estimate was zero and left out of the log-probabilities.
	pub skipped_tokens: usize,
}

impl Prediction {
	/// Sum of every sentence log-probability.
	pub fn total_log_prob(&self) -> f64 {
		self.sentence_log_probs.iter().sum()
	}
}

/// Perplexity of a prediction run: `2 ^ -(Σ log2 P(sentence) / token_count)`.
///
/// # Errors
/// Returns `LmError::EmptyPrediction` when no token was scored.
pub fn evaluate(prediction: &Prediction) -> Result<f64> {
	if prediction.token_count == 0 {
		return Err(LmError::EmptyPrediction);
	}
	let perplexity = (-prediction.total_log_prob() / prediction.token_count as f64).exp2();
	log::info!("Perplexity of the prediction data set: {}", perplexity);
	Ok(perplexity)
}
