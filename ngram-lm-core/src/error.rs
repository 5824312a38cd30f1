use thiserror::Error;

/// Errors raised by the language model pipeline.
#[derive(Debug, Error)]
pub enum LmError {
	/// Hyperparameters rejected at construction.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// `train` was called on a model that already holds counts.
	#[error("model is already trained")]
	AlreadyTrained,

	/// Scoring was requested before training.
	#[error("model is not trained")]
	NotTrained,

	/// Perplexity over a prediction that scored no token.
	#[error("cannot evaluate a prediction without any scored token")]
	EmptyPrediction,

	/// A word-shape pattern failed to compile or to run.
	#[error("word-shape pattern error: {0}")]
	Pattern(#[from] fancy_regex::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error("model serialization failed: {0}")]
	Serialization(#[from] postcard::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, LmError>;
