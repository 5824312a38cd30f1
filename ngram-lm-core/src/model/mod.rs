//! Top-level module for the n-gram language model.
//!
//! - Fixed-length word tuples used as table keys (`WordKey`)
//! - Per-order occurrence counts (`CountTable`)
//! - Rare-word classification (`word_class`)
//! - Smoothed parameter estimation (`estimator`)
//! - Sentence scoring with back-off (`scorer`)
//! - Perplexity (`evaluation`)
//! - The model object tying them together (`NGramLanguageModel`)

/// Reserved tokens shared by every stage of the pipeline.
pub mod tokens;

/// Ordered tuple of tokens used as a structural map key.
pub mod word_key;

/// Occurrence counts for a single n-gram order.
pub mod count_table;

/// Hyperparameters and their validation.
pub mod model_config;

/// Word-shape classes, the word→class map and `<UNK>` collapsing.
pub mod word_class;

/// Add-K smoothing and linear interpolation over count tables.
pub mod estimator;

/// Sentence scoring with a per-call back-off cache.
mod scorer;

/// Prediction output and perplexity.
pub mod evaluation;

/// The trained model object.
pub mod ngram_model;

pub use count_table::CountTable;
pub use evaluation::{Prediction, evaluate};
pub use model_config::ModelConfig;
pub use ngram_model::NGramLanguageModel;
pub use word_class::WordClassMap;
pub use word_key::WordKey;
