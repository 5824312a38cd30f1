//! N-gram statistical language model library.
//!
//! This crate provides the whole modeling pipeline:
//! - Word-level n-gram counting over a tokenized corpus
//! - Rare-word classification into word-shape classes and `<UNK>` collapsing
//! - Add-K smoothed parameter estimation with optional linear interpolation
//! - Sentence scoring with back-off estimates for unseen contexts
//! - Perplexity evaluation
//!
//! Reading a corpus and writing diagnostic files are helpers in [`io`];
//! the model itself only consumes lines of text.

/// Language model, hyperparameters, tables, scoring and evaluation.
pub mod model;

/// Line source and persistence sink (corpus files, diagnostic dumps).
pub mod io;

/// Crate error type.
pub mod error;

pub use error::{LmError, Result};
