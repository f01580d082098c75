//! # mltk
//!
//! A small supervised-learning toolkit for text classification, built around
//! a Naive Bayes classifier.
//!
//! ## Features
//!
//! - Binarized (Bernoulli) and multinomial Naive Bayes with additive smoothing
//! - Log10 scoring that stays finite on large vocabularies
//! - Flat text model files that round-trip exactly
//! - Corpus loading from `label feature:count` vectors or JSON
//! - System output files and confusion matrices for evaluation

pub mod cli;
pub mod config;
pub mod counting;
pub mod document;
pub mod error;
pub mod evaluation;
pub mod ml;
pub mod util;

pub mod prelude {
    pub use crate::config::{NaiveBayesConfig, ToolkitConfig};
    pub use crate::document::{Corpus, CorpusBuilder, Document};
    pub use crate::error::{MltkError, Result};
    pub use crate::evaluation::ConfusionMatrix;
    pub use crate::ml::{Classifier, NaiveBayesModel};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
