//! Classifiers.
//!
//! - [`classifier::Classifier`] - Common interface for trainable classifiers
//! - [`naive_bayes::NaiveBayesModel`] - Binarized (Bernoulli) and multinomial
//!   Naive Bayes with additive smoothing and log10 scores

pub mod classifier;
pub mod naive_bayes;

pub use classifier::Classifier;
pub use naive_bayes::{NaiveBayesModel, NaiveBayesModelBuilder};
