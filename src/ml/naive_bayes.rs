//! Naive Bayes classifier with additive smoothing.
//!
//! Two generative models are supported, chosen by
//! [`NaiveBayesConfig::binarized`](crate::config::NaiveBayesConfig):
//!
//! - **Multinomial**: feature counts weight the conditional log probabilities.
//!   `P(f|c) = (cond_delta + count(f, c)) / (cond_delta * |V| + count(c))`
//!   where `count(c)` is the total feature occurrences in documents labeled `c`.
//! - **Binarized** (Bernoulli): only presence matters, and absent features
//!   contribute `1 - P(f|c)`.
//!   `P(f|c) = (cond_delta + docs(f, c)) / (cond_delta * |C| + docs(c))`
//!
//! Class priors are `(class_delta + docs(c)) / (class_delta * |C| + |D|)` in
//! both modes. Every probability is stored as log10 so classification is a sum.
//!
//! # Example
//!
//! ```rust,no_run
//! use mltk::document::corpus::Corpus;
//! use mltk::ml::NaiveBayesModel;
//!
//! # fn main() -> mltk::error::Result<()> {
//! let training = Corpus::from_vector_file("train.vectors.txt", false)?;
//! let mut model = NaiveBayesModel::builder()
//!     .class_delta(0.1)
//!     .cond_delta(0.1)
//!     .model_file("nb.model.txt")
//!     .build()?;
//!
//! // Writes nb.model.txt as a side effect.
//! model.train(&training)?;
//!
//! let mut test = Corpus::from_vector_file("test.vectors.txt", false)?;
//! model.classify(&mut test)?;
//! # Ok(())
//! # }
//! ```

mod model;
mod persistence;

pub use model::{NaiveBayesModel, NaiveBayesModelBuilder};
pub use persistence::recorded_mode;
