//! Labeled documents and the corpora that own them.
//!
//! # Core Components
//!
//! - [`document::Document`] - A labeled bag of feature counts plus the
//!   system output assigned by a classifier
//! - [`corpus::Corpus`] - An id-ordered collection of documents with cached
//!   label and feature sets
//! - [`parser`] - Reader for the `<label> <feature>:<count> ...` vector format
//! - [`json`] - JSON interchange for corpora
//!
//! # Examples
//!
//! ```
//! use mltk::document::corpus::Corpus;
//!
//! let corpus = Corpus::from_vector_str("spam free:2 money:1\nham meeting:1\n", false).unwrap();
//!
//! assert_eq!(corpus.len(), 2);
//! assert_eq!(corpus.all_labels().len(), 2);
//! assert_eq!(corpus.get(0).unwrap().feature_count("free"), 2);
//! ```

pub mod corpus;
#[allow(clippy::module_inception)]
pub mod document;
pub mod json;
pub mod parser;

pub use corpus::{Corpus, CorpusBuilder};
pub use document::{Document, SystemOutput};
