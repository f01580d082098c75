//! Classifier trait definition.

use crate::document::corpus::Corpus;
use crate::error::Result;

/// Classifier trait.
///
/// A classifier learns from a labeled corpus and then assigns a system label
/// and per-label scores to every document of another (or the same) corpus.
pub trait Classifier: Send + Sync {
    /// Learn from a labeled corpus.
    fn train(&mut self, corpus: &Corpus) -> Result<()>;

    /// Record a system output on every document of `corpus`.
    ///
    /// # Errors
    /// `UninitializedModel` when called before the classifier was trained or loaded.
    fn classify(&self, corpus: &mut Corpus) -> Result<()>;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}
