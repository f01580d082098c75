//! Confusion matrices over classified corpora.

use std::collections::BTreeSet;
use std::fmt;

use crate::counting::NestedCounter;
use crate::document::corpus::Corpus;
use crate::error::Result;

/// Counts of (true label, system label) pairs.
///
/// Rows are the truth, columns are the system output. Labels are the union of
/// both sides, so a label the classifier never predicts still gets a column.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    name: String,
    counts: NestedCounter<String>,
}

impl ConfusionMatrix {
    /// Tally every document of a classified corpus.
    ///
    /// `name` is the data set name, e.g. `"train"` or `"test"`.
    pub fn from_corpus<S: Into<String>>(corpus: &Corpus, name: S) -> Result<Self> {
        let mut counts = NestedCounter::new();
        for document in corpus.documents() {
            counts.increment(
                document.true_label().to_string(),
                document.system_label()?.to_string(),
            )?;
        }
        Ok(ConfusionMatrix {
            name: name.into(),
            counts,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of documents with this truth and system label.
    pub fn count(&self, truth: &str, system: &str) -> u64 {
        self.counts.get(truth, system)
    }

    /// Every label on either axis, sorted.
    pub fn labels(&self) -> Vec<String> {
        self.counts
            .all_keys()
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.counts.total()
    }

    pub fn correct(&self) -> u64 {
        self.counts
            .outer_keys()
            .map(|label| self.counts.get(label, label))
            .sum()
    }

    /// Fraction of documents whose system label equals the truth; 0 when empty.
    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.correct() as f64 / total as f64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Confusion Matrix for {} not utilized.", self.name);
        }

        let labels = self.labels();
        writeln!(f, "Confusion matrix for the {}ing data:", self.name)?;
        writeln!(f, "row is the truth, column is the system output")?;
        writeln!(f)?;
        writeln!(f, "\t{}", labels.join(" "))?;
        for truth in &labels {
            write!(f, "{truth}")?;
            for system in &labels {
                write!(f, "\t{}", self.count(truth, system))?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        writeln!(f, "{}ing accuracy = {:.6}", self.name, self.accuracy())?;
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::error::MltkError;

    fn classified(pairs: &[(&str, &str)]) -> Corpus {
        let mut builder = Corpus::builder(false);
        for (truth, _) in pairs {
            builder.push(*truth, [("f", 1)]);
        }
        let mut corpus = builder.build();
        for (document, (_, system)) in corpus.documents_mut().zip(pairs) {
            document.set_system_output_with_label(*system, BTreeMap::new());
        }
        corpus
    }

    #[test]
    fn test_counts_and_accuracy() {
        let corpus = classified(&[("a", "a"), ("a", "b"), ("b", "b"), ("c", "b")]);
        let matrix = ConfusionMatrix::from_corpus(&corpus, "test").unwrap();

        assert_eq!(matrix.labels(), vec!["a", "b", "c"]);
        assert_eq!(matrix.count("a", "b"), 1);
        assert_eq!(matrix.count("c", "c"), 0);
        assert_eq!(matrix.total(), 4);
        assert_eq!(matrix.correct(), 2);
        assert!((matrix.accuracy() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        let corpus = classified(&[("a", "a"), ("a", "b"), ("b", "b")]);
        let matrix = ConfusionMatrix::from_corpus(&corpus, "train").unwrap();

        let expected = "Confusion matrix for the training data:\n\
                        row is the truth, column is the system output\n\
                        \n\
                        \ta b\n\
                        a\t1\t1\n\
                        b\t0\t1\n\
                        \n\
                        training accuracy = 0.666667\n\
                        \n";
        assert_eq!(matrix.to_string(), expected);
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = ConfusionMatrix::from_corpus(&Corpus::builder(false).build(), "test").unwrap();
        assert!(matrix.is_empty());
        assert_eq!(matrix.accuracy(), 0.0);
        assert_eq!(matrix.to_string(), "Confusion Matrix for test not utilized.");
    }

    #[test]
    fn test_unclassified_corpus() {
        let corpus = Corpus::builder(false).with("a", [("f", 1)]).build();
        let err = ConfusionMatrix::from_corpus(&corpus, "test").unwrap_err();
        assert!(matches!(err, MltkError::UnclassifiedDocument(0)));
    }
}
