//! A labeled bag of feature counts.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{MltkError, Result};

/// The label a classifier chose for a document, with the score of every label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemOutput {
    /// The chosen label.
    pub label: String,
    /// Score per candidate label, usually a log10 probability.
    pub scores: BTreeMap<String, f64>,
}

impl SystemOutput {
    /// Labels ordered by descending score; equal scores are ordered by label.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .scores
            .iter()
            .map(|(label, score)| (label.as_str(), *score))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// A single labeled document.
///
/// In binarized mode every present feature is stored with count 1, whatever
/// count the input carried. Features are kept ordered so that scores summed
/// over a document do not depend on hashing.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: usize,
    true_label: String,
    features: BTreeMap<String, u64>,
    binarized: bool,
    system_output: Option<SystemOutput>,
}

impl Document {
    /// Create a document. Zero counts are kept as explicit entries unless the
    /// document is binarized, where every feature collapses to count 1.
    pub fn new<S, I, F>(id: usize, true_label: S, features: I, binarized: bool) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (F, u64)>,
        F: Into<String>,
    {
        let features = features
            .into_iter()
            .map(|(feature, count)| (feature.into(), if binarized { 1 } else { count }))
            .collect();

        Document {
            id,
            true_label: true_label.into(),
            features,
            binarized,
            system_output: None,
        }
    }

    /// Corpus-assigned id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The gold label given at construction.
    pub fn true_label(&self) -> &str {
        &self.true_label
    }

    /// Count of `feature` in this document, zero when absent.
    pub fn feature_count(&self, feature: &str) -> u64 {
        self.features.get(feature).copied().unwrap_or(0)
    }

    /// Feature names in order.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    /// Feature counts in feature order.
    pub fn feature_counts(&self) -> &BTreeMap<String, u64> {
        &self.features
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.features.contains_key(feature)
    }

    /// Number of distinct features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn is_binarized(&self) -> bool {
        self.binarized
    }

    /// Whether a system output has been assigned.
    pub fn is_classified(&self) -> bool {
        self.system_output.is_some()
    }

    /// Assign scores and pick the highest scoring label.
    ///
    /// Ties go to the lexicographically smallest label.
    pub fn set_system_output(&mut self, scores: BTreeMap<String, f64>) -> Result<()> {
        let label = best_label(&scores)
            .ok_or_else(|| {
                MltkError::invalid_argument(format!(
                    "document {} received an empty score map",
                    self.id
                ))
            })?
            .to_string();
        self.system_output = Some(SystemOutput { label, scores });
        Ok(())
    }

    /// Assign scores together with an externally chosen label.
    pub fn set_system_output_with_label<S: Into<String>>(
        &mut self,
        label: S,
        scores: BTreeMap<String, f64>,
    ) {
        self.system_output = Some(SystemOutput {
            label: label.into(),
            scores,
        });
    }

    /// The full system output.
    pub fn system_output(&self) -> Result<&SystemOutput> {
        self.system_output
            .as_ref()
            .ok_or(MltkError::UnclassifiedDocument(self.id))
    }

    /// The label chosen by the classifier.
    pub fn system_label(&self) -> Result<&str> {
        Ok(self.system_output()?.label.as_str())
    }

    /// Scores for every candidate label.
    pub fn label_scores(&self) -> Result<&BTreeMap<String, f64>> {
        Ok(&self.system_output()?.scores)
    }

    /// Score for a single label; labels without a score read as 0.0.
    pub fn label_score(&self, label: &str) -> Result<f64> {
        Ok(self.label_scores()?.get(label).copied().unwrap_or(0.0))
    }

    /// Render the system output line:
    /// `Document:<id> <true label> <label> <score> ...`, best label first.
    ///
    /// With `exponentiate`, log10 scores are turned back into probabilities;
    /// a non-negative score cannot be a log probability and is rejected.
    pub fn formatted_system_output(&self, exponentiate: bool) -> Result<String> {
        let output = self.system_output()?;
        let mut line = format!("Document:{} {}", self.id, self.true_label);

        for (label, score) in output.ranked() {
            let value = if exponentiate {
                if score >= 0.0 {
                    return Err(MltkError::invalid_argument(format!(
                        "score {score} for label {label} in document {} is not a log probability",
                        self.id
                    )));
                }
                10f64.powf(score)
            } else {
                score
            };
            let _ = write!(line, " {label} {value}");
        }

        Ok(line)
    }
}

/// Label with the highest score, scanning labels in order so the smallest wins ties.
fn best_label(scores: &BTreeMap<String, f64>) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for (label, &score) in scores {
        match best {
            Some((_, best_score)) if score.total_cmp(&best_score).is_le() => {}
            _ => best = Some((label.as_str(), score)),
        }
    }
    best.map(|(label, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(l, s)| (l.to_string(), *s)).collect()
    }

    #[test]
    fn test_document_counts() {
        let doc = Document::new(3, "guns", [("gun", 3), ("com", 1)], false);

        assert_eq!(doc.id(), 3);
        assert_eq!(doc.true_label(), "guns");
        assert_eq!(doc.feature_count("gun"), 3);
        assert_eq!(doc.feature_count("israel"), 0);
        assert_eq!(doc.features().collect::<Vec<_>>(), vec!["com", "gun"]);
        assert_eq!(doc.len(), 2);
        assert!(!doc.is_binarized());
    }

    #[test]
    fn test_binarized_document_discards_counts() {
        let doc = Document::new(0, "guns", [("gun", 3), ("com", 7)], true);

        assert!(doc.is_binarized());
        assert_eq!(doc.feature_count("gun"), 1);
        assert_eq!(doc.feature_count("com"), 1);
    }

    #[test]
    fn test_system_label_before_classification() {
        let doc = Document::new(5, "guns", [("gun", 1)], false);

        assert!(!doc.is_classified());
        assert!(matches!(
            doc.system_label(),
            Err(MltkError::UnclassifiedDocument(5))
        ));
        assert!(doc.label_scores().is_err());
        assert!(doc.formatted_system_output(false).is_err());
    }

    #[test]
    fn test_set_system_output_picks_argmax() {
        let mut doc = Document::new(0, "b", [("x", 1)], false);
        doc.set_system_output(scores(&[("a", -3.0), ("b", -1.0), ("c", -2.0)]))
            .unwrap();

        assert_eq!(doc.system_label().unwrap(), "b");
        assert_eq!(doc.label_score("c").unwrap(), -2.0);
        assert_eq!(doc.label_score("missing").unwrap(), 0.0);
    }

    #[test]
    fn test_set_system_output_ties_break_lexicographically() {
        let mut doc = Document::new(0, "a", [("x", 1)], false);
        doc.set_system_output(scores(&[("zeta", -1.0), ("alpha", -1.0), ("mid", -4.0)]))
            .unwrap();

        assert_eq!(doc.system_label().unwrap(), "alpha");
    }

    #[test]
    fn test_set_system_output_rejects_empty_scores() {
        let mut doc = Document::new(0, "a", [("x", 1)], false);
        let err = doc.set_system_output(BTreeMap::new()).unwrap_err();
        assert!(matches!(err, MltkError::InvalidArgument(_)));
    }

    #[test]
    fn test_set_system_output_with_label() {
        let mut doc = Document::new(0, "a", [("x", 1)], false);
        doc.set_system_output_with_label("b", scores(&[("a", 0.9), ("b", 0.1)]));

        assert_eq!(doc.system_label().unwrap(), "b");
    }

    #[test]
    fn test_formatted_system_output() {
        let mut doc = Document::new(4, "guns", [("gun", 1)], false);
        doc.set_system_output(scores(&[("misc", -2.0), ("guns", -1.0), ("mideast", -3.0)]))
            .unwrap();

        assert_eq!(
            doc.formatted_system_output(false).unwrap(),
            "Document:4 guns guns -1 misc -2 mideast -3"
        );

        let converted = doc.formatted_system_output(true).unwrap();
        let fields: Vec<&str> = converted.split(' ').collect();
        assert_eq!(fields[..3], ["Document:4", "guns", "guns"]);
        assert_eq!(fields[4], "misc");
        assert!((fields[3].parse::<f64>().unwrap() - 0.1).abs() < 1e-12);
        assert!((fields[7].parse::<f64>().unwrap() - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_exponentiate_rejects_non_log_scores() {
        let mut doc = Document::new(0, "a", [("x", 1)], false);
        doc.set_system_output(scores(&[("a", 0.7), ("b", 0.3)])).unwrap();

        let err = doc.formatted_system_output(true).unwrap_err();
        assert!(matches!(err, MltkError::InvalidArgument(_)));
    }
}
