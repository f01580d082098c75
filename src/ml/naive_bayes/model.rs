//! Training and scoring.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::NaiveBayesConfig;
use crate::counting::{Counter, NestedCounter, NestedDictionary};
use crate::document::corpus::Corpus;
use crate::document::document::Document;
use crate::error::{MltkError, Result};
use crate::ml::classifier::Classifier;

/// Probabilities learned by `fit` or restored by `load_model`.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct TrainedState {
    /// log10 P(label).
    pub(super) class_log_prob: BTreeMap<String, f64>,
    /// log10 P(feature | label), for every label and every vocabulary feature.
    pub(super) feat_log_prob: NestedDictionary<String, f64>,
    /// P(feature | label) in linear space; kept only in binarized mode.
    pub(super) feat_raw_prob: Option<NestedDictionary<String, f64>>,
    /// Every feature seen in training.
    pub(super) vocabulary: BTreeSet<String>,
}

impl TrainedState {
    /// P(feature | label) in linear space.
    fn raw_prob(&self, label: &str, feature: &str) -> f64 {
        match &self.feat_raw_prob {
            Some(raw) => raw.safe_get(label, feature, 0.0),
            None => 10f64.powf(self.feat_log_prob.safe_get(label, feature, f64::NEG_INFINITY)),
        }
    }

    /// Per label, the log probability of a document with no features at all:
    /// the sum over the vocabulary of log10(1 - P(f | label)).
    fn absent_feature_log_probs(&self) -> BTreeMap<&str, f64> {
        self.class_log_prob
            .keys()
            .map(|label| {
                let total = self
                    .vocabulary
                    .iter()
                    .map(|feature| log_complement(self.raw_prob(label, feature)))
                    .sum();
                (label.as_str(), total)
            })
            .collect()
    }

    /// Bernoulli score: the absent-feature baseline is corrected only for the
    /// features the document actually contains.
    fn score_binarized(
        &self,
        document: &Document,
        absent: &BTreeMap<&str, f64>,
    ) -> BTreeMap<String, f64> {
        self.class_log_prob
            .iter()
            .map(|(label, class_log_prob)| {
                let mut score = class_log_prob + absent.get(label.as_str()).copied().unwrap_or(0.0);
                for feature in document.features() {
                    if let Some(log_prob) = self.feat_log_prob.get(label.as_str(), feature) {
                        score += log_prob - log_complement(self.raw_prob(label, feature));
                    }
                }
                (label.clone(), score)
            })
            .collect()
    }

    /// Multinomial score: counts weight the conditional log probabilities.
    fn score_multinomial(&self, document: &Document) -> BTreeMap<String, f64> {
        self.class_log_prob
            .iter()
            .map(|(label, class_log_prob)| {
                let mut score = *class_log_prob;
                for (feature, &count) in document.feature_counts() {
                    if let Some(log_prob) = self.feat_log_prob.get(label.as_str(), feature.as_str()) {
                        score += count as f64 * log_prob;
                    }
                }
                (label.clone(), score)
            })
            .collect()
    }
}

/// log10(1 - p), floored so that p == 1 still gives a finite value.
fn log_complement(probability: f64) -> f64 {
    (1.0 - probability).max(f64::MIN_POSITIVE).log10()
}

/// Naive Bayes classifier.
///
/// Constructed with its smoothing configuration and the path of the model
/// file that [`train`](Self::train) writes. Learned state is absent until
/// `train`, `fit` or `load_model` succeeds.
#[derive(Debug, Clone)]
pub struct NaiveBayesModel {
    pub(super) config: NaiveBayesConfig,
    model_file: PathBuf,
    pub(super) state: Option<TrainedState>,
}

impl NaiveBayesModel {
    /// Create an untrained model.
    pub fn new<P: Into<PathBuf>>(config: NaiveBayesConfig, model_file: P) -> Result<Self> {
        config.validate()?;
        let model_file = model_file.into();
        if model_file.as_os_str().is_empty() {
            return Err(MltkError::missing_argument("model file path is empty"));
        }
        Ok(NaiveBayesModel {
            config,
            model_file,
            state: None,
        })
    }

    /// Start configuring a model.
    pub fn builder() -> NaiveBayesModelBuilder {
        NaiveBayesModelBuilder::new()
    }

    pub fn config(&self) -> &NaiveBayesConfig {
        &self.config
    }

    pub fn is_binarized(&self) -> bool {
        self.config.binarized
    }

    /// Where `train` writes the model.
    pub fn model_file(&self) -> &Path {
        &self.model_file
    }

    /// Whether learned state is present.
    pub fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    /// log10 class priors, by label.
    pub fn class_log_probs(&self) -> Option<&BTreeMap<String, f64>> {
        self.state.as_ref().map(|s| &s.class_log_prob)
    }

    /// log10 conditionals, keyed `(label, feature)`.
    pub fn feature_log_probs(&self) -> Option<&NestedDictionary<String, f64>> {
        self.state.as_ref().map(|s| &s.feat_log_prob)
    }

    /// Linear conditionals, keyed `(label, feature)`. Binarized models only.
    pub fn feature_raw_probs(&self) -> Option<&NestedDictionary<String, f64>> {
        self.state.as_ref().and_then(|s| s.feat_raw_prob.as_ref())
    }

    /// Features seen in training.
    pub fn vocabulary(&self) -> Option<&BTreeSet<String>> {
        self.state.as_ref().map(|s| &s.vocabulary)
    }

    /// Labels seen in training, in order.
    pub fn labels(&self) -> Vec<&str> {
        self.class_log_probs()
            .map(|probs| probs.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub(super) fn trained_state(&self) -> Result<&TrainedState> {
        self.state.as_ref().ok_or_else(|| {
            MltkError::uninitialized("the model must be trained or loaded before use")
        })
    }

    /// Learn priors and conditionals from `corpus` and write the model file.
    ///
    /// The learned state replaces any previous state only after the model
    /// file has been written.
    pub fn train(&mut self, corpus: &Corpus) -> Result<()> {
        let state = self.estimate(corpus)?;
        self.write_state_to_path(&state, &self.model_file)?;
        info!("Wrote model to {}", self.model_file.display());
        self.state = Some(state);
        Ok(())
    }

    /// Learn priors and conditionals without writing the model file.
    pub fn fit(&mut self, corpus: &Corpus) -> Result<()> {
        self.state = Some(self.estimate(corpus)?);
        Ok(())
    }

    fn estimate(&self, corpus: &Corpus) -> Result<TrainedState> {
        if corpus.is_empty() {
            return Err(MltkError::invalid_argument(
                "cannot train on an empty corpus",
            ));
        }
        if corpus.is_binarized() != self.config.binarized {
            warn!(
                "Corpus binarized={} differs from model binarized={}; using the model's mode",
                corpus.is_binarized(),
                self.config.binarized
            );
        }

        let binarized = self.config.binarized;
        let class_delta = self.config.class_delta;
        let cond_delta = self.config.cond_delta;

        // Documents per label; (label, feature) presence or occurrence totals;
        // per-label sum of the same amounts.
        let mut class_counts: Counter<&str> = Counter::new();
        let mut pair_counts: NestedCounter<&str> = NestedCounter::new();
        let mut label_totals: Counter<&str> = Counter::new();
        let mut vocabulary = BTreeSet::new();

        for document in corpus.documents() {
            let label = document.true_label();
            class_counts.increment(label)?;
            for (feature, &count) in document.feature_counts() {
                let amount = if binarized { 1 } else { count };
                pair_counts.increment_by(label, feature.as_str(), amount)?;
                label_totals.increment_by(label, amount)?;
                if !vocabulary.contains(feature) {
                    vocabulary.insert(feature.clone());
                }
            }
        }

        let num_labels = class_counts.len() as f64;
        let total_docs = corpus.len() as f64;
        let vocabulary_size = vocabulary.len() as f64;
        let log_class_denominator = (class_delta * num_labels + total_docs).log10();

        let labels: BTreeSet<&str> = class_counts.keys().copied().collect();
        let mut class_log_prob = BTreeMap::new();
        let mut feat_log_prob = NestedDictionary::new();
        let mut feat_raw_prob = binarized.then(NestedDictionary::new);

        for label in labels {
            let docs = class_counts.get(label) as f64;
            let prior = (class_delta + docs).log10() - log_class_denominator;
            debug!("log10 P({label}) = {prior}");
            class_log_prob.insert(label.to_string(), prior);

            let denominator = if binarized {
                cond_delta * num_labels + docs
            } else {
                cond_delta * vocabulary_size + label_totals.get(label) as f64
            };
            let log_denominator = denominator.log10();

            for feature in &vocabulary {
                let numerator = cond_delta + pair_counts.get(label, feature.as_str()) as f64;
                feat_log_prob.insert(
                    label.to_string(),
                    feature.clone(),
                    numerator.log10() - log_denominator,
                );
                if let Some(raw) = feat_raw_prob.as_mut() {
                    raw.insert(label.to_string(), feature.clone(), numerator / denominator);
                }
            }
        }

        info!(
            "Trained {} model on {} documents, {} labels, {} features",
            if binarized { "binarized" } else { "multinomial" },
            corpus.len(),
            class_log_prob.len(),
            vocabulary.len()
        );

        Ok(TrainedState {
            class_log_prob,
            feat_log_prob,
            feat_raw_prob,
            vocabulary,
        })
    }

    /// Score every training label for one document.
    ///
    /// Features outside the training vocabulary are ignored.
    pub fn score_document(&self, document: &Document) -> Result<BTreeMap<String, f64>> {
        let state = self.trained_state()?;
        Ok(if self.config.binarized {
            state.score_binarized(document, &state.absent_feature_log_probs())
        } else {
            state.score_multinomial(document)
        })
    }

    /// Assign a system label and label scores to every document in `corpus`.
    pub fn classify(&self, corpus: &mut Corpus) -> Result<()> {
        let state = self.trained_state()?;
        let absent = self
            .config
            .binarized
            .then(|| state.absent_feature_log_probs());

        for document in corpus.documents_mut() {
            let scores = match &absent {
                Some(absent) => state.score_binarized(document, absent),
                None => state.score_multinomial(document),
            };
            document.set_system_output(scores)?;
        }

        debug!("Classified {} documents", corpus.len());
        Ok(())
    }
}

impl Classifier for NaiveBayesModel {
    fn train(&mut self, corpus: &Corpus) -> Result<()> {
        NaiveBayesModel::train(self, corpus)
    }

    fn classify(&self, corpus: &mut Corpus) -> Result<()> {
        NaiveBayesModel::classify(self, corpus)
    }

    fn name(&self) -> &str {
        if self.config.binarized {
            "naive_bayes_binarized"
        } else {
            "naive_bayes_multinomial"
        }
    }
}

/// Builder for [`NaiveBayesModel`].
#[derive(Debug, Clone, Default)]
pub struct NaiveBayesModelBuilder {
    config: NaiveBayesConfig,
    model_file: Option<PathBuf>,
}

impl NaiveBayesModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all smoothing settings at once.
    pub fn config(mut self, config: NaiveBayesConfig) -> Self {
        self.config = config;
        self
    }

    pub fn class_delta(mut self, class_delta: f64) -> Self {
        self.config.class_delta = class_delta;
        self
    }

    pub fn cond_delta(mut self, cond_delta: f64) -> Self {
        self.config.cond_delta = cond_delta;
        self
    }

    pub fn binarized(mut self, binarized: bool) -> Self {
        self.config.binarized = binarized;
        self
    }

    pub fn model_file<P: Into<PathBuf>>(mut self, model_file: P) -> Self {
        self.model_file = Some(model_file.into());
        self
    }

    /// Validate the configuration and create the model.
    ///
    /// # Errors
    /// `MissingArgument` without a model file, `InvalidConfiguration` for bad deltas.
    pub fn build(self) -> Result<NaiveBayesModel> {
        let model_file = self
            .model_file
            .ok_or_else(|| MltkError::missing_argument("a model file path is required"))?;
        NaiveBayesModel::new(self.config, model_file)
    }
}
