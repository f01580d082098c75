//! Configuration for the classifier and the command line tool.
//!
//! Both structures are plain serde types so they can be read from a JSON
//! file and overridden field by field from command line flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MltkError, Result};

/// Smoothing constants and feature mode for Naive Bayes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayesConfig {
    /// Additive smoothing applied to class priors. May be zero.
    pub class_delta: f64,
    /// Additive smoothing applied to feature conditionals. Must be positive.
    pub cond_delta: f64,
    /// Treat features as present/absent (Bernoulli) instead of counts.
    pub binarized: bool,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        Self {
            class_delta: 0.1,
            cond_delta: 0.1,
            binarized: false,
        }
    }
}

impl NaiveBayesConfig {
    /// Create a config with explicit smoothing constants.
    pub fn new(class_delta: f64, cond_delta: f64, binarized: bool) -> Self {
        Self {
            class_delta,
            cond_delta,
            binarized,
        }
    }

    /// Check that the smoothing constants are usable.
    pub fn validate(&self) -> Result<()> {
        if !self.class_delta.is_finite() || self.class_delta < 0.0 {
            return Err(MltkError::invalid_config(format!(
                "class_delta must be a finite non-negative number, got {}",
                self.class_delta
            )));
        }
        if !self.cond_delta.is_finite() || self.cond_delta <= 0.0 {
            return Err(MltkError::invalid_config(format!(
                "cond_delta must be a finite positive number, got {}",
                self.cond_delta
            )));
        }
        Ok(())
    }
}

/// Settings for a full train/classify run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Naive Bayes parameters.
    pub naive_bayes: NaiveBayesConfig,
    /// Where the trained model is written to or read from.
    pub model_file: Option<PathBuf>,
    /// Where per-document system output is written.
    pub sys_output_file: Option<PathBuf>,
    /// Convert log10 scores back to probabilities in the system output.
    pub exponentiate_scores: bool,
}

impl ToolkitConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: ToolkitConfig = serde_json::from_str(&content)?;
        config.naive_bayes.validate()?;
        Ok(config)
    }

    /// The model file path, or a `MissingArgument` error when none was configured.
    pub fn require_model_file(&self) -> Result<&Path> {
        self.model_file
            .as_deref()
            .ok_or_else(|| MltkError::missing_argument("no model file configured"))
    }
}
