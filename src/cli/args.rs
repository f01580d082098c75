//! Command line argument parsing for the mltk CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::ToolkitConfig;

/// mltk - Naive Bayes text classification toolkit
#[derive(Parser, Debug, Clone)]
#[command(name = "mltk")]
#[command(about = "Train and evaluate Naive Bayes text classifiers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct MltkArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl MltkArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model, write the model file and optionally evaluate on test data
    Train(TrainArgs),

    /// Classify documents with a saved model
    Classify(ClassifyArgs),

    /// Summarize a saved model
    Inspect(InspectArgs),
}

/// Settings shared by every command that builds a model.
#[derive(Args, Debug, Clone, Default)]
pub struct ModelOptions {
    /// JSON configuration file; flags override its values
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Smoothing added to class counts
    #[arg(long)]
    pub class_delta: Option<f64>,

    /// Smoothing added to feature counts
    #[arg(long)]
    pub cond_delta: Option<f64>,

    /// Use binary feature presence instead of counts
    #[arg(short, long)]
    pub binarized: bool,

    /// Format of the document files
    #[arg(long, default_value = "vectors")]
    pub input_format: InputFormat,
}

impl ModelOptions {
    /// Load the configuration file if given and apply flag overrides.
    pub fn resolve(&self) -> crate::error::Result<ToolkitConfig> {
        let mut config = match &self.config {
            Some(path) => ToolkitConfig::from_file(path)?,
            None => ToolkitConfig::default(),
        };
        if let Some(class_delta) = self.class_delta {
            config.naive_bayes.class_delta = class_delta;
        }
        if let Some(cond_delta) = self.cond_delta {
            config.naive_bayes.cond_delta = cond_delta;
        }
        if self.binarized {
            config.naive_bayes.binarized = true;
        }
        config.naive_bayes.validate()?;
        Ok(config)
    }
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Training documents
    #[arg(value_name = "TRAINING_FILE")]
    pub training_file: PathBuf,

    /// Test documents to classify after training
    #[arg(short, long, value_name = "TEST_FILE")]
    pub test_file: Option<PathBuf>,

    /// Where to write the model
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub model_file: Option<PathBuf>,

    /// Where to write per-document system output
    #[arg(short, long, value_name = "SYS_OUTPUT_FILE")]
    pub sys_output: Option<PathBuf>,

    /// Write probabilities instead of log10 scores to the system output
    #[arg(short, long)]
    pub exponentiate: bool,

    #[command(flatten)]
    pub model: ModelOptions,
}

/// Arguments for classification with a saved model
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Model file written by `train`
    #[arg(value_name = "MODEL_FILE")]
    pub model_file: PathBuf,

    /// Documents to classify
    #[arg(value_name = "TEST_FILE")]
    pub test_file: PathBuf,

    /// Where to write per-document system output
    #[arg(short, long, value_name = "SYS_OUTPUT_FILE")]
    pub sys_output: Option<PathBuf>,

    /// Write probabilities instead of log10 scores to the system output
    #[arg(short, long)]
    pub exponentiate: bool,

    #[command(flatten)]
    pub model: ModelOptions,
}

/// Arguments for inspecting a saved model
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Model file written by `train`
    #[arg(value_name = "MODEL_FILE")]
    pub model_file: PathBuf,

    /// The model was trained with binary features
    #[arg(short, long)]
    pub binarized: bool,

    /// Number of most probable features to list per label
    #[arg(long, default_value = "5")]
    pub top: usize,
}

/// Document file formats
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// `label feature:count ...` lines
    #[default]
    Vectors,
    /// JSON object keyed by document id
    Json,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// JSON
    Json,
}
