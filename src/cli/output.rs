//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cli::args::{MltkArgs, OutputFormat};
use crate::error::Result;
use crate::evaluation::ConfusionMatrix;

/// Accuracy figures for one data set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub name: String,
    pub documents: u64,
    pub correct: u64,
    pub accuracy: f64,
}

impl From<&ConfusionMatrix> for EvaluationSummary {
    fn from(matrix: &ConfusionMatrix) -> Self {
        EvaluationSummary {
            name: matrix.name().to_string(),
            documents: matrix.total(),
            correct: matrix.correct(),
            accuracy: matrix.accuracy(),
        }
    }
}

/// Result structure for training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub model_file: String,
    pub binarized: bool,
    pub documents: usize,
    pub labels: usize,
    pub features: usize,
    pub duration_ms: u64,
    pub evaluations: Vec<EvaluationSummary>,
}

/// Result structure for classification with a saved model.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub model_file: String,
    pub documents: usize,
    pub duration_ms: u64,
    pub sys_output_file: Option<String>,
    pub evaluation: EvaluationSummary,
}

/// Summary of a saved model.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model_file: String,
    pub binarized: bool,
    pub labels: usize,
    pub features: usize,
    /// Prior probability per label.
    pub priors: BTreeMap<String, f64>,
    /// Most probable features per label, best first.
    pub top_features: BTreeMap<String, Vec<(String, f64)>>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &MltkArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &MltkArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    if let serde_json::Value::Object(obj) = &value {
        for (key, val) in obj {
            match val {
                serde_json::Value::Object(inner) if !inner.is_empty() => {
                    println!("{key}:");
                    for (inner_key, inner_val) in inner {
                        println!("  {inner_key}: {}", format_value(inner_val));
                    }
                }
                serde_json::Value::Array(items)
                    if items.iter().all(serde_json::Value::is_object) && !items.is_empty() =>
                {
                    println!("{key}:");
                    for item in items {
                        println!("  - {}", format_value(item));
                    }
                }
                _ => println!("{key}: {}", format_value(val)),
            }
        }
    } else {
        println!("{}", format_value(&value));
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &MltkArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(obj) => obj
            .iter()
            .map(|(key, val)| format!("{key}={}", format_value(val)))
            .collect::<Vec<_>>()
            .join(" "),
        serde_json::Value::Null => "-".to_string(),
    }
}
