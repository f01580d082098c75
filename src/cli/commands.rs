//! Command implementations for the mltk CLI.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{NaiveBayesConfig, ToolkitConfig};
use crate::document::corpus::Corpus;
use crate::evaluation::{ConfusionMatrix, write_sys_output_file};
use crate::ml::naive_bayes::recorded_mode;
use crate::ml::{Classifier, NaiveBayesModel};

/// Execute a CLI command.
pub fn execute_command(args: MltkArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args, &args),
        Command::Classify(classify_args) => classify(classify_args, &args),
        Command::Inspect(inspect_args) => inspect(inspect_args, &args),
    }
}

fn load_corpus(path: &Path, format: InputFormat, binarized: bool) -> Result<Corpus> {
    let corpus = match format {
        InputFormat::Vectors => Corpus::from_vector_file(path, binarized),
        InputFormat::Json => Corpus::from_json_file(path, binarized),
    }
    .with_context(|| format!("failed to load documents from {}", path.display()))?;
    info!("Loaded {} documents from {}", corpus.len(), path.display());
    Ok(corpus)
}

/// Classify `corpus`, optionally write system output, and tally the result.
fn evaluate(
    classifier: &dyn Classifier,
    corpus: &mut Corpus,
    name: &str,
    sys_output: Option<&Path>,
    exponentiate: bool,
) -> Result<ConfusionMatrix> {
    classifier
        .classify(corpus)
        .with_context(|| format!("failed to classify {name} data with {}", classifier.name()))?;

    if let Some(path) = sys_output {
        write_sys_output_file(corpus, path, exponentiate)
            .with_context(|| format!("failed to write system output to {}", path.display()))?;
        debug!("Wrote {name} system output to {}", path.display());
    }

    Ok(ConfusionMatrix::from_corpus(corpus, name)?)
}

fn print_matrix(matrix: &ConfusionMatrix, cli_args: &MltkArgs) {
    if matches!(cli_args.output_format, OutputFormat::Human) && cli_args.verbosity() > 0 {
        print!("{matrix}");
    }
}

/// Train a model and evaluate it on the training data and optional test data.
fn train(args: &TrainArgs, cli_args: &MltkArgs) -> Result<()> {
    let mut config: ToolkitConfig = args.model.resolve()?;
    if let Some(model_file) = &args.model_file {
        config.model_file = Some(model_file.clone());
    }
    if let Some(sys_output) = &args.sys_output {
        config.sys_output_file = Some(sys_output.clone());
    }
    config.exponentiate_scores |= args.exponentiate;

    let model_file = config.require_model_file()?.to_path_buf();
    let binarized = config.naive_bayes.binarized;

    let mut training = load_corpus(&args.training_file, args.model.input_format, binarized)?;
    let mut test = args
        .test_file
        .as_deref()
        .map(|path| load_corpus(path, args.model.input_format, binarized))
        .transpose()?;

    let start_time = Instant::now();
    let mut model = NaiveBayesModel::new(config.naive_bayes, &model_file)?;
    Classifier::train(&mut model, &training)
        .with_context(|| format!("failed to train model {}", model_file.display()))?;
    let duration = start_time.elapsed();

    let mut matrices = vec![evaluate(
        &model,
        &mut training,
        "train",
        None,
        config.exponentiate_scores,
    )?];
    if let Some(test) = test.as_mut() {
        matrices.push(evaluate(
            &model,
            test,
            "test",
            config.sys_output_file.as_deref(),
            config.exponentiate_scores,
        )?);
    }
    for matrix in &matrices {
        print_matrix(matrix, cli_args);
    }

    output_result(
        "Model trained successfully",
        &TrainingResult {
            model_file: model_file.to_string_lossy().to_string(),
            binarized,
            documents: training.len(),
            labels: model.labels().len(),
            features: model.vocabulary().map_or(0, |v| v.len()),
            duration_ms: duration.as_millis() as u64,
            evaluations: matrices.iter().map(EvaluationSummary::from).collect(),
        },
        cli_args,
    )?;

    Ok(())
}

/// The feature mode a saved model was trained with, falling back to `requested`
/// for files without a mode header.
fn saved_model_mode(model_file: &Path, requested: bool) -> Result<bool> {
    let recorded = recorded_mode(model_file)
        .with_context(|| format!("failed to load model {}", model_file.display()))?;
    match recorded {
        Some(binarized) => {
            if requested && !binarized {
                warn!(
                    "{} holds a multinomial model; ignoring --binarized",
                    model_file.display()
                );
            }
            Ok(binarized)
        }
        None => Ok(requested),
    }
}

/// Classify documents with a saved model.
fn classify(args: &ClassifyArgs, cli_args: &MltkArgs) -> Result<()> {
    let mut config = args.model.resolve()?;
    config.naive_bayes.binarized =
        saved_model_mode(&args.model_file, config.naive_bayes.binarized)?;
    if let Some(sys_output) = &args.sys_output {
        config.sys_output_file = Some(sys_output.clone());
    }
    config.exponentiate_scores |= args.exponentiate;
    let binarized = config.naive_bayes.binarized;

    let mut model = NaiveBayesModel::new(config.naive_bayes, &args.model_file)?;
    model
        .load_model(&args.model_file)
        .with_context(|| format!("failed to load model {}", args.model_file.display()))?;

    let mut test = load_corpus(&args.test_file, args.model.input_format, binarized)?;

    let start_time = Instant::now();
    let matrix = evaluate(
        &model,
        &mut test,
        "test",
        config.sys_output_file.as_deref(),
        config.exponentiate_scores,
    )?;
    let duration = start_time.elapsed();
    print_matrix(&matrix, cli_args);

    output_result(
        "Documents classified successfully",
        &ClassificationResult {
            model_file: args.model_file.to_string_lossy().to_string(),
            documents: test.len(),
            duration_ms: duration.as_millis() as u64,
            sys_output_file: config
                .sys_output_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            evaluation: EvaluationSummary::from(&matrix),
        },
        cli_args,
    )?;

    Ok(())
}

/// Summarize a saved model.
fn inspect(args: &InspectArgs, cli_args: &MltkArgs) -> Result<()> {
    let binarized = saved_model_mode(&args.model_file, args.binarized)?;
    let config = NaiveBayesConfig {
        binarized,
        ..NaiveBayesConfig::default()
    };

    let mut model = NaiveBayesModel::new(config, &args.model_file)?;
    model
        .load_model(&args.model_file)
        .with_context(|| format!("failed to load model {}", args.model_file.display()))?;

    let priors: BTreeMap<String, f64> = model
        .class_log_probs()
        .map(|probs| {
            probs
                .iter()
                .map(|(label, log_prob)| (label.clone(), 10f64.powf(*log_prob)))
                .collect()
        })
        .unwrap_or_default();

    let top_features: BTreeMap<String, Vec<(String, f64)>> = model
        .feature_log_probs()
        .map(|probs| {
            probs
                .outer_keys()
                .map(|label| {
                    let mut features: Vec<(String, f64)> = probs
                        .row(label.as_str())
                        .into_iter()
                        .flatten()
                        .map(|(feature, log_prob)| (feature.clone(), *log_prob))
                        .collect();
                    features.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                    features.truncate(args.top);
                    (label.clone(), features)
                })
                .collect()
        })
        .unwrap_or_default();

    output_result(
        "Model summary",
        &ModelSummary {
            model_file: args.model_file.to_string_lossy().to_string(),
            binarized,
            labels: model.labels().len(),
            features: model.vocabulary().map_or(0, |v| v.len()),
            priors,
            top_features,
        },
        cli_args,
    )?;

    Ok(())
}
