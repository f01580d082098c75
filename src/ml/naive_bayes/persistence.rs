//! Flat text model files.
//!
//! ```text
//! // mltk naive bayes model
//! // mode: multinomial
//! // class_delta: 0.1
//! // cond_delta: 0.1
//! talk.politics.guns 0.3333333333333333 -0.47712125471966244
//! ...
//! gun talk.politics.guns 0.6288659793814433 -0.2014728625006028
//! ...
//! ```
//!
//! Class records (`label prob logProb`) come first, then feature records
//! (`feature label prob logProb`). Lines starting with `//` are comments.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::counting::NestedDictionary;
use crate::error::{MltkError, Result};
use crate::ml::naive_bayes::model::{NaiveBayesModel, TrainedState};
use crate::util::float::format_float;

const COMMENT: &str = "//";
const MODE_HEADER: &str = "mode:";
const BINARIZED: &str = "binarized";
const MULTINOMIAL: &str = "multinomial";

impl NaiveBayesModel {
    /// Write the learned state to `path`, replacing any existing file.
    pub fn write_model<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let state = self.trained_state()?;
        self.write_state_to_path(state, path.as_ref())
    }

    /// Write the learned state to any writer.
    pub fn write_model_to<W: Write>(&self, writer: W) -> Result<()> {
        let state = self.trained_state()?;
        self.write_state(state, writer)
    }

    pub(super) fn write_state_to_path(&self, state: &TrainedState, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_state(state, BufWriter::new(file))
    }

    fn write_state<W: Write>(&self, state: &TrainedState, mut writer: W) -> Result<()> {
        for name in state.class_log_prob.keys().chain(state.vocabulary.iter()) {
            check_token(name)?;
        }

        writeln!(writer, "{COMMENT} mltk naive bayes model")?;
        writeln!(
            writer,
            "{COMMENT} {MODE_HEADER} {}",
            mode_name(self.config.binarized)
        )?;
        writeln!(writer, "{COMMENT} class_delta: {}", format_float(self.config.class_delta))?;
        writeln!(writer, "{COMMENT} cond_delta: {}", format_float(self.config.cond_delta))?;

        for (label, log_prob) in &state.class_log_prob {
            writeln!(
                writer,
                "{label} {} {}",
                format_float(10f64.powf(*log_prob)),
                format_float(*log_prob)
            )?;
        }

        for (label, feature, log_prob) in state.feat_log_prob.iter() {
            let prob = match &state.feat_raw_prob {
                Some(raw) => raw.safe_get(label, feature, 10f64.powf(*log_prob)),
                None => 10f64.powf(*log_prob),
            };
            writeln!(
                writer,
                "{feature} {label} {} {}",
                format_float(prob),
                format_float(*log_prob)
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Replace the learned state with the model stored at `path`.
    pub fn load_model<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::open(path.as_ref())?;
        self.load_model_from(BufReader::new(file))?;
        info!("Loaded model from {}", path.as_ref().display());
        Ok(())
    }

    /// Replace the learned state with a model read from `reader`.
    ///
    /// A file whose `// mode:` header disagrees with this model's mode is
    /// rejected. The current state is kept if the input is malformed or
    /// incomplete.
    pub fn load_model_from<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let state = read_state(reader, self.config.binarized)?;
        self.state = Some(state);
        Ok(())
    }
}

/// The feature mode recorded in a model file's header: `Some(true)` for
/// binarized, `Some(false)` for multinomial, `None` when the header is absent.
///
/// Only the leading comment block is read.
pub fn recorded_mode<P: AsRef<Path>>(path: P) -> Result<Option<bool>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !trimmed.starts_with(COMMENT) {
            break;
        }
        if let Some(mode) = parse_mode_header(trimmed, index + 1)? {
            return Ok(Some(mode));
        }
    }
    Ok(None)
}

/// Parse a `// mode: <binarized|multinomial>` comment; other comments give `None`.
fn parse_mode_header(comment: &str, line: usize) -> Result<Option<bool>> {
    let body = comment.trim_start_matches(COMMENT).trim();
    let Some(value) = body.strip_prefix(MODE_HEADER) else {
        return Ok(None);
    };
    match value.trim() {
        BINARIZED => Ok(Some(true)),
        MULTINOMIAL => Ok(Some(false)),
        other => Err(MltkError::malformed_model(
            line,
            format!("unknown mode \"{other}\""),
        )),
    }
}

fn mode_name(binarized: bool) -> &'static str {
    if binarized { BINARIZED } else { MULTINOMIAL }
}

/// Labels and features are whitespace-delimited in the file.
fn check_token(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) || name.starts_with(COMMENT) {
        return Err(MltkError::invalid_argument(format!(
            "\"{name}\" cannot be written to a model file"
        )));
    }
    Ok(())
}

fn parse_number(field: &str, line: usize) -> Result<f64> {
    field
        .parse()
        .map_err(|_| MltkError::malformed_model(line, format!("\"{field}\" is not a number")))
}

fn read_state<R: BufRead>(reader: R, binarized: bool) -> Result<TrainedState> {
    let mut class_log_prob = BTreeMap::new();
    let mut feat_log_prob = NestedDictionary::new();
    let mut feat_raw_prob = binarized.then(NestedDictionary::new);
    let mut vocabulary = BTreeSet::new();
    let mut in_features = false;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with(COMMENT) {
            if let Some(recorded) = parse_mode_header(trimmed, line_number)? {
                if recorded != binarized {
                    return Err(MltkError::malformed_model(
                        line_number,
                        format!(
                            "file holds a {} model but a {} model is loading it",
                            mode_name(recorded),
                            mode_name(binarized)
                        ),
                    ));
                }
            }
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        match fields.as_slice() {
            [label, _prob, log_prob] => {
                if in_features {
                    return Err(MltkError::malformed_model(
                        line_number,
                        "class record after feature records",
                    ));
                }
                let log_prob = parse_number(log_prob, line_number)?;
                if class_log_prob.insert(label.to_string(), log_prob).is_some() {
                    return Err(MltkError::malformed_model(
                        line_number,
                        format!("duplicate class record for \"{label}\""),
                    ));
                }
            }
            [feature, label, prob, log_prob] => {
                if class_log_prob.is_empty() {
                    return Err(MltkError::malformed_model(
                        line_number,
                        "feature record before any class record",
                    ));
                }
                if !class_log_prob.contains_key(*label) {
                    return Err(MltkError::malformed_model(
                        line_number,
                        format!("feature record for unknown label \"{label}\""),
                    ));
                }
                in_features = true;

                let prob = parse_number(prob, line_number)?;
                let log_prob = parse_number(log_prob, line_number)?;
                if feat_log_prob
                    .insert(label.to_string(), feature.to_string(), log_prob)
                    .is_some()
                {
                    return Err(MltkError::malformed_model(
                        line_number,
                        format!("duplicate record for feature \"{feature}\" and label \"{label}\""),
                    ));
                }
                if let Some(raw) = feat_raw_prob.as_mut() {
                    raw.insert(label.to_string(), feature.to_string(), prob);
                }
                if !vocabulary.contains(*feature) {
                    vocabulary.insert(feature.to_string());
                }
            }
            _ => {
                return Err(MltkError::malformed_model(
                    line_number,
                    format!("expected 3 or 4 fields, found {}", fields.len()),
                ));
            }
        }
    }

    if class_log_prob.is_empty() {
        return Err(MltkError::malformed_model(0, "no class records"));
    }

    let expected = class_log_prob.len() * vocabulary.len();
    if feat_log_prob.len() != expected {
        let reason = class_log_prob
            .keys()
            .flat_map(|label| vocabulary.iter().map(move |feature| (label, feature)))
            .find(|(label, feature)| !feat_log_prob.contains(*label, *feature))
            .map(|(label, feature)| {
                format!("missing record for feature \"{feature}\" and label \"{label}\"")
            })
            .unwrap_or_else(|| format!("expected {expected} feature records"));
        return Err(MltkError::malformed_model(0, reason));
    }

    Ok(TrainedState {
        class_log_prob,
        feat_log_prob,
        feat_raw_prob,
        vocabulary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::corpus::Corpus;

    const TRAINING: &str = "\
guns gun:3 com:1
guns gun:1 your:1
mideast israel:2 com:1
misc how:1 your:2
";

    fn model(binarized: bool) -> NaiveBayesModel {
        NaiveBayesModel::builder()
            .binarized(binarized)
            .model_file("unused.model.txt")
            .build()
            .unwrap()
    }

    fn fitted(binarized: bool) -> NaiveBayesModel {
        let mut model = model(binarized);
        model
            .fit(&Corpus::from_vector_str(TRAINING, binarized).unwrap())
            .unwrap();
        model
    }

    fn written(model: &NaiveBayesModel) -> String {
        let mut buffer = Vec::new();
        model.write_model_to(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_write_model_layout() {
        let text = written(&fitted(false));
        let records: Vec<&str> = text.lines().filter(|l| !l.starts_with(COMMENT)).collect();

        // 3 class records, then 3 labels x 5 features.
        assert_eq!(records.len(), 3 + 15);
        assert!(records[0].starts_with("guns "));
        assert!(records[1].starts_with("mideast "));
        assert!(records[2].starts_with("misc "));
        assert!(records[3].starts_with("com guns "));
        assert!(text.contains("// mode: multinomial"));
    }

    #[test]
    fn test_round_trip_both_modes() {
        for binarized in [false, true] {
            let original = fitted(binarized);
            let text = written(&original);

            let mut restored = model(binarized);
            restored.load_model_from(text.as_bytes()).unwrap();

            assert_eq!(restored.class_log_probs(), original.class_log_probs());
            assert_eq!(restored.feature_log_probs(), original.feature_log_probs());
            assert_eq!(restored.feature_raw_probs(), original.feature_raw_probs());
            assert_eq!(restored.vocabulary(), original.vocabulary());
        }
    }

    #[test]
    fn test_write_before_training() {
        let err = model(false).write_model_to(Vec::new()).unwrap_err();
        assert!(matches!(err, MltkError::UninitializedModel(_)));
    }

    #[test]
    fn test_write_rejects_whitespace_in_names() {
        let mut model = model(false);
        let corpus = Corpus::builder(false).with("two words", [("f", 1)]).build();
        model.fit(&corpus).unwrap();

        let err = model.write_model_to(Vec::new()).unwrap_err();
        assert!(matches!(err, MltkError::InvalidArgument(_)));
    }

    #[test]
    fn test_load_skips_comments_and_blank_lines() {
        let text = "// header\n\na 0.5 -0.3\n// middle\nb 0.5 -0.3\nf a 0.5 -0.3\nf b 0.5 -0.3\n";
        let mut model = model(false);
        model.load_model_from(text.as_bytes()).unwrap();

        assert_eq!(model.labels(), vec!["a", "b"]);
        assert_eq!(model.vocabulary().unwrap().len(), 1);
    }

    #[test]
    fn test_load_malformed() {
        let cases = [
            ("a 0.5 -0.3 extra stuff\n", 1),
            ("a 0.5\n", 1),
            ("f a 0.5 -0.3\n", 1),
            ("a 0.5 -0.3\nf a 0.5 -0.3\nb 0.5 -0.3\n", 3),
            ("a 0.5 -0.3\nf b 0.5 -0.3\n", 2),
            ("a 0.5 abc\n", 1),
            ("a 0.5 -0.3\na 0.5 -0.3\n", 2),
            ("a 0.5 -0.3\nf a 0.5 -0.3\nf a 0.5 -0.3\n", 3),
        ];
        for (text, expected_line) in cases {
            let err = model(false).load_model_from(text.as_bytes()).unwrap_err();
            match err {
                MltkError::MalformedModel { line, .. } => assert_eq!(line, expected_line, "{text}"),
                other => panic!("unexpected error for {text:?}: {other}"),
            }
        }
    }

    #[test]
    fn test_load_incomplete_model() {
        let text = "a 0.5 -0.3\nb 0.5 -0.3\nf a 0.5 -0.3\n";
        let err = model(false).load_model_from(text.as_bytes()).unwrap_err();
        assert!(matches!(err, MltkError::MalformedModel { .. }));

        let err = model(false).load_model_from("// only comments\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MltkError::MalformedModel { .. }));
    }

    #[test]
    fn test_load_rejects_mode_mismatch() {
        for binarized in [false, true] {
            let text = written(&fitted(binarized));

            let err = model(!binarized).load_model_from(text.as_bytes()).unwrap_err();
            assert!(matches!(err, MltkError::MalformedModel { line: 2, .. }));
        }
    }

    #[test]
    fn test_load_unknown_mode() {
        let text = "// mode: ternary\na 0.5 -0.3\n";
        let err = model(false).load_model_from(text.as_bytes()).unwrap_err();
        assert!(matches!(err, MltkError::MalformedModel { line: 1, .. }));
    }

    #[test]
    fn test_recorded_mode() {
        let dir = tempfile::tempdir().unwrap();
        for binarized in [false, true] {
            let path = dir.path().join("model.txt");
            fitted(binarized).write_model(&path).unwrap();
            assert_eq!(recorded_mode(&path).unwrap(), Some(binarized));
        }

        let path = dir.path().join("bare.txt");
        std::fs::write(&path, "// no mode here\na 0.5 -0.3\n// mode: binarized\n").unwrap();
        assert_eq!(recorded_mode(&path).unwrap(), None);
    }

    #[test]
    fn test_failed_load_keeps_previous_state() {
        let mut model = fitted(false);
        let before = model.class_log_probs().cloned();

        assert!(model.load_model_from("garbage\n".as_bytes()).is_err());
        assert_eq!(model.class_log_probs().cloned(), before);
    }

    #[test]
    fn test_load_missing_file() {
        let err = model(false)
            .load_model("/nonexistent/model.txt")
            .unwrap_err();
        assert!(matches!(err, MltkError::Io(_)));
    }
}
