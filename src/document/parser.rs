//! Parser for the training-vector text format.
//!
//! One document per line:
//!
//! ```text
//! <label> <feature1>:<count1> <feature2>:<count2> ...
//! ```
//!
//! Fields are separated by whitespace and each feature is split from its
//! count at the first colon, so feature names may not contain a colon but
//! counts never do. A feature may appear only once per line.

use ahash::AHashSet;

use crate::error::{MltkError, Result};

/// A parsed vector line: the label and its `(feature, count)` pairs in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorLine {
    pub label: String,
    pub features: Vec<(String, u64)>,
}

/// Parse one line. Returns `Ok(None)` for blank lines.
///
/// `line_number` is 1-based and only used for error messages.
pub fn parse_vector_line(line: &str, line_number: usize) -> Result<Option<VectorLine>> {
    let mut parts = line.split_whitespace();
    let label = match parts.next() {
        Some(label) => label.to_string(),
        None => return Ok(None),
    };

    let mut seen = AHashSet::new();
    let mut features = Vec::new();
    for part in parts {
        let (feature, count) = part.split_once(':').ok_or_else(|| {
            MltkError::malformed_vector(line_number, format!("missing ':' in \"{part}\""))
        })?;
        if feature.is_empty() {
            return Err(MltkError::malformed_vector(
                line_number,
                format!("empty feature name in \"{part}\""),
            ));
        }
        let count: u64 = count.parse().map_err(|_| {
            MltkError::malformed_vector(
                line_number,
                format!("count \"{count}\" for feature \"{feature}\" is not a non-negative integer"),
            )
        })?;
        if !seen.insert(feature) {
            return Err(MltkError::malformed_vector(
                line_number,
                format!("feature \"{feature}\" appears more than once"),
            ));
        }
        features.push((feature.to_string(), count));
    }

    Ok(Some(VectorLine { label, features }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vector_line() {
        let parsed = parse_vector_line("talk.politics.guns gun:3\tcom:1", 1)
            .unwrap()
            .unwrap();

        assert_eq!(parsed.label, "talk.politics.guns");
        assert_eq!(
            parsed.features,
            vec![("gun".to_string(), 3), ("com".to_string(), 1)]
        );
    }

    #[test]
    fn test_parse_label_only_and_blank() {
        let parsed = parse_vector_line("lonely", 1).unwrap().unwrap();
        assert!(parsed.features.is_empty());

        assert!(parse_vector_line("   ", 2).unwrap().is_none());
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            "label gun",
            "label :3",
            "label gun:three",
            "label gun:-1",
            "label gun:1 gun:2",
        ];
        for case in cases {
            let err = parse_vector_line(case, 9).unwrap_err();
            match err {
                MltkError::MalformedVector { line, .. } => assert_eq!(line, 9, "{case}"),
                other => panic!("unexpected error for {case}: {other}"),
            }
        }
    }
}
