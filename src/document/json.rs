//! JSON interchange for corpora.
//!
//! A corpus is a JSON object keyed by document id:
//!
//! ```json
//! {"0": {"label": "talk.politics.guns", "features": {"gun": "3", "com": "1"}}}
//! ```
//!
//! Counts are written as strings. Either strings or numbers are accepted on read.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::corpus::{Corpus, CorpusBuilder};
use crate::error::{MltkError, Result};

#[derive(Debug, Serialize, Deserialize)]
struct JsonDocument {
    label: String,
    features: BTreeMap<String, JsonCount>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum JsonCount {
    Number(u64),
    Text(String),
}

impl JsonCount {
    fn value(&self, id: &str, feature: &str) -> Result<u64> {
        match self {
            JsonCount::Number(n) => Ok(*n),
            JsonCount::Text(s) => s.trim().parse().map_err(|_| {
                MltkError::invalid_argument(format!(
                    "document {id}: count \"{s}\" for feature \"{feature}\" is not a non-negative integer"
                ))
            }),
        }
    }
}

impl Corpus {
    /// Parse a corpus from its JSON representation, keeping the ids found there.
    pub fn from_json_str(json: &str, binarized: bool) -> Result<Self> {
        let raw: BTreeMap<String, JsonDocument> = serde_json::from_str(json)?;
        let mut builder = CorpusBuilder::new(binarized);

        for (key, doc) in raw {
            let id: usize = key.parse().map_err(|_| {
                MltkError::invalid_argument(format!("document id \"{key}\" is not an integer"))
            })?;
            let features = doc
                .features
                .iter()
                .map(|(feature, count)| Ok((feature.clone(), count.value(&key, feature)?)))
                .collect::<Result<Vec<(String, u64)>>>()?;
            builder.insert_with_id(id, doc.label, features)?;
        }

        Ok(builder.build())
    }

    /// Read a corpus from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P, binarized: bool) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content, binarized)
    }

    /// Serialize the documents (ids, labels and counts) to JSON.
    pub fn to_json(&self) -> Result<String> {
        let raw: BTreeMap<String, JsonDocument> = self
            .documents()
            .map(|doc| {
                let features = doc
                    .feature_counts()
                    .iter()
                    .map(|(feature, count)| (feature.clone(), JsonCount::Text(count.to_string())))
                    .collect();
                (
                    doc.id().to_string(),
                    JsonDocument {
                        label: doc.true_label().to_string(),
                        features,
                    },
                )
            })
            .collect();
        Ok(serde_json::to_string(&raw)?)
    }
}
