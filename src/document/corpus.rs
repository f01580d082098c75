//! Labeled document collections.

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::document::document::Document;
use crate::document::parser::parse_vector_line;
use crate::error::{MltkError, Result};

/// An id-ordered collection of documents.
///
/// The corpus owns its documents. The label and feature sets are computed
/// on first access and are not affected by later classification.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: BTreeMap<usize, Document>,
    binarized: bool,
    all_labels: OnceCell<BTreeSet<String>>,
    all_features: OnceCell<BTreeSet<String>>,
}

impl Corpus {
    /// Start building a corpus; ids are assigned from 0.
    pub fn builder(binarized: bool) -> CorpusBuilder {
        CorpusBuilder::new(binarized)
    }

    /// Read training vectors, one document per line.
    pub fn from_vector_reader<R: BufRead>(reader: R, binarized: bool) -> Result<Self> {
        let mut builder = CorpusBuilder::new(binarized);
        for (index, line) in reader.lines().enumerate() {
            builder.push_line(&line?, index + 1)?;
        }
        let corpus = builder.build();
        debug!(
            "Loaded {} documents ({} labels)",
            corpus.len(),
            corpus.all_labels().len()
        );
        Ok(corpus)
    }

    /// Read training vectors from a string.
    pub fn from_vector_str(data: &str, binarized: bool) -> Result<Self> {
        Self::from_vector_reader(data.as_bytes(), binarized)
    }

    /// Read training vectors from a file.
    pub fn from_vector_file<P: AsRef<Path>>(path: P, binarized: bool) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_vector_reader(BufReader::new(file), binarized)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn is_binarized(&self) -> bool {
        self.binarized
    }

    /// Look up a document by id.
    pub fn get(&self, id: usize) -> Option<&Document> {
        self.documents.get(&id)
    }

    /// Documents in id order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Mutable documents in id order, used by classifiers to record output.
    pub fn documents_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.documents.values_mut()
    }

    /// Document ids in order.
    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.documents.keys().copied()
    }

    /// Distinct true labels.
    pub fn all_labels(&self) -> &BTreeSet<String> {
        self.all_labels.get_or_init(|| {
            self.documents
                .values()
                .map(|doc| doc.true_label().to_string())
                .collect()
        })
    }

    /// Union of the features of every document.
    pub fn all_features(&self) -> &BTreeSet<String> {
        self.all_features.get_or_init(|| {
            self.documents
                .values()
                .flat_map(|doc| doc.features().map(str::to_string))
                .collect()
        })
    }
}

/// Builds a [`Corpus`], handing out ids from an explicit cursor.
#[derive(Debug)]
pub struct CorpusBuilder {
    next_id: usize,
    binarized: bool,
    documents: BTreeMap<usize, Document>,
}

impl CorpusBuilder {
    /// Create a builder whose first document gets id 0.
    pub fn new(binarized: bool) -> Self {
        CorpusBuilder {
            next_id: 0,
            binarized,
            documents: BTreeMap::new(),
        }
    }

    /// The id the next pushed document will receive.
    pub fn next_id(&self) -> usize {
        self.next_id
    }

    /// Add a document and return its id.
    pub fn push<S, I, F>(&mut self, label: S, features: I) -> usize
    where
        S: Into<String>,
        I: IntoIterator<Item = (F, u64)>,
        F: Into<String>,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.documents
            .insert(id, Document::new(id, label, features, self.binarized));
        id
    }

    /// Parse a vector line and add it. Blank lines are skipped and return `None`.
    pub fn push_line(&mut self, line: &str, line_number: usize) -> Result<Option<usize>> {
        match parse_vector_line(line, line_number)? {
            Some(parsed) => Ok(Some(self.push(parsed.label, parsed.features))),
            None => Ok(None),
        }
    }

    /// Add a document under a caller-chosen id. The cursor moves past it.
    pub fn insert_with_id<S, I, F>(&mut self, id: usize, label: S, features: I) -> Result<()>
    where
        S: Into<String>,
        I: IntoIterator<Item = (F, u64)>,
        F: Into<String>,
    {
        if self.documents.contains_key(&id) {
            return Err(MltkError::invalid_argument(format!(
                "duplicate document id {id}"
            )));
        }
        self.documents
            .insert(id, Document::new(id, label, features, self.binarized));
        self.next_id = self.next_id.max(id + 1);
        Ok(())
    }

    /// Add a document and return the builder, for chaining.
    pub fn with<S, I, F>(mut self, label: S, features: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (F, u64)>,
        F: Into<String>,
    {
        self.push(label, features);
        self
    }

    pub fn build(self) -> Corpus {
        Corpus {
            documents: self.documents,
            binarized: self.binarized,
            all_labels: OnceCell::new(),
            all_features: OnceCell::new(),
        }
    }
}
