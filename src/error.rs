//! Error types for the mltk library.
//!
//! All fallible operations return [`MltkError`] through the crate-wide
//! [`Result`] alias.
//!
//! # Examples
//!
//! ```
//! use mltk::error::{MltkError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(MltkError::invalid_argument("corpus is empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for mltk operations.
#[derive(Error, Debug)]
pub enum MltkError {
    /// I/O errors while reading or writing corpus, model or output files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required argument was not supplied.
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// An argument was supplied but is not acceptable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Smoothing constants or other settings are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The model was used before `train` or `load_model`.
    #[error("Uninitialized model: {0}")]
    UninitializedModel(String),

    /// A model file line could not be interpreted.
    #[error("Malformed model file at line {line}: {reason}")]
    MalformedModel { line: usize, reason: String },

    /// A training-vector line could not be interpreted.
    #[error("Malformed vector at line {line}: {reason}")]
    MalformedVector { line: usize, reason: String },

    /// The document has no system output yet.
    #[error("Document {0} has not been classified")]
    UnclassifiedDocument(usize),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with MltkError.
pub type Result<T> = std::result::Result<T, MltkError>;

impl MltkError {
    /// Create a new missing argument error.
    pub fn missing_argument<S: Into<String>>(msg: S) -> Self {
        MltkError::MissingArgument(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        MltkError::InvalidArgument(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        MltkError::InvalidConfiguration(msg.into())
    }

    /// Create a new uninitialized model error.
    pub fn uninitialized<S: Into<String>>(msg: S) -> Self {
        MltkError::UninitializedModel(msg.into())
    }

    /// Create a new malformed model error for a 1-based line number.
    pub fn malformed_model<S: Into<String>>(line: usize, reason: S) -> Self {
        MltkError::MalformedModel {
            line,
            reason: reason.into(),
        }
    }

    /// Create a new malformed vector error for a 1-based line number.
    pub fn malformed_vector<S: Into<String>>(line: usize, reason: S) -> Self {
        MltkError::MalformedVector {
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = MltkError::invalid_config("cond_delta must be positive");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: cond_delta must be positive"
        );

        let error = MltkError::malformed_model(3, "expected 3 or 4 fields, found 5");
        assert_eq!(
            error.to_string(),
            "Malformed model file at line 3: expected 3 or 4 fields, found 5"
        );

        let error = MltkError::UnclassifiedDocument(7);
        assert_eq!(error.to_string(), "Document 7 has not been classified");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let mltk_error = MltkError::from(io_error);

        match mltk_error {
            MltkError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
