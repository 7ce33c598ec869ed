//! Error types for the Lexisense library.
//!
//! All fallible operations return [`LexisenseError`] through the crate-wide
//! [`Result`] alias. Training failures are hard stops; classification failures
//! are usually degraded to a sentinel answer by the
//! [`ClassificationEngine`](crate::classification::ClassificationEngine).
//!
//! # Examples
//!
//! ```
//! use lexisense::error::{LexisenseError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LexisenseError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;
use std::time::Duration;

use thiserror::Error;

/// The main error type for Lexisense operations.
#[derive(Error, Debug)]
pub enum LexisenseError {
    /// I/O errors (model files, training data).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A non-categorical attribute reached training or inference.
    #[error("Unsupported feature type: {0}")]
    UnsupportedFeatureType(String),

    /// Two models or estimators were built against different schemas.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The posterior was degenerate and no class could be chosen.
    #[error("No prediction: {0}")]
    NoPrediction(String),

    /// Training shards did not finish before the deadline.
    #[error("Training timed out after {0:?}")]
    TrainingTimeout(Duration),

    /// Free-text values could not be mapped to symbols.
    #[error("Normalization error: {0}")]
    Normalization(String),

    /// Model encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid argument supplied by the caller.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A training worker failed or disappeared.
    #[error("Worker error: {0}")]
    Worker(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with LexisenseError.
pub type Result<T> = std::result::Result<T, LexisenseError>;

impl LexisenseError {
    /// Create a new unsupported feature type error.
    pub fn unsupported_feature<S: Into<String>>(msg: S) -> Self {
        LexisenseError::UnsupportedFeatureType(msg.into())
    }

    /// Create a new schema mismatch error.
    pub fn schema_mismatch<S: Into<String>>(msg: S) -> Self {
        LexisenseError::SchemaMismatch(msg.into())
    }

    /// Create a new no prediction error.
    pub fn no_prediction<S: Into<String>>(msg: S) -> Self {
        LexisenseError::NoPrediction(msg.into())
    }

    /// Create a new normalization error.
    pub fn normalization<S: Into<String>>(msg: S) -> Self {
        LexisenseError::Normalization(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        LexisenseError::Serialization(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        LexisenseError::InvalidArgument(msg.into())
    }

    /// Create a new worker error.
    pub fn worker<S: Into<String>>(msg: S) -> Self {
        LexisenseError::Worker(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LexisenseError::Other(msg.into())
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        LexisenseError::Other(format!("Internal error: {}", msg.into()))
    }
}
