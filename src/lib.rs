//! # Lexisense
//!
//! Word-sense classification with a sparse, parallel Naive-Bayes model.
//!
//! ## Features
//!
//! - Sparse Laplace-smoothed estimators with concurrent updates
//! - Sharded fork-join training with a timeout
//! - Log-space inference and top-K ranking
//! - Lemma-aware re-ranking of close candidates
//! - Free-text to nominal normalization
//! - Binary and JSON model persistence

pub mod classification;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod estimator;
pub mod naive_bayes;
pub mod normalize;
pub mod persistence;
pub mod wsd;

pub mod prelude {
    pub use crate::classification::{Classification, ClassificationEngine, EngineConfig, ScoreDomain};
    pub use crate::dataset::{Attribute, Dataset, FeatureVector, Schema, Value};
    pub use crate::error::{LexisenseError, Result};
    pub use crate::estimator::{Estimator, Symbol};
    pub use crate::naive_bayes::{Classifier, NaiveBayesModel, TrainingConfig};
    pub use crate::normalize::{Normalizer, NormalizerConfig, StringToNominal};
    pub use crate::persistence::{BincodeCodec, JsonCodec, ModelCodec, ModelFormat};
    pub use crate::wsd::{ContextVectorBuilder, wsd_schema_template};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
