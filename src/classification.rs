//! Ranking and lemma-aware disambiguation on top of a [`Classifier`].
//!
//! [`Classifier`]: crate::naive_bayes::Classifier

mod config;
mod engine;
mod result;

pub use config::{EngineConfig, ScoreDomain};
pub use engine::ClassificationEngine;
pub use result::{Classification, EMPTY_LABEL};
