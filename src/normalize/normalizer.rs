//! Normalizer trait definition.

use crate::dataset::FeatureVector;
use crate::error::Result;

/// Maps a vector that may carry free text onto a categorical schema.
pub trait Normalizer: Send + Sync + std::fmt::Debug {
    /// Produce a categorical copy of `vector`, keeping its weights.
    fn normalize(&self, vector: &FeatureVector) -> Result<FeatureVector>;

    /// Get the name of this normalizer for debugging and logging.
    fn name(&self) -> &str;
}
