//! Classifier trait definition.

use crate::dataset::{Dataset, FeatureVector, Schema};
use crate::error::Result;
use crate::estimator::Symbol;

/// Capability set of a trainable probabilistic classifier.
///
/// The [`ClassificationEngine`](crate::classification::ClassificationEngine)
/// ranks and disambiguates through this trait only.
pub trait Classifier: Send + Sync + std::fmt::Debug {
    /// Build the classifier from a training set.
    fn train(&mut self, dataset: Dataset) -> Result<()>;

    /// Predict the most likely class of a vector.
    fn classify(&self, vector: &FeatureVector) -> Result<Symbol>;

    /// Probability of every class, summing to 1.
    fn distribution(&self, vector: &FeatureVector) -> Result<Vec<f64>>;

    /// Unnormalized per-class log scores. Defaults to the log of
    /// [`distribution`](Classifier::distribution).
    fn log_posterior(&self, vector: &FeatureVector) -> Result<Vec<f64>> {
        Ok(self
            .distribution(vector)?
            .into_iter()
            .map(f64::ln)
            .collect())
    }

    /// Schema the classifier was built against.
    fn schema(&self) -> &Schema;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}
