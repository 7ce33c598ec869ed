//! Naive-Bayes classification over sparse, smoothed estimators.
//!
//! # Architecture
//!
//! - `Classifier` trait: capability set {train, classify, distribution}
//! - `NaiveBayesModel`: estimator grid, training and log-space inference
//! - `TrainingConfig`: worker pool size, timeout and smoothing
//! - `ShardTrainer`: fork-join executor that applies contiguous shards of the
//!   training set to a shared estimator grid
//!
//! # Example
//!
//! ```rust,no_run
//! use lexisense::dataset::Dataset;
//! use lexisense::naive_bayes::{NaiveBayesModel, TrainingConfig};
//!
//! # fn run(dataset: Dataset) -> lexisense::error::Result<()> {
//! let model = NaiveBayesModel::fit(dataset, &TrainingConfig::default())?;
//! println!("{} classes", model.schema().num_classes());
//! # Ok(())
//! # }
//! ```

mod classifier;
mod config;
mod grid;
mod model;
mod trainer;

pub use classifier::Classifier;
pub use config::TrainingConfig;
pub use model::NaiveBayesModel;
pub use trainer::{ShardTrainer, TrainingSummary};
