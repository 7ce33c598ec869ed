//! Sparse Naive-Bayes model with parallel training and log-space inference.

use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, FeatureVector, Schema, Value};
use crate::error::{LexisenseError, Result};
use crate::estimator::{LAPLACE_PRIOR, Symbol};
use crate::naive_bayes::classifier::Classifier;
use crate::naive_bayes::config::TrainingConfig;
use crate::naive_bayes::grid::EstimatorGrid;
use crate::naive_bayes::trainer::{ShardTrainer, TrainingSummary};

/// Naive-Bayes model over nominal attributes.
///
/// Every (attribute, class) cell and the class prior are Laplace-smoothed
/// [`Estimator`](crate::estimator::Estimator)s. Cells carry their own locks,
/// so [`update`](NaiveBayesModel::update) may be called from many threads at
/// once while inference only ever takes read locks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModelParts")]
pub struct NaiveBayesModel {
    schema: Arc<Schema>,
    grid: EstimatorGrid,
}

/// Decoded fields, checked against each other before becoming a model.
#[derive(Deserialize)]
struct ModelParts {
    schema: Arc<Schema>,
    grid: EstimatorGrid,
}

impl TryFrom<ModelParts> for NaiveBayesModel {
    type Error = LexisenseError;

    fn try_from(parts: ModelParts) -> Result<Self> {
        parts.schema.ensure_categorical()?;
        parts.grid.ensure_shape(&parts.schema)?;
        Ok(Self {
            schema: parts.schema,
            grid: parts.grid,
        })
    }
}

impl NaiveBayesModel {
    /// Create an untrained model. Every slot of `schema`, class included,
    /// must be nominal.
    pub fn new(schema: Schema) -> Result<Self> {
        schema.ensure_categorical()?;
        let grid = EstimatorGrid::allocate(&schema, LAPLACE_PRIOR);
        Ok(Self {
            schema: Arc::new(schema),
            grid,
        })
    }

    /// Create a model for the dataset's schema and build it.
    pub fn fit(dataset: Dataset, config: &TrainingConfig) -> Result<Self> {
        let mut model = Self::new(dataset.schema().as_ref().clone())?;
        model.build_with_config(dataset, config)?;
        Ok(model)
    }

    /// Build the model with the default training configuration.
    pub fn build(&mut self, dataset: Dataset) -> Result<TrainingSummary> {
        self.build_with_config(dataset, &TrainingConfig::default())
    }

    /// Build the model from scratch on `dataset`.
    ///
    /// Vectors with a missing class are dropped. The remaining vectors are
    /// split into contiguous shards, one per worker, and applied concurrently
    /// to a fresh estimator grid. The model only changes if every shard
    /// finished before the configured timeout. The dataset is consumed and
    /// released once training completes.
    pub fn build_with_config(
        &mut self,
        dataset: Dataset,
        config: &TrainingConfig,
    ) -> Result<TrainingSummary> {
        let mut dataset = dataset;
        dataset.schema().ensure_categorical()?;
        self.schema.ensure_compatible(dataset.schema())?;

        let vectors_dropped = dataset.delete_with_missing_class();
        if vectors_dropped > 0 {
            warn!("Dropped {vectors_dropped} training vectors with a missing class");
        }

        let (_, vectors) = dataset.into_parts();
        for vector in &vectors {
            self.check_training_vector(vector)?;
        }

        let prior = if config.laplace { LAPLACE_PRIOR } else { 0.0 };
        let grid = EstimatorGrid::allocate(&self.schema, prior);

        let trainer = ShardTrainer::new(config)?;
        let (grid, mut summary) = trainer.train(Arc::clone(&self.schema), grid, vectors)?;
        summary.vectors_dropped = vectors_dropped;

        self.grid = grid;
        Ok(summary)
    }

    /// Incorporate a single training vector.
    ///
    /// A vector with a missing class is ignored. Distinct vectors may be
    /// applied from different threads at the same time.
    pub fn update(&self, vector: &FeatureVector) -> Result<()> {
        self.check_length(vector)?;
        if vector.class_value(&self.schema).is_none() {
            return Ok(());
        }
        self.check_training_vector(vector)?;
        self.grid.apply(&self.schema, vector);
        Ok(())
    }

    /// Merge a model trained on a disjoint shard with the same schema.
    ///
    /// Neither model is modified when the schemas differ.
    pub fn aggregate(&mut self, other: &NaiveBayesModel) -> Result<()> {
        self.schema.ensure_compatible(&other.schema)?;
        self.grid.aggregate(&other.grid)
    }

    /// Merge shard models pairwise until one remains.
    pub fn reduce(models: Vec<NaiveBayesModel>) -> Result<NaiveBayesModel> {
        if models.is_empty() {
            return Err(LexisenseError::invalid_argument("no models to reduce"));
        }

        let mut level = models;
        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            let mut models = level.into_iter();
            while let Some(mut left) = models.next() {
                if let Some(right) = models.next() {
                    left.aggregate(&right)?;
                }
                next.push(left);
            }
            level = next;
        }

        level
            .pop()
            .ok_or_else(|| LexisenseError::internal("reduction produced no model"))
    }

    /// Per-class log scores: `ln P(k) + Σ w_slot · w_instance · ln P(x_slot | k)`.
    ///
    /// Missing slots contribute nothing. The shared evidence term is left out,
    /// so scores rank classes but are not log-probabilities.
    pub fn log_posterior(&self, vector: &FeatureVector) -> Result<Vec<f64>> {
        self.check_length(vector)?;

        let schema = &self.schema;
        let mut slots = Vec::with_capacity(schema.num_features());
        for (row, slot, attribute) in schema.feature_slots() {
            match vector.value(slot) {
                Value::Missing => {}
                Value::Symbol(symbol) => slots.push((row, *symbol, vector.slot_weight(slot))),
                Value::Text(_) => {
                    return Err(LexisenseError::unsupported_feature(format!(
                        "attribute '{}' holds free text; normalize the vector first",
                        attribute.name()
                    )));
                }
            }
        }

        let instance_weight = vector.weight();
        let scores = (0..schema.num_classes() as Symbol)
            .map(|class| {
                let prior = self.grid.class_distribution().probability(class).ln();
                slots.iter().fold(prior, |score, &(row, symbol, slot_weight)| {
                    let probability = self.grid.cell(row, class).probability(symbol);
                    score + slot_weight * instance_weight * probability.ln()
                })
            })
            .collect();

        Ok(scores)
    }

    /// Class probabilities via log-sum-exp over [`log_posterior`](Self::log_posterior).
    pub fn distribution(&self, vector: &FeatureVector) -> Result<Vec<f64>> {
        let scores = self.log_posterior(vector)?;
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(LexisenseError::no_prediction(format!(
                "degenerate posterior (max log score {max})"
            )));
        }

        let sum: f64 = scores.iter().map(|score| (score - max).exp()).sum();
        let log_denominator = max + sum.ln();
        Ok(scores
            .iter()
            .map(|score| (score - log_denominator).exp())
            .collect())
    }

    /// Index of the highest log score; the first index wins ties.
    pub fn classify(&self, vector: &FeatureVector) -> Result<Symbol> {
        let scores = self.log_posterior(vector)?;

        let mut best: Option<(Symbol, f64)> = None;
        for (class, &score) in scores.iter().enumerate() {
            let threshold = best.map_or(f64::MIN, |(_, best_score)| best_score);
            if score > threshold {
                best = Some((class as Symbol, score));
            }
        }

        match best {
            Some((class, score)) => {
                debug!("Classified as {class} with log score {score}");
                Ok(class)
            }
            None => Err(LexisenseError::no_prediction(
                "every class has the minimum log score",
            )),
        }
    }

    /// Label of the class [`classify`](Self::classify) picks.
    pub fn classify_label(&self, vector: &FeatureVector) -> Result<&str> {
        let class = self.classify(vector)?;
        self.schema
            .class_label(class)
            .ok_or_else(|| LexisenseError::internal(format!("class {class} has no label")))
    }

    /// Schema the model was built against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Shared handle to the schema.
    pub fn schema_handle(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    /// Probability of class `class` under the class prior.
    pub fn class_prior(&self, class: Symbol) -> f64 {
        self.grid.class_distribution().probability(class)
    }

    /// Total weight seen by the class prior, prior mass included.
    pub fn class_weight_total(&self) -> f64 {
        self.grid.class_distribution().sum_of_counts()
    }

    /// `P(symbol | class)` for the attribute at `slot`.
    pub fn conditional_probability(&self, slot: usize, class: Symbol, symbol: Symbol) -> Result<f64> {
        let row = self.row_of(slot)?;
        if class as usize >= self.schema.num_classes() {
            return Err(LexisenseError::invalid_argument(format!(
                "class {class} out of range"
            )));
        }
        Ok(self.grid.cell(row, class).probability(symbol))
    }

    fn row_of(&self, slot: usize) -> Result<usize> {
        self.schema
            .feature_slots()
            .find(|(_, s, _)| *s == slot)
            .map(|(row, _, _)| row)
            .ok_or_else(|| {
                LexisenseError::invalid_argument(format!("slot {slot} is not a feature slot"))
            })
    }

    fn check_length(&self, vector: &FeatureVector) -> Result<()> {
        if vector.len() != self.schema.len() {
            return Err(LexisenseError::invalid_argument(format!(
                "vector has {} slots, model expects {}",
                vector.len(),
                self.schema.len()
            )));
        }
        Ok(())
    }

    fn check_training_vector(&self, vector: &FeatureVector) -> Result<()> {
        self.check_length(vector)?;
        for (attribute, value) in self.schema.attributes().iter().zip(vector.values()) {
            match value {
                Value::Missing => {}
                Value::Text(_) => {
                    return Err(LexisenseError::unsupported_feature(format!(
                        "attribute '{}' holds free text",
                        attribute.name()
                    )));
                }
                Value::Symbol(symbol) => {
                    let num_values = attribute.num_values().unwrap_or(0);
                    if *symbol as usize >= num_values {
                        return Err(LexisenseError::invalid_argument(format!(
                            "symbol {symbol} out of range for attribute '{}' with {num_values} values",
                            attribute.name()
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Classifier for NaiveBayesModel {
    fn train(&mut self, dataset: Dataset) -> Result<()> {
        self.build(dataset).map(|_| ())
    }

    fn classify(&self, vector: &FeatureVector) -> Result<Symbol> {
        NaiveBayesModel::classify(self, vector)
    }

    fn distribution(&self, vector: &FeatureVector) -> Result<Vec<f64>> {
        NaiveBayesModel::distribution(self, vector)
    }

    fn log_posterior(&self, vector: &FeatureVector) -> Result<Vec<f64>> {
        NaiveBayesModel::log_posterior(self, vector)
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn name(&self) -> &str {
        "naive_bayes"
    }
}
