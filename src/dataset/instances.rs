//! A schema plus the vectors built against it.

use std::sync::Arc;

use crate::dataset::schema::Schema;
use crate::dataset::vector::FeatureVector;
use crate::error::{LexisenseError, Result};

/// Training or evaluation set.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Arc<Schema>,
    vectors: Vec<FeatureVector>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            vectors: Vec::new(),
        }
    }

    /// Create a dataset from vectors, checking that each one fits the schema.
    pub fn with_vectors(schema: Arc<Schema>, vectors: Vec<FeatureVector>) -> Result<Self> {
        let mut dataset = Self::new(schema);
        dataset.vectors.reserve(vectors.len());
        for vector in vectors {
            dataset.push(vector)?;
        }
        Ok(dataset)
    }

    /// Append a vector.
    pub fn push(&mut self, vector: FeatureVector) -> Result<()> {
        if vector.len() != self.schema.len() {
            return Err(LexisenseError::invalid_argument(format!(
                "vector has {} slots, schema '{}' has {}",
                vector.len(),
                self.schema.name(),
                self.schema.len()
            )));
        }
        self.vectors.push(vector);
        Ok(())
    }

    /// Shared schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Vectors in insertion order.
    pub fn vectors(&self) -> &[FeatureVector] {
        &self.vectors
    }

    /// Number of vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the dataset holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Remove vectors whose class slot is missing; returns how many were removed.
    pub fn delete_with_missing_class(&mut self) -> usize {
        let before = self.vectors.len();
        let schema = Arc::clone(&self.schema);
        self.vectors.retain(|v| v.class_value(&schema).is_some());
        before - self.vectors.len()
    }

    /// Split into schema and vectors.
    pub fn into_parts(self) -> (Arc<Schema>, Vec<FeatureVector>) {
        (self.schema, self.vectors)
    }
}
