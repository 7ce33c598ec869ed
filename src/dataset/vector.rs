//! Positional feature vectors.

use serde::{Deserialize, Serialize};

use crate::dataset::schema::Schema;
use crate::error::{LexisenseError, Result};
use crate::estimator::Symbol;

/// Content of one attribute slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// No value; the slot contributes nothing to training or scoring.
    Missing,
    /// Categorical symbol of a nominal attribute.
    Symbol(Symbol),
    /// Free text awaiting normalization.
    Text(String),
}

impl Value {
    /// Whether the slot is missing.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// The symbol, if the slot is categorical.
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Value::Symbol(symbol) => Some(*symbol),
            _ => None,
        }
    }
}

/// A fixed-length vector of attribute slots with per-slot weights and an
/// overall instance weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<Value>,
    weights: Vec<f64>,
    weight: f64,
}

impl FeatureVector {
    /// Create an all-missing vector for `schema`, taking slot weights from the
    /// schema attributes.
    pub fn new(schema: &Schema) -> Self {
        Self {
            values: vec![Value::Missing; schema.len()],
            weights: schema.attributes().iter().map(|a| a.weight()).collect(),
            weight: 1.0,
        }
    }

    /// Create a vector from explicit values.
    pub fn from_values(schema: &Schema, values: Vec<Value>) -> Result<Self> {
        if values.len() != schema.len() {
            return Err(LexisenseError::invalid_argument(format!(
                "vector has {} slots, schema '{}' has {}",
                values.len(),
                schema.name(),
                schema.len()
            )));
        }

        let mut vector = Self::new(schema);
        vector.values = values;
        Ok(vector)
    }

    /// Create a fully categorical vector; `None` marks a missing slot.
    pub fn from_symbols(schema: &Schema, symbols: &[Option<Symbol>]) -> Result<Self> {
        let values = symbols
            .iter()
            .map(|s| s.map_or(Value::Missing, Value::Symbol))
            .collect();
        Self::from_values(schema, values)
    }

    /// Set the instance weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector has no slots.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All slot values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value of `slot`; out-of-range slots read as missing.
    pub fn value(&self, slot: usize) -> &Value {
        self.values.get(slot).unwrap_or(&Value::Missing)
    }

    /// Replace the value of `slot`.
    pub fn set_value(&mut self, slot: usize, value: Value) -> Result<()> {
        let len = self.values.len();
        let target = self.values.get_mut(slot).ok_or_else(|| {
            LexisenseError::invalid_argument(format!("slot {slot} out of range for {len} slots"))
        })?;
        *target = value;
        Ok(())
    }

    /// Weight multiplier of `slot`.
    pub fn slot_weight(&self, slot: usize) -> f64 {
        self.weights.get(slot).copied().unwrap_or(1.0)
    }

    /// Replace the weight multiplier of `slot`.
    pub fn set_slot_weight(&mut self, slot: usize, weight: f64) -> Result<()> {
        let len = self.weights.len();
        let target = self.weights.get_mut(slot).ok_or_else(|| {
            LexisenseError::invalid_argument(format!("slot {slot} out of range for {len} slots"))
        })?;
        *target = weight;
        Ok(())
    }

    /// Instance weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Replace the instance weight.
    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    /// Whether no slot holds free text.
    pub fn is_categorical(&self) -> bool {
        !self.values.iter().any(|v| matches!(v, Value::Text(_)))
    }

    /// Class symbol under `schema`, `None` when the class slot is missing.
    pub fn class_value(&self, schema: &Schema) -> Option<Symbol> {
        self.value(schema.class_index()).symbol()
    }
}
