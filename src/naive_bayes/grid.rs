//! Attribute × class estimator grid plus the class prior.

use serde::{Deserialize, Serialize};

use crate::dataset::{FeatureVector, Schema, Value};
use crate::error::{LexisenseError, Result};
use crate::estimator::{Estimator, Symbol};

/// One estimator per (non-class slot, class) cell, stored row-major, and one
/// class-prior estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct EstimatorGrid {
    num_classes: usize,
    cells: Vec<Estimator>,
    class_distribution: Estimator,
}

impl EstimatorGrid {
    /// Allocate every cell for `schema` with the given additive prior.
    pub(crate) fn allocate(schema: &Schema, prior: f64) -> Self {
        let num_classes = schema.num_classes();
        let mut cells = Vec::with_capacity(schema.num_features() * num_classes);
        for (_, _, attribute) in schema.feature_slots() {
            let num_symbols = attribute.num_values().unwrap_or(0);
            cells.extend((0..num_classes).map(|_| Estimator::new(num_symbols, prior)));
        }

        Self {
            num_classes,
            cells,
            class_distribution: Estimator::new(num_classes, prior),
        }
    }

    /// Fail unless the grid has exactly one cell per (feature, class) of
    /// `schema`, each sized to its attribute's cardinality.
    pub(crate) fn ensure_shape(&self, schema: &Schema) -> Result<()> {
        let num_classes = schema.num_classes();
        if self.num_classes != num_classes || self.class_distribution.num_symbols() != num_classes {
            return Err(LexisenseError::schema_mismatch(format!(
                "grid has {} classes, schema has {num_classes}",
                self.num_classes
            )));
        }
        if self.cells.len() != schema.num_features() * num_classes {
            return Err(LexisenseError::schema_mismatch(format!(
                "grid has {} cells, schema needs {}",
                self.cells.len(),
                schema.num_features() * num_classes
            )));
        }
        for (row, _, attribute) in schema.feature_slots() {
            let num_symbols = attribute.num_values().unwrap_or(0);
            let row_cells = &self.cells[row * num_classes..(row + 1) * num_classes];
            if row_cells.iter().any(|cell| cell.num_symbols() != num_symbols) {
                return Err(LexisenseError::schema_mismatch(format!(
                    "cells of attribute '{}' are not sized to its {num_symbols} values",
                    attribute.name()
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn cell(&self, row: usize, class: Symbol) -> &Estimator {
        &self.cells[row * self.num_classes + class as usize]
    }

    pub(crate) fn class_distribution(&self) -> &Estimator {
        &self.class_distribution
    }

    /// Count one vector. The vector must already be validated against
    /// `schema`; a missing class makes this a no-op.
    pub(crate) fn apply(&self, schema: &Schema, vector: &FeatureVector) {
        let Some(class) = vector.class_value(schema) else {
            return;
        };

        let weight = vector.weight();
        for (row, slot, _) in schema.feature_slots() {
            if let Value::Symbol(symbol) = vector.value(slot) {
                self.cell(row, class)
                    .add_value(*symbol, vector.slot_weight(slot) * weight);
            }
        }
        self.class_distribution.add_value(class, weight);
    }

    /// Merge a grid of identical shape cell by cell. Shapes are checked for
    /// every cell before anything is modified.
    pub(crate) fn aggregate(&self, other: &EstimatorGrid) -> Result<()> {
        let same_shape = self.num_classes == other.num_classes
            && self.cells.len() == other.cells.len()
            && self.class_distribution.num_symbols() == other.class_distribution.num_symbols()
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(ours, theirs)| ours.num_symbols() == theirs.num_symbols());
        if !same_shape {
            return Err(LexisenseError::schema_mismatch(
                "estimator grids have different shapes",
            ));
        }

        self.class_distribution.aggregate(&other.class_distribution)?;
        for (ours, theirs) in self.cells.iter().zip(&other.cells) {
            ours.aggregate(theirs)?;
        }
        Ok(())
    }
}
