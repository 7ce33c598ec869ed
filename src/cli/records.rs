//! JSON-lines context records and the saved model artifact.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dataset::{FeatureVector, Schema, Value};
use crate::naive_bayes::NaiveBayesModel;
use crate::normalize::NormalizerConfig;
use crate::wsd::{ACTUAL_WORD_SLOT, CONTEXT_VECTOR_WEIGHT, NONE_TOKEN};

/// One occurrence of a target word, keyed by attribute name.
///
/// ```json
/// {"label": "bank%finance", "values": {"actualWord": "bank", "word-1": "the"}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextRecord {
    /// Known sense, if any.
    #[serde(default)]
    pub label: Option<String>,

    /// Attribute values by attribute name.
    #[serde(default)]
    pub values: BTreeMap<String, String>,

    /// Instance weight; context vectors default to 2.
    #[serde(default)]
    pub weight: Option<f64>,

    /// Lemma used for disambiguation; defaults to the target word.
    #[serde(default)]
    pub lemma: Option<String>,
}

impl ContextRecord {
    /// Build a free-text vector for `schema`.
    ///
    /// `NONE` values stay missing. Unknown attribute names are rejected.
    pub fn to_vector(&self, schema: &Schema) -> Result<FeatureVector> {
        let mut vector = FeatureVector::new(schema).with_weight(self.weight.unwrap_or(CONTEXT_VECTOR_WEIGHT));

        for (name, text) in &self.values {
            let slot = schema
                .attribute_index(name)
                .with_context(|| format!("unknown attribute '{name}'"))?;
            if slot == schema.class_index() {
                anyhow::bail!("attribute '{name}' is the class; use \"label\" instead");
            }
            if text != NONE_TOKEN {
                vector.set_value(slot, Value::Text(text.clone()))?;
            }
        }

        if let Some(label) = &self.label {
            vector.set_value(schema.class_index(), Value::Text(label.clone()))?;
        }
        Ok(vector)
    }

    /// Lemma for disambiguation: the explicit one, else the target word.
    pub fn lemma(&self, schema: &Schema) -> Option<&str> {
        self.lemma.as_deref().or_else(|| {
            schema
                .attribute(ACTUAL_WORD_SLOT)
                .and_then(|attribute| self.values.get(attribute.name()))
                .map(String::as_str)
        })
    }
}

/// Read JSON-lines records, skipping blank lines.
pub fn read_records(path: &Path) -> Result<Vec<ContextRecord>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ContextRecord = serde_json::from_str(&line).with_context(|| {
            format!("invalid record on line {} of {}", line_num + 1, path.display())
        })?;
        records.push(record);
    }
    Ok(records)
}

/// What `train` writes and `classify` reads back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model: NaiveBayesModel,
    pub normalizer: NormalizerConfig,
}
