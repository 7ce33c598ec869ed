//! Learned vocabulary mapping from free text to nominal symbols.

use std::sync::{Arc, LazyLock};

use ahash::AHashSet;
use log::debug;

use crate::dataset::{Attribute, Dataset, FeatureVector, Schema, Value};
use crate::error::{LexisenseError, Result};
use crate::normalize::config::NormalizerConfig;
use crate::normalize::normalizer::Normalizer;

/// Punctuation and markup tokens that carry no sense information.
pub const FILTER_WORDS: &[&str] = &[
    "NONE", ".", ",", ";", "-rrb-", "-rsb-", "-lrb-", "-lsb-", "''", "'", "--", "-", ":", "``",
    "`", "|", "!", "?", "<", ">", "_", "\u{2212}", "#", "...", "-lcb-", "-rcb-", "<math>", "\\",
    "</sup>", "<sup>", "+", "ii", "iii", "</u>", "<u>", "</tt>", "<tt>", "=", "'s", "%",
];

static FILTER_WORD_SET: LazyLock<AHashSet<&'static str>> =
    LazyLock::new(|| FILTER_WORDS.iter().copied().collect());

/// Whether `token` is one of the built-in [`FILTER_WORDS`].
pub fn is_filter_word(token: &str) -> bool {
    FILTER_WORD_SET.contains(token)
}

/// Maps free-text attribute values to nominal symbols.
///
/// The vocabulary of every text attribute is learned from training vectors in
/// first-seen order. Values never seen during fitting, and filter words when
/// filtering is enabled, normalize to missing. The class slot is never
/// filtered.
#[derive(Debug, Clone)]
pub struct StringToNominal {
    schema: Arc<Schema>,
    extra_filter_words: AHashSet<String>,
    drop_filter_words: bool,
}

impl StringToNominal {
    /// Learn nominal attributes for `template` from `vectors`.
    ///
    /// Attributes that are already nominal in the template are kept as is.
    pub fn fit(
        template: &Schema,
        vectors: &[FeatureVector],
        config: &NormalizerConfig,
    ) -> Result<Self> {
        let mut normalizer = Self {
            schema: Arc::new(template.clone()),
            extra_filter_words: config.extra_filter_words.iter().cloned().collect(),
            drop_filter_words: config.drop_filter_words,
        };

        let mut vocabularies: Vec<(Vec<String>, AHashSet<String>)> =
            vec![(Vec::new(), AHashSet::new()); template.len()];

        for (row, vector) in vectors.iter().enumerate() {
            if vector.len() != template.len() {
                return Err(LexisenseError::invalid_argument(format!(
                    "training vector {row} has {} slots, schema '{}' has {}",
                    vector.len(),
                    template.name(),
                    template.len()
                )));
            }

            for (slot, value) in vector.values().iter().enumerate() {
                let Value::Text(text) = value else {
                    continue;
                };
                if template.attributes()[slot].is_nominal()
                    || normalizer.is_filtered(template, slot, text)
                {
                    continue;
                }
                let (order, seen) = &mut vocabularies[slot];
                if seen.insert(text.clone()) {
                    order.push(text.clone());
                }
            }
        }

        let attributes = template
            .attributes()
            .iter()
            .zip(vocabularies)
            .map(|(attribute, (values, _))| {
                if attribute.is_nominal() {
                    attribute.clone()
                } else {
                    Attribute::nominal(attribute.name(), values).with_weight(attribute.weight())
                }
            })
            .collect();

        let schema = Schema::new(template.name(), attributes, template.class_index())?;
        debug!(
            "Learned nominal schema '{}' with cardinalities {:?}",
            schema.name(),
            schema.cardinalities()
        );

        normalizer.schema = Arc::new(schema);
        Ok(normalizer)
    }

    /// Rebuild a normalizer from a previously learned nominal schema.
    pub fn from_schema(schema: Arc<Schema>, config: &NormalizerConfig) -> Result<Self> {
        schema.ensure_categorical()?;
        Ok(Self {
            schema,
            extra_filter_words: config.extra_filter_words.iter().cloned().collect(),
            drop_filter_words: config.drop_filter_words,
        })
    }

    /// The learned nominal schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Normalize every vector of a free-text dataset.
    pub fn transform_dataset(&self, dataset: Dataset) -> Result<Dataset> {
        let (_, vectors) = dataset.into_parts();
        let vectors = vectors
            .iter()
            .map(|vector| self.normalize(vector))
            .collect::<Result<Vec<_>>>()?;
        Dataset::with_vectors(Arc::clone(&self.schema), vectors)
    }

    /// Learn the vocabulary of `dataset` and normalize it in one pass.
    pub fn fit_transform(dataset: Dataset, config: &NormalizerConfig) -> Result<(Self, Dataset)> {
        let normalizer = Self::fit(dataset.schema(), dataset.vectors(), config)?;
        let normalized = normalizer.transform_dataset(dataset)?;
        Ok((normalizer, normalized))
    }

    fn is_filtered(&self, schema: &Schema, slot: usize, text: &str) -> bool {
        self.drop_filter_words
            && slot != schema.class_index()
            && (is_filter_word(text) || self.extra_filter_words.contains(text))
    }
}

impl Normalizer for StringToNominal {
    fn normalize(&self, vector: &FeatureVector) -> Result<FeatureVector> {
        let schema = &self.schema;
        if vector.len() != schema.len() {
            return Err(LexisenseError::normalization(format!(
                "vector has {} slots, schema '{}' has {}",
                vector.len(),
                schema.name(),
                schema.len()
            )));
        }

        let mut values = Vec::with_capacity(schema.len());
        for (slot, (attribute, value)) in schema.attributes().iter().zip(vector.values()).enumerate() {
            let normalized = match value {
                Value::Missing => Value::Missing,
                Value::Text(text) if self.is_filtered(schema, slot, text) => Value::Missing,
                Value::Text(text) => attribute
                    .index_of(text)
                    .map_or(Value::Missing, Value::Symbol),
                Value::Symbol(symbol) => {
                    if attribute.value(*symbol).is_none() {
                        return Err(LexisenseError::normalization(format!(
                            "symbol {symbol} is out of range for attribute '{}'",
                            attribute.name()
                        )));
                    }
                    Value::Symbol(*symbol)
                }
            };
            values.push(normalized);
        }

        let mut normalized = FeatureVector::from_values(schema, values)?.with_weight(vector.weight());
        for slot in 0..schema.len() {
            normalized.set_slot_weight(slot, vector.slot_weight(slot))?;
        }
        Ok(normalized)
    }

    fn name(&self) -> &str {
        "string_to_nominal"
    }
}
