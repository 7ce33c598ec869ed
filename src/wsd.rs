//! Word-sense disambiguation feature layout.
//!
//! A context vector describes one occurrence of a target word: the word and
//! its part of speech, up to three tokens on either side (each with its part
//! of speech), and the closest noun and verb on either side. The class slot
//! holds the word sense.

use log::warn;

use crate::dataset::{Attribute, FeatureVector, Schema, Value};
use crate::error::{LexisenseError, Result};

/// Placeholder for "no token here"; setting it leaves the slot missing.
pub const NONE_TOKEN: &str = "NONE";

/// Slot of the word sense (the class).
pub const SENSE_SLOT: usize = 0;
/// Slot of the target word.
pub const ACTUAL_WORD_SLOT: usize = 1;
/// Weight of the target word slot.
pub const ACTUAL_WORD_WEIGHT: f64 = 10.0;
/// Default weight of a context vector.
pub const CONTEXT_VECTOR_WEIGHT: f64 = 2.0;

/// Attribute names in slot order.
pub const ATTRIBUTE_NAMES: [&str; 19] = [
    "wordSense",
    "actualWord",
    "actualWordPOS",
    "word-3",
    "word-3POS",
    "word-2",
    "word-2POS",
    "word-1",
    "word-1POS",
    "word+1",
    "word+1POS",
    "word+2",
    "word+2POS",
    "word+3",
    "word+3POS",
    "leftNN",
    "leftVB",
    "rightNN",
    "rightVB",
];

const ACTUAL_WORD_POS_SLOT: usize = 2;
const LEFT_NOUN_SLOT: usize = 15;
const LEFT_VERB_SLOT: usize = 16;
const RIGHT_NOUN_SLOT: usize = 17;
const RIGHT_VERB_SLOT: usize = 18;

/// Free-text schema of the word-sense layout, before normalization.
pub fn wsd_schema_template() -> Result<Schema> {
    let attributes = ATTRIBUTE_NAMES
        .iter()
        .enumerate()
        .map(|(slot, name)| {
            let attribute = Attribute::text(*name);
            if slot == ACTUAL_WORD_SLOT {
                attribute.with_weight(ACTUAL_WORD_WEIGHT)
            } else {
                attribute
            }
        })
        .collect();

    Schema::new("wsd", attributes, SENSE_SLOT)
}

fn window_slots(offset: isize) -> Option<(usize, usize)> {
    match offset {
        -3 => Some((3, 4)),
        -2 => Some((5, 6)),
        -1 => Some((7, 8)),
        1 => Some((9, 10)),
        2 => Some((11, 12)),
        3 => Some((13, 14)),
        _ => None,
    }
}

/// Fills a free-text context vector slot by slot.
///
/// ```
/// use lexisense::wsd::{wsd_schema_template, ContextVectorBuilder};
///
/// let schema = wsd_schema_template().unwrap();
/// let vector = ContextVectorBuilder::new(&schema)
///     .unwrap()
///     .actual_word_with_pos("bank", "NN")
///     .left_with_pos(1, "the", "DT")
///     .right_verb("lend")
///     .build()
///     .unwrap();
/// assert_eq!(vector.weight(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct ContextVectorBuilder<'a> {
    schema: &'a Schema,
    values: Vec<Value>,
    weight: f64,
}

impl<'a> ContextVectorBuilder<'a> {
    /// Start an empty vector for a schema with the word-sense layout.
    pub fn new(schema: &'a Schema) -> Result<Self> {
        if schema.len() != ATTRIBUTE_NAMES.len() || schema.class_index() != SENSE_SLOT {
            return Err(LexisenseError::schema_mismatch(format!(
                "schema '{}' does not follow the word-sense layout",
                schema.name()
            )));
        }

        Ok(Self {
            schema,
            values: vec![Value::Missing; schema.len()],
            weight: CONTEXT_VECTOR_WEIGHT,
        })
    }

    /// Set the known sense, for training vectors.
    pub fn sense(mut self, sense: &str) -> Self {
        self.set(SENSE_SLOT, sense);
        self
    }

    /// Set the target word and its part of speech. `NONE` is kept as is.
    pub fn actual_word_with_pos(mut self, lemma: &str, pos: &str) -> Self {
        self.values[ACTUAL_WORD_SLOT] = Value::Text(lemma.to_string());
        self.values[ACTUAL_WORD_POS_SLOT] = Value::Text(pos.to_string());
        self
    }

    /// Set the token `distance` (1 to 3) positions left of the target.
    pub fn left_with_pos(self, distance: usize, lemma: &str, pos: &str) -> Self {
        self.window(-(distance as isize), lemma, pos)
    }

    /// Set the token `distance` (1 to 3) positions right of the target.
    pub fn right_with_pos(self, distance: usize, lemma: &str, pos: &str) -> Self {
        self.window(distance as isize, lemma, pos)
    }

    pub fn left_noun(mut self, lemma: &str) -> Self {
        self.set(LEFT_NOUN_SLOT, lemma);
        self
    }

    pub fn left_verb(mut self, lemma: &str) -> Self {
        self.set(LEFT_VERB_SLOT, lemma);
        self
    }

    pub fn right_noun(mut self, lemma: &str) -> Self {
        self.set(RIGHT_NOUN_SLOT, lemma);
        self
    }

    pub fn right_verb(mut self, lemma: &str) -> Self {
        self.set(RIGHT_VERB_SLOT, lemma);
        self
    }

    /// Override the instance weight.
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Finish the vector.
    pub fn build(self) -> Result<FeatureVector> {
        Ok(FeatureVector::from_values(self.schema, self.values)?.with_weight(self.weight))
    }

    fn window(mut self, offset: isize, lemma: &str, pos: &str) -> Self {
        let Some((word_slot, pos_slot)) = window_slots(offset) else {
            warn!("Ignoring context token at offset {offset}; the window spans 3 tokens");
            return self;
        };
        if lemma != NONE_TOKEN {
            self.values[word_slot] = Value::Text(lemma.to_string());
            self.values[pos_slot] = Value::Text(pos.to_string());
        }
        self
    }

    fn set(&mut self, slot: usize, lemma: &str) {
        if lemma != NONE_TOKEN {
            self.values[slot] = Value::Text(lemma.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &Value) -> Option<&str> {
        match value {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    #[test]
    fn test_schema_template() {
        let schema = wsd_schema_template().unwrap();
        assert_eq!(schema.len(), 19);
        assert_eq!(schema.class_index(), 0);
        assert_eq!(schema.class_attribute().name(), "wordSense");
        assert_eq!(schema.attribute(1).unwrap().weight(), 10.0);
        assert_eq!(schema.attribute(2).unwrap().weight(), 1.0);
        assert_eq!(schema.attribute_index("rightVB"), Some(18));
        assert!(schema.attributes().iter().all(|a| !a.is_nominal()));
    }

    #[test]
    fn test_builder_places_tokens() {
        let schema = wsd_schema_template().unwrap();
        let vector = ContextVectorBuilder::new(&schema)
            .unwrap()
            .sense("bank%finance")
            .actual_word_with_pos("bank", "NN")
            .left_with_pos(3, "go", "VB")
            .left_with_pos(1, "the", "DT")
            .right_with_pos(2, "loan", "NN")
            .left_noun("money")
            .right_verb("lend")
            .build()
            .unwrap();

        assert_eq!(vector.weight(), 2.0);
        assert_eq!(vector.slot_weight(1), 10.0);
        assert_eq!(text(vector.value(0)), Some("bank%finance"));
        assert_eq!(text(vector.value(1)), Some("bank"));
        assert_eq!(text(vector.value(2)), Some("NN"));
        assert_eq!(text(vector.value(3)), Some("go"));
        assert_eq!(text(vector.value(4)), Some("VB"));
        assert_eq!(text(vector.value(7)), Some("the"));
        assert_eq!(text(vector.value(11)), Some("loan"));
        assert_eq!(text(vector.value(15)), Some("money"));
        assert_eq!(text(vector.value(18)), Some("lend"));
        assert!(vector.value(9).is_missing());
        assert!(vector.value(16).is_missing());
    }

    #[test]
    fn test_none_leaves_slot_and_pos_missing() {
        let schema = wsd_schema_template().unwrap();
        let vector = ContextVectorBuilder::new(&schema)
            .unwrap()
            .actual_word_with_pos("NONE", "NN")
            .left_with_pos(2, "NONE", "DT")
            .right_noun("NONE")
            .left_with_pos(4, "far", "NN")
            .weight(1.0)
            .build()
            .unwrap();

        assert_eq!(text(vector.value(1)), Some("NONE"));
        assert!(vector.value(5).is_missing());
        assert!(vector.value(6).is_missing());
        assert!(vector.value(17).is_missing());
        assert_eq!(vector.weight(), 1.0);
    }

    #[test]
    fn test_builder_rejects_foreign_schema() {
        let schema = Schema::new("other", vec![Attribute::text("a")], 0).unwrap();
        assert!(ContextVectorBuilder::new(&schema).is_err());
    }
}
