//! Attribute schema shared by vectors, datasets and models.

use serde::{Deserialize, Serialize};

use crate::dataset::attribute::Attribute;
use crate::error::{LexisenseError, Result};
use crate::estimator::Symbol;

/// Ordered attribute slots plus the position of the class slot.
///
/// A schema is immutable once constructed; models keep their own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaParts")]
pub struct Schema {
    name: String,
    attributes: Vec<Attribute>,
    class_index: usize,
}

#[derive(Deserialize)]
struct SchemaParts {
    name: String,
    attributes: Vec<Attribute>,
    class_index: usize,
}

impl TryFrom<SchemaParts> for Schema {
    type Error = LexisenseError;

    fn try_from(parts: SchemaParts) -> Result<Self> {
        Schema::new(parts.name, parts.attributes, parts.class_index)
    }
}

impl Schema {
    /// Create a schema. Attribute names must be unique and `class_index` must
    /// point at one of the attributes.
    pub fn new<S: Into<String>>(
        name: S,
        attributes: Vec<Attribute>,
        class_index: usize,
    ) -> Result<Self> {
        if class_index >= attributes.len() {
            return Err(LexisenseError::invalid_argument(format!(
                "class index {class_index} out of range for {} attributes",
                attributes.len()
            )));
        }

        for (i, attribute) in attributes.iter().enumerate() {
            if attributes[..i].iter().any(|a| a.name() == attribute.name()) {
                return Err(LexisenseError::invalid_argument(format!(
                    "duplicate attribute name '{}'",
                    attribute.name()
                )));
            }
        }

        Ok(Self {
            name: name.into(),
            attributes,
            class_index,
        })
    }

    /// Relation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of attribute slots, class slot included.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the schema has no slots. Never true for a constructed schema.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// All attributes in slot order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Attribute at `slot`.
    pub fn attribute(&self, slot: usize) -> Option<&Attribute> {
        self.attributes.get(slot)
    }

    /// Slot of the attribute called `name`.
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name() == name)
    }

    /// Slot holding the class label.
    pub fn class_index(&self) -> usize {
        self.class_index
    }

    /// The class attribute.
    pub fn class_attribute(&self) -> &Attribute {
        &self.attributes[self.class_index]
    }

    /// Number of classes, 0 while the class attribute is still free text.
    pub fn num_classes(&self) -> usize {
        self.class_attribute().num_values().unwrap_or(0)
    }

    /// Label of class `class`.
    pub fn class_label(&self, class: Symbol) -> Option<&str> {
        self.class_attribute().value(class)
    }

    /// Number of non-class slots.
    pub fn num_features(&self) -> usize {
        self.attributes.len() - 1
    }

    /// Iterate the non-class slots as `(row, slot, attribute)`, where `row` is
    /// the position of the slot once the class slot is skipped.
    pub fn feature_slots(&self) -> impl Iterator<Item = (usize, usize, &Attribute)> {
        let class_index = self.class_index;
        self.attributes
            .iter()
            .enumerate()
            .filter(move |(slot, _)| *slot != class_index)
            .enumerate()
            .map(|(row, (slot, attribute))| (row, slot, attribute))
    }

    /// Cardinality of every slot (0 for text attributes), in slot order.
    pub fn cardinalities(&self) -> Vec<usize> {
        self.attributes
            .iter()
            .map(|a| a.num_values().unwrap_or(0))
            .collect()
    }

    /// Fail unless every slot, class included, is nominal.
    pub fn ensure_categorical(&self) -> Result<()> {
        match self.attributes.iter().find(|a| !a.is_nominal()) {
            Some(attribute) => Err(LexisenseError::unsupported_feature(format!(
                "attribute '{}' is not nominal",
                attribute.name()
            ))),
            None => Ok(()),
        }
    }

    /// Fail unless `other` has the same slot count, class slot and
    /// cardinalities as this schema.
    pub fn ensure_compatible(&self, other: &Schema) -> Result<()> {
        if self.class_index != other.class_index {
            return Err(LexisenseError::schema_mismatch(format!(
                "class slot {} vs {}",
                self.class_index, other.class_index
            )));
        }

        let ours = self.cardinalities();
        let theirs = other.cardinalities();
        if ours != theirs {
            return Err(LexisenseError::schema_mismatch(format!(
                "attribute cardinalities {ours:?} vs {theirs:?}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn schema() -> Schema {
        Schema::new(
            "toy",
            vec![
                Attribute::nominal("color", values(&["red", "green"])),
                Attribute::nominal("sense", values(&["a", "b", "c"])),
                Attribute::nominal("size", values(&["s", "m", "l", "xl"])),
            ],
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_class_attribute() {
        let schema = schema();

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.num_classes(), 3);
        assert_eq!(schema.class_label(2), Some("c"));
        assert_eq!(schema.num_features(), 2);
        assert_eq!(schema.attribute_index("size"), Some(2));
    }

    #[test]
    fn test_feature_slots_skip_class() {
        let schema = schema();
        let slots: Vec<(usize, usize)> = schema
            .feature_slots()
            .map(|(row, slot, _)| (row, slot))
            .collect();

        assert_eq!(slots, vec![(0, 0), (1, 2)]);
    }

    #[test]
    fn test_invalid_schemas() {
        let result = Schema::new("empty", vec![], 0);
        assert!(result.is_err());

        let result = Schema::new(
            "dup",
            vec![Attribute::text("a"), Attribute::text("a")],
            0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_ensure_categorical() {
        assert!(schema().ensure_categorical().is_ok());

        let text = Schema::new(
            "text",
            vec![Attribute::nominal("sense", values(&["a"])), Attribute::text("word")],
            0,
        )
        .unwrap();
        assert!(matches!(
            text.ensure_categorical(),
            Err(LexisenseError::UnsupportedFeatureType(_))
        ));
    }

    #[test]
    fn test_ensure_compatible() {
        let schema = schema();
        assert!(schema.ensure_compatible(&schema.clone()).is_ok());

        let other = Schema::new(
            "toy",
            vec![
                Attribute::nominal("color", values(&["red", "green", "blue"])),
                Attribute::nominal("sense", values(&["a", "b", "c"])),
                Attribute::nominal("size", values(&["s", "m", "l", "xl"])),
            ],
            1,
        )
        .unwrap();
        assert!(matches!(
            schema.ensure_compatible(&other),
            Err(LexisenseError::SchemaMismatch(_))
        ));
    }
}
