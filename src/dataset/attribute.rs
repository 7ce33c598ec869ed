//! Attribute descriptors.

use serde::{Deserialize, Serialize};

use crate::estimator::Symbol;

/// Value domain of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Fixed enumerated domain; a symbol is an index into `values`.
    Nominal { values: Vec<String> },
    /// Free text that must be normalized before it reaches a model.
    Text,
}

/// A named attribute slot with a default weight multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    kind: AttributeKind,
    weight: f64,
}

impl Attribute {
    /// Create a nominal attribute over the given values.
    pub fn nominal<S: Into<String>>(name: S, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal { values },
            weight: 1.0,
        }
    }

    /// Create a free-text attribute.
    pub fn text<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Text,
            weight: 1.0,
        }
    }

    /// Set the default weight multiplier for this slot.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value domain.
    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    /// Default weight multiplier.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Whether the attribute has an enumerated domain.
    pub fn is_nominal(&self) -> bool {
        matches!(self.kind, AttributeKind::Nominal { .. })
    }

    /// Enumerated values, empty for text attributes.
    pub fn values(&self) -> &[String] {
        match &self.kind {
            AttributeKind::Nominal { values } => values,
            AttributeKind::Text => &[],
        }
    }

    /// Number of enumerated values, `None` for text attributes.
    pub fn num_values(&self) -> Option<usize> {
        match &self.kind {
            AttributeKind::Nominal { values } => Some(values.len()),
            AttributeKind::Text => None,
        }
    }

    /// Name of the value coded by `symbol`.
    pub fn value(&self, symbol: Symbol) -> Option<&str> {
        self.values().get(symbol as usize).map(String::as_str)
    }

    /// Symbol coding `value`, if it is part of the domain.
    pub fn index_of(&self, value: &str) -> Option<Symbol> {
        self.values()
            .iter()
            .position(|v| v == value)
            .map(|position| position as Symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_attribute() {
        let attribute = Attribute::nominal("pos", vec!["NN".to_string(), "VB".to_string()]);

        assert!(attribute.is_nominal());
        assert_eq!(attribute.num_values(), Some(2));
        assert_eq!(attribute.value(1), Some("VB"));
        assert_eq!(attribute.value(2), None);
        assert_eq!(attribute.index_of("NN"), Some(0));
        assert_eq!(attribute.index_of("JJ"), None);
        assert_eq!(attribute.weight(), 1.0);
    }

    #[test]
    fn test_text_attribute() {
        let attribute = Attribute::text("actualWord").with_weight(10.0);

        assert!(!attribute.is_nominal());
        assert_eq!(attribute.num_values(), None);
        assert!(attribute.values().is_empty());
        assert_eq!(attribute.weight(), 10.0);
    }
}
