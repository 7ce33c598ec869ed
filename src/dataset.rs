//! Schema and feature-vector types consumed by the classifier.
//!
//! A [`Schema`] fixes the ordered attribute slots of every vector, which slot
//! holds the class label, and the enumerated values of each nominal attribute.
//! [`FeatureVector`]s are positional: slot `i` of a vector is described by
//! attribute `i` of the schema it was built for.

mod attribute;
mod instances;
mod schema;
mod vector;

pub use attribute::{Attribute, AttributeKind};
pub use instances::Dataset;
pub use schema::Schema;
pub use vector::{FeatureVector, Value};
