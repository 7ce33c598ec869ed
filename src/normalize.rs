//! Conversion of free-text vectors into categorical ones.

mod config;
mod normalizer;
mod string_to_nominal;

pub use config::NormalizerConfig;
pub use normalizer::Normalizer;
pub use string_to_nominal::{FILTER_WORDS, StringToNominal, is_filter_word};
