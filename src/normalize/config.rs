//! Configuration for normalizers.

use serde::{Deserialize, Serialize};

/// Configuration for [`StringToNominal`](super::StringToNominal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Treat punctuation and markup tokens as missing.
    pub drop_filter_words: bool,

    /// Further tokens treated as missing when filtering is enabled.
    pub extra_filter_words: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            drop_filter_words: true,
            extra_filter_words: Vec::new(),
        }
    }
}

impl NormalizerConfig {
    /// Enable or disable filter words.
    pub fn with_drop_filter_words(mut self, drop: bool) -> Self {
        self.drop_filter_words = drop;
        self
    }

    /// Add tokens to the filter list.
    pub fn with_extra_filter_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_filter_words
            .extend(words.into_iter().map(Into::into));
        self
    }
}
