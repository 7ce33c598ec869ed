//! Configuration for the classification engine.

use serde::{Deserialize, Serialize};

use crate::wsd;

/// Which per-class scores the engine ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDomain {
    /// Normalized class probabilities.
    Probability,
    /// Unnormalized log posterior scores (always negative).
    LogPosterior,
}

/// Configuration for [`ClassificationEngine`](super::ClassificationEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Slot whose weight is replaced by `emphasis_weight` before scoring.
    pub emphasis_slot: Option<usize>,

    /// Weight given to the emphasized slot.
    pub emphasis_weight: f64,

    /// Scores used for ranking.
    pub score_domain: ScoreDomain,

    /// Similarity threshold for lemma re-ranking. A log-domain candidate
    /// qualifies when `top / candidate >= threshold`, a probability-domain
    /// candidate when `top - candidate <= 1 - threshold`.
    pub similarity_threshold: f64,

    /// Number of ranked candidates considered by lemma re-ranking.
    pub lemma_candidates: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            emphasis_slot: Some(wsd::ACTUAL_WORD_SLOT),
            emphasis_weight: wsd::ACTUAL_WORD_WEIGHT,
            score_domain: ScoreDomain::Probability,
            similarity_threshold: 0.75,
            lemma_candidates: 3,
        }
    }
}

impl EngineConfig {
    /// Set the emphasized slot, or disable emphasis with `None`.
    pub fn with_emphasis_slot(mut self, slot: Option<usize>) -> Self {
        self.emphasis_slot = slot;
        self
    }

    /// Set the emphasis weight.
    pub fn with_emphasis_weight(mut self, weight: f64) -> Self {
        self.emphasis_weight = weight;
        self
    }

    /// Set the score domain.
    pub fn with_score_domain(mut self, domain: ScoreDomain) -> Self {
        self.score_domain = domain;
        self
    }

    /// Set the similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the number of lemma candidates.
    pub fn with_lemma_candidates(mut self, candidates: usize) -> Self {
        self.lemma_candidates = candidates;
        self
    }
}
