//! Top-K ranking and lemma re-ranking over a trained classifier.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

use crate::classification::config::{EngineConfig, ScoreDomain};
use crate::classification::result::Classification;
use crate::dataset::FeatureVector;
use crate::error::{LexisenseError, Result};
use crate::naive_bayes::Classifier;
use crate::normalize::Normalizer;

/// Ranks the classes of a trained classifier for incoming feature vectors.
///
/// Vectors that still carry raw text are first passed through the attached
/// [`Normalizer`]. Every query works on its own copy of the vector, so the
/// engine can be shared between threads.
pub struct ClassificationEngine {
    classifier: Arc<dyn Classifier>,
    normalizer: Option<Arc<dyn Normalizer>>,
    config: EngineConfig,
}

impl fmt::Debug for ClassificationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationEngine")
            .field("classifier", &self.classifier.name())
            .field("normalizer", &self.normalizer.as_ref().map(|n| n.name()))
            .field("config", &self.config)
            .finish()
    }
}

impl ClassificationEngine {
    /// Create an engine around a trained classifier.
    pub fn new(classifier: Arc<dyn Classifier>, config: EngineConfig) -> Self {
        Self {
            classifier,
            normalizer: None,
            config,
        }
    }

    /// Attach the normalizer used for vectors that still carry text.
    pub fn with_normalizer(mut self, normalizer: Arc<dyn Normalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying classifier.
    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }

    /// The `k` best classes in non-increasing score order.
    ///
    /// Always returns exactly `k` entries: missing ranks are padded with
    /// [`Classification::empty`], and a vector that cannot be normalized or
    /// scored yields `k` sentinels.
    pub fn classify_top(&self, vector: &FeatureVector, k: usize) -> Vec<Classification> {
        match self.rank(vector, k) {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!("Unable to classify vector: {e}");
                vec![Classification::empty(); k]
            }
        }
    }

    /// The single best class with its probability, or the sentinel.
    pub fn classify(&self, vector: &FeatureVector) -> Classification {
        let best = self.prepare(vector).and_then(|prepared| {
            let class = self.classifier.classify(&prepared)?;
            let label = self.label_of(class as usize)?;
            let score = self
                .classifier
                .distribution(&prepared)
                .ok()
                .and_then(|distribution| distribution.get(class as usize).copied())
                .unwrap_or(f64::MIN);
            Ok(Classification::new(label, score))
        });

        match best {
            Ok(classification) => classification,
            Err(e) => {
                warn!("Unable to classify vector: {e}");
                Classification::empty()
            }
        }
    }

    /// Best class, preferring a close runner-up whose label contains `lemma`.
    pub fn classify_with_lemma(&self, vector: &FeatureVector, lemma: &str) -> Classification {
        let candidates = self.classify_top(vector, self.config.lemma_candidates.max(1));
        self.choose_by_lemma(&candidates, lemma)
    }

    /// Lemma re-ranking over candidates already produced by
    /// [`classify_top`](Self::classify_top). Only the first
    /// `lemma_candidates` entries take part.
    pub fn choose_by_lemma(&self, candidates: &[Classification], lemma: &str) -> Classification {
        let window = &candidates[..candidates.len().min(self.config.lemma_candidates.max(1))];
        let choice = select_by_lemma(window, lemma, self.config.similarity_threshold);

        debug!(
            "{} -> {} among [{}]",
            lemma,
            choice,
            window
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        choice
    }

    fn rank(&self, vector: &FeatureVector, k: usize) -> Result<Vec<Classification>> {
        let prepared = self.prepare(vector)?;
        let scores = match self.config.score_domain {
            ScoreDomain::Probability => self.classifier.distribution(&prepared)?,
            ScoreDomain::LogPosterior => self.classifier.log_posterior(&prepared)?,
        };

        let mut order: Vec<usize> = (0..scores.len())
            .filter(|&class| !scores[class].is_nan())
            .collect();
        // Stable, so tied classes keep index order
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let mut ranked = Vec::with_capacity(k);
        for class in order.into_iter().take(k) {
            ranked.push(Classification::new(self.label_of(class)?, scores[class]));
        }
        ranked.resize(k, Classification::empty());
        Ok(ranked)
    }

    fn prepare(&self, vector: &FeatureVector) -> Result<FeatureVector> {
        let mut prepared = if vector.is_categorical() {
            vector.clone()
        } else {
            match &self.normalizer {
                Some(normalizer) => normalizer.normalize(vector)?,
                None => {
                    return Err(LexisenseError::normalization(
                        "vector carries text but no normalizer is attached",
                    ));
                }
            }
        };

        if let Some(slot) = self.config.emphasis_slot
            && slot < prepared.len()
        {
            prepared.set_slot_weight(slot, self.config.emphasis_weight)?;
        }
        Ok(prepared)
    }

    fn label_of(&self, class: usize) -> Result<&str> {
        self.classifier
            .schema()
            .class_label(class as u32)
            .ok_or_else(|| LexisenseError::internal(format!("class {class} has no label")))
    }
}

/// Pick the answer from ranked candidates given the target lemma.
///
/// Candidates are scanned from the third rank back to the second; the last
/// one whose label contains `lemma` (case-insensitively) and whose score is
/// similar to the leader wins. Otherwise the leader is kept.
pub(crate) fn select_by_lemma(
    candidates: &[Classification],
    lemma: &str,
    threshold: f64,
) -> Classification {
    let Some(top) = candidates.first() else {
        return Classification::empty();
    };

    let lemma = lemma.to_lowercase();
    let mut choice = top;
    for candidate in candidates.iter().skip(1).rev() {
        if candidate.is_empty() {
            continue;
        }
        if candidate.label().to_lowercase().contains(&lemma)
            && is_similar(top.score(), candidate.score(), threshold)
        {
            choice = candidate;
        }
    }
    choice.clone()
}

/// Whether `other` scores close enough to `top`.
///
/// Negative scores are log-domain and compared by ratio; anything else is a
/// probability and compared by difference.
pub(crate) fn is_similar(top: f64, other: f64, threshold: f64) -> bool {
    if other < 0.0 {
        top / other >= threshold
    } else {
        top - other <= 1.0 - threshold
    }
}
