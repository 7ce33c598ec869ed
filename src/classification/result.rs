//! Classification value type.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Label of the sentinel "no answer" classification.
pub const EMPTY_LABEL: &str = "NONE";

/// A class label with its score.
///
/// The score is either a probability or a log-domain score depending on how
/// it was produced; callers keep track of which.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    label: String,
    score: f64,
}

impl Classification {
    /// Create a classification.
    pub fn new<S: Into<String>>(label: S, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// The sentinel "no answer": label `NONE` with the minimum score.
    pub fn empty() -> Self {
        Self::new(EMPTY_LABEL, f64::MIN)
    }

    /// Class label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Whether this is the sentinel.
    pub fn is_empty(&self) -> bool {
        self.label == EMPTY_LABEL && self.score == f64::MIN
    }

    /// Order by score only.
    pub fn cmp_score(&self, other: &Classification) -> Ordering {
        self.score.total_cmp(&other.score)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.label, self.score)
    }
}
