//! Sparse, additively smoothed discrete probability estimator.
//!
//! An [`Estimator`] counts weighted observations of integer-coded symbols drawn
//! from a fixed, known-size symbol space. Only observed symbols are stored;
//! every other symbol implicitly holds the additive prior. This keeps memory
//! proportional to the number of distinct observations, which matters when a
//! (attribute, class) cell has thousands of possible values but only a handful
//! ever co-occur with that class.
//!
//! Each estimator guards its state with its own lock, so concurrent training
//! workers contend only when they hit the same (attribute, class) cell.

use ahash::AHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{LexisenseError, Result};

/// Integer-coded categorical value within an attribute's domain.
pub type Symbol = u32;

/// Additive prior used for Laplace smoothing.
pub const LAPLACE_PRIOR: f64 = 1.0;

#[derive(Debug, Clone, Default)]
struct Counts {
    counts: AHashMap<Symbol, f64>,
    sum: f64,
}

/// Smoothed per-symbol frequency counter.
#[derive(Debug)]
pub struct Estimator {
    num_symbols: usize,
    prior: f64,
    state: RwLock<Counts>,
}

impl Estimator {
    /// Create an estimator over `num_symbols` symbols with the given additive prior.
    ///
    /// The running sum starts at `prior * num_symbols`, the total mass of the
    /// implicit prior counts.
    pub fn new(num_symbols: usize, prior: f64) -> Self {
        Self {
            num_symbols,
            prior,
            state: RwLock::new(Counts {
                counts: AHashMap::new(),
                sum: prior * num_symbols as f64,
            }),
        }
    }

    /// Create a Laplace-smoothed estimator (prior 1).
    pub fn laplace(num_symbols: usize) -> Self {
        Self::new(num_symbols, LAPLACE_PRIOR)
    }

    /// Create an estimator without smoothing (prior 0).
    pub fn unsmoothed(num_symbols: usize) -> Self {
        Self::new(num_symbols, 0.0)
    }

    /// Add a weighted observation of `symbol`.
    ///
    /// An unseen symbol is seeded at the prior before the weight is added.
    /// The count and the sum are updated under one write lock, so concurrent
    /// calls never lose an increment.
    pub fn add_value(&self, symbol: Symbol, weight: f64) {
        let mut state = self.state.write();
        *state.counts.entry(symbol).or_insert(self.prior) += weight;
        state.sum += weight;
    }

    /// Probability estimate for `symbol`.
    ///
    /// Returns 0 for an estimator whose sum is zero (unsmoothed and never
    /// trained).
    pub fn probability(&self, symbol: Symbol) -> f64 {
        let state = self.state.read();
        if state.sum == 0.0 {
            return 0.0;
        }
        state.counts.get(&symbol).copied().unwrap_or(self.prior) / state.sum
    }

    /// Accumulated count for `symbol`, including the prior.
    pub fn count(&self, symbol: Symbol) -> f64 {
        let state = self.state.read();
        if state.sum == 0.0 {
            return 0.0;
        }
        state.counts.get(&symbol).copied().unwrap_or(self.prior)
    }

    /// Sum of all counts, including the prior mass.
    pub fn sum_of_counts(&self) -> f64 {
        self.state.read().sum
    }

    /// Size of the symbol space.
    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    /// Additive prior every unseen symbol holds.
    pub fn prior(&self) -> f64 {
        self.prior
    }

    /// Number of symbols with an explicit count.
    pub fn observed_symbols(&self) -> usize {
        self.state.read().counts.len()
    }

    /// Merge an estimator trained on a disjoint shard into this one.
    ///
    /// `other` was itself initialised with its prior, so that prior mass is
    /// subtracted once per observed symbol and once over the whole symbol space
    /// for the sum. Merging shard estimators in any order therefore reproduces
    /// training on the union of the shards.
    pub fn aggregate(&self, other: &Estimator) -> Result<()> {
        if other.num_symbols != self.num_symbols {
            return Err(LexisenseError::schema_mismatch(format!(
                "estimator to aggregate has {} symbols, expected {}",
                other.num_symbols, self.num_symbols
            )));
        }

        // Snapshot first so aggregating an estimator with itself cannot deadlock.
        let incoming = other.state.read().clone();

        let mut state = self.state.write();
        for (symbol, other_count) in incoming.counts {
            let entry = state.counts.entry(symbol).or_insert(self.prior);
            *entry = *entry + other_count - other.prior;
        }
        state.sum += incoming.sum - other.prior * other.num_symbols as f64;

        Ok(())
    }

    fn snapshot(&self) -> EstimatorSnapshot {
        let state = self.state.read();
        let mut counts: Vec<(Symbol, f64)> =
            state.counts.iter().map(|(&symbol, &count)| (symbol, count)).collect();
        counts.sort_unstable_by_key(|(symbol, _)| *symbol);

        EstimatorSnapshot {
            num_symbols: self.num_symbols,
            prior: self.prior,
            sum: state.sum,
            counts,
        }
    }
}

impl Clone for Estimator {
    fn clone(&self) -> Self {
        Self {
            num_symbols: self.num_symbols,
            prior: self.prior,
            state: RwLock::new(self.state.read().clone()),
        }
    }
}

impl PartialEq for Estimator {
    fn eq(&self, other: &Self) -> bool {
        self.snapshot() == other.snapshot()
    }
}

/// Serialized form of an estimator; counts are sorted by symbol so the
/// encoding is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct EstimatorSnapshot {
    num_symbols: usize,
    prior: f64,
    sum: f64,
    counts: Vec<(Symbol, f64)>,
}

impl From<EstimatorSnapshot> for Estimator {
    fn from(snapshot: EstimatorSnapshot) -> Self {
        Self {
            num_symbols: snapshot.num_symbols,
            prior: snapshot.prior,
            state: RwLock::new(Counts {
                counts: snapshot.counts.into_iter().collect(),
                sum: snapshot.sum,
            }),
        }
    }
}

impl Serialize for Estimator {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.snapshot().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Estimator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        EstimatorSnapshot::deserialize(deserializer).map(Estimator::from)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_fresh_laplace_estimator_is_uniform() {
        let estimator = Estimator::laplace(8);

        assert_eq!(estimator.sum_of_counts(), 8.0);
        for symbol in 0..8 {
            assert!((estimator.probability(symbol) - 1.0 / 8.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_unsmoothed_estimator_guards_zero_sum() {
        let estimator = Estimator::unsmoothed(4);

        assert_eq!(estimator.probability(0), 0.0);
        assert_eq!(estimator.count(0), 0.0);

        estimator.add_value(2, 3.0);
        assert_eq!(estimator.probability(2), 1.0);
        assert_eq!(estimator.probability(1), 0.0);
    }

    #[test]
    fn test_add_value_seeds_prior() {
        let estimator = Estimator::laplace(3);
        estimator.add_value(1, 2.0);

        assert_eq!(estimator.count(1), 3.0);
        assert_eq!(estimator.count(0), 1.0);
        assert_eq!(estimator.sum_of_counts(), 5.0);
        assert!((estimator.probability(1) - 3.0 / 5.0).abs() < EPSILON);
        assert_eq!(estimator.observed_symbols(), 1);
    }

    #[test]
    fn test_probability_grows_with_weight() {
        let mut previous = 0.0;
        for weight in [0.5, 1.0, 2.0, 10.0, 100.0] {
            let estimator = Estimator::laplace(5);
            estimator.add_value(3, 1.0);
            estimator.add_value(0, weight);
            let probability = estimator.probability(0);
            assert!(probability > previous);
            previous = probability;
        }
    }

    #[test]
    fn test_concurrent_add_value_is_exact() {
        let estimator = Arc::new(Estimator::laplace(2));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let estimator = Arc::clone(&estimator);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        estimator.add_value(0, 1.0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(estimator.count(0), 8001.0);
        assert_eq!(estimator.sum_of_counts(), 8002.0);
    }

    #[test]
    fn test_aggregate_matches_training_on_union() {
        let observations = [(0, 1.0), (2, 2.0), (2, 1.0), (4, 0.5), (1, 3.0), (0, 2.0)];

        let full = Estimator::laplace(5);
        for &(symbol, weight) in &observations {
            full.add_value(symbol, weight);
        }

        let left = Estimator::laplace(5);
        let right = Estimator::laplace(5);
        for &(symbol, weight) in &observations[..3] {
            left.add_value(symbol, weight);
        }
        for &(symbol, weight) in &observations[3..] {
            right.add_value(symbol, weight);
        }

        left.aggregate(&right).unwrap();

        assert!((left.sum_of_counts() - full.sum_of_counts()).abs() < EPSILON);
        for symbol in 0..5 {
            assert!((left.probability(symbol) - full.probability(symbol)).abs() < EPSILON);
        }
    }

    #[test]
    fn test_aggregate_rejects_different_cardinality() {
        let estimator = Estimator::laplace(3);
        estimator.add_value(0, 1.0);
        let other = Estimator::laplace(4);

        let result = estimator.aggregate(&other);
        assert!(matches!(result, Err(LexisenseError::SchemaMismatch(_))));
        assert_eq!(estimator.sum_of_counts(), 4.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let estimator = Estimator::laplace(6);
        estimator.add_value(5, 2.5);
        estimator.add_value(1, 1.0);

        let json = serde_json::to_string(&estimator).unwrap();
        let restored: Estimator = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, estimator);
        assert_eq!(restored.probability(5), estimator.probability(5));
    }
}
