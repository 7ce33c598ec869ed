//! Fork-join execution of training shards.

use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use log::{debug, error, info};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::dataset::{FeatureVector, Schema};
use crate::error::{LexisenseError, Result};
use crate::naive_bayes::config::TrainingConfig;
use crate::naive_bayes::grid::EstimatorGrid;

/// Outcome of a training run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Vectors applied to the estimators.
    pub vectors_trained: usize,
    /// Vectors dropped because their class was missing.
    pub vectors_dropped: usize,
    /// Number of shards dispatched.
    pub shards: usize,
    /// Size of the worker pool.
    pub workers: usize,
    /// Wall-clock training time.
    pub elapsed: Duration,
}

/// Report sent by a shard once all of its updates are applied.
struct ShardReport {
    shard_id: usize,
    vectors: usize,
    elapsed: Duration,
}

/// Applies contiguous shards of a training set to a shared estimator grid on
/// a bounded worker pool.
pub struct ShardTrainer {
    thread_pool: ThreadPool,
    timeout: Duration,
}

impl std::fmt::Debug for ShardTrainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardTrainer")
            .field("workers", &self.thread_pool.current_num_threads())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ShardTrainer {
    /// Create a trainer with a dedicated worker pool.
    pub fn new(config: &TrainingConfig) -> Result<Self> {
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_count())
            .thread_name(|i| format!("lexisense-train-{i}"))
            .panic_handler(|_| error!("training shard panicked"))
            .build()
            .map_err(|e| LexisenseError::worker(format!("Failed to create thread pool: {e}")))?;

        Ok(Self {
            thread_pool,
            timeout: config.timeout,
        })
    }

    /// Number of workers in the pool.
    pub fn workers(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Contiguous shard ranges: one per worker, `ceil(total / workers)` long.
    pub fn shard_ranges(total: usize, workers: usize) -> Vec<Range<usize>> {
        if total == 0 {
            return Vec::new();
        }
        let shard_size = total.div_ceil(workers.max(1));
        (0..total)
            .step_by(shard_size)
            .map(|start| start..(start + shard_size).min(total))
            .collect()
    }

    /// Train `grid` on `vectors` and hand it back once every shard reported.
    ///
    /// The vectors must be validated against `schema` beforehand. On timeout
    /// the grid is abandoned to the still-running shards and never returned.
    pub(crate) fn train(
        &self,
        schema: Arc<Schema>,
        grid: EstimatorGrid,
        vectors: Vec<FeatureVector>,
    ) -> Result<(EstimatorGrid, TrainingSummary)> {
        let start_time = Instant::now();
        let ranges = Self::shard_ranges(vectors.len(), self.workers());
        let total_vectors = vectors.len();

        info!(
            "Training on {} vectors in {} shards across {} workers",
            total_vectors,
            ranges.len(),
            self.workers()
        );

        let grid = Arc::new(grid);
        let vectors = Arc::new(vectors);
        let (tx, rx) = crossbeam_channel::unbounded::<ShardReport>();

        for (shard_id, range) in ranges.iter().cloned().enumerate() {
            let tx = tx.clone();
            let grid = Arc::clone(&grid);
            let vectors = Arc::clone(&vectors);
            let schema = Arc::clone(&schema);

            self.thread_pool.spawn(move || {
                let shard_start = Instant::now();
                for vector in &vectors[range.clone()] {
                    grid.apply(&schema, vector);
                }
                let report = ShardReport {
                    shard_id,
                    vectors: range.len(),
                    elapsed: shard_start.elapsed(),
                };
                // Release the shared grid before reporting so the joiner can
                // reclaim it as soon as the last report arrives.
                drop(grid);
                drop(vectors);
                let _ = tx.send(report);
            });
        }

        // Drop the original sender so a lost shard surfaces as a disconnect
        drop(tx);

        let deadline = start_time + self.timeout;
        for _ in 0..ranges.len() {
            match rx.recv_deadline(deadline) {
                Ok(report) => debug!(
                    "Shard {} applied {} vectors in {:?}",
                    report.shard_id, report.vectors, report.elapsed
                ),
                Err(RecvTimeoutError::Timeout) => {
                    error!("Training did not finish within {:?}", self.timeout);
                    return Err(LexisenseError::TrainingTimeout(self.timeout));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(LexisenseError::worker(
                        "training shard terminated before reporting",
                    ));
                }
            }
        }

        // Training vectors are no longer needed; only estimator state is kept.
        drop(vectors);

        let grid = Arc::try_unwrap(grid)
            .map_err(|_| LexisenseError::internal("estimator grid still shared after training"))?;

        let summary = TrainingSummary {
            vectors_trained: total_vectors,
            vectors_dropped: 0,
            shards: ranges.len(),
            workers: self.workers(),
            elapsed: start_time.elapsed(),
        };
        info!(
            "Training completed: {} vectors in {:?}",
            summary.vectors_trained, summary.elapsed
        );

        Ok((grid, summary))
    }
}
