//! Integration tests for parallel and incremental training.

use std::sync::Arc;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lexisense::dataset::{Attribute, Dataset, FeatureVector, Schema};
use lexisense::error::{LexisenseError, Result};
use lexisense::naive_bayes::{NaiveBayesModel, TrainingConfig};

fn values(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i}")).collect()
}

fn schema() -> Result<Arc<Schema>> {
    Ok(Arc::new(Schema::new(
        "synthetic",
        vec![
            Attribute::nominal("sense", values("s", 4)),
            Attribute::nominal("word", values("w", 30)).with_weight(10.0),
            Attribute::nominal("left", values("l", 50)),
            Attribute::nominal("right", values("r", 50)),
        ],
        0,
    )?))
}

/// Random vectors with exactly representable weights, so sums do not depend
/// on the order in which shards apply them.
fn random_vectors(schema: &Schema, count: usize, seed: u64) -> Result<Vec<FeatureVector>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let weights = [0.5, 1.0, 2.0];

    let mut vectors = Vec::with_capacity(count);
    for _ in 0..count {
        let class = rng.random_range(0..4u32);
        let symbols = [
            (rng.random_range(0..10) > 0).then_some(class),
            Some(rng.random_range(0..30u32)),
            (rng.random_range(0..4) > 0).then(|| rng.random_range(0..50u32)),
            Some((class * 12 + rng.random_range(0..3u32)) % 50),
        ];
        let weight = weights[rng.random_range(0..weights.len())];
        vectors.push(FeatureVector::from_symbols(schema, &symbols)?.with_weight(weight));
    }
    Ok(vectors)
}

fn train(vectors: Vec<FeatureVector>, threads: usize) -> Result<NaiveBayesModel> {
    let dataset = Dataset::with_vectors(schema()?, vectors)?;
    NaiveBayesModel::fit(dataset, &TrainingConfig::default().with_num_threads(threads))
}

#[test]
fn test_thread_count_does_not_change_model() -> Result<()> {
    let vectors = random_vectors(&*schema()?, 2_000, 7)?;

    let single = train(vectors.clone(), 1)?;
    let parallel = train(vectors.clone(), 8)?;
    let odd = train(vectors, 3)?;

    assert_eq!(single, parallel);
    assert_eq!(single, odd);

    Ok(())
}

#[test]
fn test_incremental_updates_match_batch_training() -> Result<()> {
    let schema = schema()?;
    let vectors = random_vectors(&schema, 500, 11)?;

    let batch = train(vectors.clone(), 4)?;

    let incremental = NaiveBayesModel::new(schema.as_ref().clone())?;
    for vector in &vectors {
        incremental.update(vector)?;
    }

    assert_eq!(incremental, batch);

    Ok(())
}

#[test]
fn test_concurrent_updates_are_not_lost() -> Result<()> {
    let schema = schema()?;
    let vectors = random_vectors(&schema, 800, 23)?;
    let expected = train(vectors.clone(), 2)?;

    let shared = Arc::new(NaiveBayesModel::new(schema.as_ref().clone())?);
    let handles: Vec<_> = vectors
        .chunks(100)
        .map(|chunk| {
            let model = Arc::clone(&shared);
            let chunk = chunk.to_vec();
            thread::spawn(move || -> Result<()> {
                for vector in &chunk {
                    model.update(vector)?;
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle.join().map_err(|_| LexisenseError::worker("update thread panicked"))??;
    }

    assert_eq!(*shared, expected);

    Ok(())
}

#[test]
fn test_reduced_shard_models_match_full_training() -> Result<()> {
    let schema = schema()?;
    let vectors = random_vectors(&schema, 900, 31)?;
    let full = train(vectors.clone(), 4)?;

    let shards = vectors
        .chunks(200)
        .map(|chunk| train(chunk.to_vec(), 2))
        .collect::<Result<Vec<_>>>()?;
    let reduced = NaiveBayesModel::reduce(shards)?;

    let query = random_vectors(&schema, 20, 99)?;
    for vector in &query {
        let expected = full.distribution(vector)?;
        let actual = reduced.distribution(vector)?;
        for (e, a) in expected.iter().zip(&actual) {
            assert!((e - a).abs() < 1e-12, "{e} != {a}");
        }
        assert_eq!(full.classify(vector)?, reduced.classify(vector)?);
    }

    Ok(())
}

#[test]
fn test_distribution_is_normalized_and_agrees_with_classify() -> Result<()> {
    let schema = schema()?;
    let model = train(random_vectors(&schema, 1_000, 5)?, 4)?;

    for vector in random_vectors(&schema, 50, 6)? {
        let distribution = model.distribution(&vector)?;
        let total: f64 = distribution.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(distribution.iter().all(|p| (0.0..=1.0).contains(p)));

        let best = model.classify(&vector)? as usize;
        let max = distribution.iter().copied().fold(f64::MIN, f64::max);
        assert_eq!(distribution[best], max);
    }

    Ok(())
}

#[test]
fn test_timeout_surfaces_as_error() -> Result<()> {
    let schema = schema()?;
    let vectors = random_vectors(&schema, 200_000, 3)?;
    let dataset = Dataset::with_vectors(Arc::clone(&schema), vectors)?;

    let mut model = NaiveBayesModel::new(schema.as_ref().clone())?;
    let config = TrainingConfig::default()
        .with_num_threads(1)
        .with_timeout(std::time::Duration::ZERO);

    let result = model.build_with_config(dataset, &config);
    assert!(matches!(result, Err(LexisenseError::TrainingTimeout(_))));
    assert_eq!(model, NaiveBayesModel::new(schema.as_ref().clone())?);

    Ok(())
}
