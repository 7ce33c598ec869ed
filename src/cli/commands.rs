//! Command implementations for the lexisense CLI.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::classification::{Classification, ClassificationEngine, EngineConfig, ScoreDomain};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::cli::records::{ModelArtifact, read_records};
use crate::dataset::{Dataset, Schema};
use crate::naive_bayes::{NaiveBayesModel, TrainingConfig};
use crate::normalize::{NormalizerConfig, StringToNominal};
use crate::persistence::{ModelCodec, load_model_detect, save_model};
use crate::wsd::wsd_schema_template;

/// Execute a CLI command.
pub fn execute_command(args: LexisenseArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train_model(train_args.clone(), &args),
        Command::Classify(classify_args) => classify_records(classify_args.clone(), &args),
        Command::Inspect(inspect_args) => inspect_model(inspect_args.clone(), &args),
    }
}

/// Train a model and write it to disk.
fn train_model(args: TrainArgs, cli_args: &LexisenseArgs) -> Result<()> {
    let start_time = Instant::now();
    info!("Reading training records from {}", args.data.display());

    let records = read_records(&args.data)?;
    let template = Arc::new(wsd_schema_template()?);
    let mut dataset = Dataset::new(Arc::clone(&template));
    for (index, record) in records.iter().enumerate() {
        let vector = record
            .to_vector(&template)
            .with_context(|| format!("record {} of {}", index + 1, args.data.display()))?;
        dataset.push(vector)?;
    }

    let normalizer_config = NormalizerConfig::default().with_drop_filter_words(!args.keep_filter_words);
    let (normalizer, dataset) = StringToNominal::fit_transform(dataset, &normalizer_config)?;

    let mut training_config = match &args.config {
        Some(path) => TrainingConfig::from_json_file(path)
            .with_context(|| format!("cannot load training config {}", path.display()))?,
        None => TrainingConfig::default(),
    };
    if let Some(threads) = args.threads {
        training_config = training_config.with_num_threads(threads);
    }
    if let Some(secs) = args.timeout_secs {
        training_config = training_config.with_timeout(Duration::from_secs(secs));
    }

    let mut model = NaiveBayesModel::new(normalizer.schema().as_ref().clone())?;
    let summary = model.build_with_config(dataset, &training_config)?;
    if summary.vectors_trained == 0 {
        warn!("No labelled records in {}", args.data.display());
    }

    let classes = model.schema().num_classes();
    let artifact = ModelArtifact {
        model,
        normalizer: normalizer_config,
    };
    save_model(&args.output, &artifact, &args.codec)
        .with_context(|| format!("cannot write model to {}", args.output.display()))?;

    output_result(
        "Model trained successfully",
        &TrainingResult {
            output: args.output.to_string_lossy().to_string(),
            codec: args.codec.name().to_string(),
            records: records.len(),
            vectors_trained: summary.vectors_trained,
            vectors_dropped: summary.vectors_dropped,
            classes,
            shards: summary.shards,
            workers: summary.workers,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Classify every record of a file.
fn classify_records(args: ClassifyArgs, cli_args: &LexisenseArgs) -> Result<()> {
    let start_time = Instant::now();
    let (engine, schema) = load_engine(&args)?;
    let records = read_records(&args.input)?;

    let mut results = Vec::with_capacity(records.len());
    let (mut labelled, mut correct) = (0, 0);

    for (index, record) in records.iter().enumerate() {
        let vector = record
            .to_vector(&schema)
            .with_context(|| format!("record {} of {}", index + 1, args.input.display()))?;

        let lemma = record.lemma(&schema).filter(|_| args.disambiguate);
        let depth = match lemma {
            Some(_) => args.top.max(engine.config().lemma_candidates),
            None => args.top,
        };
        let mut candidates = engine.classify_top(&vector, depth);
        let answer = match lemma {
            Some(lemma) => engine.choose_by_lemma(&candidates, lemma),
            None => candidates
                .first()
                .cloned()
                .unwrap_or_else(Classification::empty),
        };
        candidates.truncate(args.top);

        if let Some(expected) = &record.label {
            labelled += 1;
            if expected == answer.label() {
                correct += 1;
            }
        }

        results.push(RecordClassification {
            line: index + 1,
            expected: record.label.clone(),
            answer,
            candidates: candidates
                .into_iter()
                .filter(|c| !c.is_empty() && c.score().is_finite())
                .collect(),
        });
    }

    output_result(
        "Classification finished",
        &ClassificationReport {
            total: results.len(),
            results,
            labelled,
            correct,
            accuracy: (labelled > 0).then(|| correct as f64 / labelled as f64),
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Summarize a stored model.
fn inspect_model(args: InspectArgs, cli_args: &LexisenseArgs) -> Result<()> {
    let artifact: ModelArtifact = load_model_detect(&args.model)
        .with_context(|| format!("cannot read model {}", args.model.display()))?;
    let model = &artifact.model;
    let schema = model.schema();

    let classes = schema
        .class_attribute()
        .values()
        .iter()
        .enumerate()
        .map(|(class, label)| ClassSummary {
            label: label.clone(),
            prior: model.class_prior(class as u32),
        })
        .collect();
    let attributes = schema
        .attributes()
        .iter()
        .map(|attribute| AttributeSummary {
            name: attribute.name().to_string(),
            values: attribute.num_values().unwrap_or(0),
            weight: attribute.weight(),
        })
        .collect();

    output_result(
        &format!("Model {}", args.model.display()),
        &ModelSummary {
            schema: schema.name().to_string(),
            class_attribute: schema.class_attribute().name().to_string(),
            total_weight: model.class_weight_total(),
            drop_filter_words: artifact.normalizer.drop_filter_words,
            classes,
            attributes,
        },
        cli_args,
    )
}

fn load_engine(args: &ClassifyArgs) -> Result<(ClassificationEngine, Arc<Schema>)> {
    let artifact: ModelArtifact = load_model_detect(&args.model)
        .with_context(|| format!("cannot read model {}", args.model.display()))?;

    let schema = artifact.model.schema_handle();
    let normalizer = StringToNominal::from_schema(Arc::clone(&schema), &artifact.normalizer)?;
    let score_domain = if args.log_scores {
        ScoreDomain::LogPosterior
    } else {
        ScoreDomain::Probability
    };
    let config = EngineConfig::default().with_score_domain(score_domain);

    let engine = ClassificationEngine::new(Arc::new(artifact.model), config)
        .with_normalizer(Arc::new(normalizer));
    Ok((engine, schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::load_model;
    use crate::persistence::{BincodeCodec, JsonCodec};
    use clap::Parser;
    use std::path::Path;
    use tempfile::TempDir;

    const TRAINING_RECORDS: &str = r#"
{"label": "bank%finance", "values": {"actualWord": "bank", "actualWordPOS": "NN", "word-1": "the", "rightVB": "lend"}}
{"label": "bank%finance", "values": {"actualWord": "bank", "actualWordPOS": "NN", "word+1": "loan", "rightVB": "lend"}}
{"label": "bank%river", "values": {"actualWord": "bank", "actualWordPOS": "NN", "word+1": ",", "leftNN": "river"}}
{"values": {"actualWord": "bank", "actualWordPOS": "NN"}}
"#;

    fn write_records(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("train.jsonl");
        std::fs::write(&path, TRAINING_RECORDS.trim_start()).unwrap();
        path
    }

    fn run(argv: &[&str]) -> Result<()> {
        execute_command(LexisenseArgs::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_train_writes_loadable_model() {
        let temp_dir = TempDir::new().unwrap();
        let data = write_records(temp_dir.path());
        let output = temp_dir.path().join("senses.model");

        run(&[
            "lexisense",
            "-q",
            "train",
            "--data",
            data.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--threads",
            "2",
        ])
        .unwrap();

        let artifact: ModelArtifact = load_model(&output, &BincodeCodec).unwrap();
        let schema = artifact.model.schema();
        assert_eq!(schema.class_attribute().values(), ["bank%finance", "bank%river"]);
        assert!(artifact.normalizer.drop_filter_words);
        // "," is a filter word, "loan" is not
        assert_eq!(schema.attribute(9).unwrap().values(), ["loan"]);
        // 2 prior + 3 labelled records of weight 2
        assert_eq!(artifact.model.class_weight_total(), 8.0);
    }

    #[test]
    fn test_train_json_keeps_filter_words() {
        let temp_dir = TempDir::new().unwrap();
        let data = write_records(temp_dir.path());
        let output = temp_dir.path().join("senses.json");

        run(&[
            "lexisense",
            "-q",
            "train",
            "-d",
            data.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--codec",
            "json",
            "--keep-filter-words",
        ])
        .unwrap();

        let artifact: ModelArtifact = load_model(&output, &JsonCodec::default()).unwrap();
        assert!(!artifact.normalizer.drop_filter_words);
        assert_eq!(artifact.model.schema().attribute(9).unwrap().values(), ["loan", ","]);
    }

    #[test]
    fn test_classify_and_inspect() {
        let temp_dir = TempDir::new().unwrap();
        let data = write_records(temp_dir.path());
        let model = temp_dir.path().join("senses.model");
        let model = model.to_str().unwrap();

        run(&["lexisense", "-q", "train", "-d", data.to_str().unwrap(), "-o", model]).unwrap();
        run(&[
            "lexisense",
            "-q",
            "--format",
            "json",
            "classify",
            "-m",
            model,
            "-i",
            data.to_str().unwrap(),
            "--disambiguate",
        ])
        .unwrap();
        run(&["lexisense", "-q", "inspect", "-m", model]).unwrap();
    }

    #[test]
    fn test_classify_disambiguates_below_lemma_depth() {
        let temp_dir = TempDir::new().unwrap();
        let data = write_records(temp_dir.path());
        let model = temp_dir.path().join("senses.model");
        let model = model.to_str().unwrap();

        run(&["lexisense", "-q", "train", "-d", data.to_str().unwrap(), "-o", model]).unwrap();
        run(&[
            "lexisense",
            "-q",
            "classify",
            "-m",
            model,
            "-i",
            data.to_str().unwrap(),
            "--top",
            "1",
            "--disambiguate",
        ])
        .unwrap();
    }

    #[test]
    fn test_classify_missing_model_fails() {
        let temp_dir = TempDir::new().unwrap();
        let data = write_records(temp_dir.path());
        let missing = temp_dir.path().join("absent.model");

        let result = run(&[
            "lexisense",
            "-q",
            "classify",
            "-m",
            missing.to_str().unwrap(),
            "-i",
            data.to_str().unwrap(),
        ]);
        assert!(result.is_err());
    }
}
