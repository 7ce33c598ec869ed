//! Command line argument parsing for the lexisense CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::persistence::ModelFormat;

/// Lexisense - word-sense classification with a parallel Naive-Bayes model
#[derive(Parser, Debug, Clone)]
#[command(name = "lexisense")]
#[command(about = "Train and query word-sense classifiers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LexisenseArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LexisenseArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model from labelled context records
    Train(TrainArgs),

    /// Classify context records with a trained model
    Classify(ClassifyArgs),

    /// Show the schema and class priors of a model
    Inspect(InspectArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Training records (JSON lines)
    #[arg(short, long, value_name = "RECORDS")]
    pub data: PathBuf,

    /// Where to write the model
    #[arg(short, long, value_name = "MODEL")]
    pub output: PathBuf,

    /// Training configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Number of training threads (default: one per CPU)
    #[arg(short, long, env = "LEXISENSE_THREADS")]
    pub threads: Option<usize>,

    /// Abort training after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Model encoding
    #[arg(long, default_value = "bincode")]
    pub codec: ModelFormat,

    /// Keep punctuation and markup tokens as feature values
    #[arg(long)]
    pub keep_filter_words: bool,
}

/// Arguments for classification
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Trained model
    #[arg(short, long, value_name = "MODEL")]
    pub model: PathBuf,

    /// Records to classify (JSON lines)
    #[arg(short, long, value_name = "RECORDS")]
    pub input: PathBuf,

    /// Number of ranked senses per record
    #[arg(short = 'k', long, default_value = "3")]
    pub top: usize,

    /// Re-rank close candidates that contain the record's lemma
    #[arg(long)]
    pub disambiguate: bool,

    /// Rank by log posterior instead of probability
    #[arg(long)]
    pub log_scores: bool,
}

/// Arguments for model inspection
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Trained model
    #[arg(short, long, value_name = "MODEL")]
    pub model: PathBuf,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_train_command() {
        let args = LexisenseArgs::try_parse_from([
            "lexisense",
            "train",
            "--data",
            "senses.jsonl",
            "--output",
            "senses.model",
            "--threads",
            "4",
            "--codec",
            "json",
            "--keep-filter-words",
        ])
        .unwrap();

        if let Command::Train(train_args) = args.command {
            assert_eq!(train_args.data, PathBuf::from("senses.jsonl"));
            assert_eq!(train_args.output, PathBuf::from("senses.model"));
            assert_eq!(train_args.threads, Some(4));
            assert_eq!(train_args.codec, ModelFormat::Json);
            assert!(train_args.keep_filter_words);
            assert_eq!(train_args.timeout_secs, None);
        } else {
            panic!("Expected Train command");
        }
    }

    #[test]
    fn test_classify_command() {
        let args = LexisenseArgs::try_parse_from([
            "lexisense",
            "classify",
            "--model",
            "senses.model",
            "--input",
            "queries.jsonl",
            "-k",
            "5",
            "--disambiguate",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.output_format, OutputFormat::Json);
        if let Command::Classify(classify_args) = args.command {
            assert_eq!(classify_args.top, 5);
            assert!(classify_args.disambiguate);
            assert!(!classify_args.log_scores);
        } else {
            panic!("Expected Classify command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let args = LexisenseArgs::try_parse_from(["lexisense", "inspect", "-m", "m"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args =
            LexisenseArgs::try_parse_from(["lexisense", "-vvv", "inspect", "-m", "m"]).unwrap();
        assert_eq!(args.verbosity(), 3);

        let args =
            LexisenseArgs::try_parse_from(["lexisense", "-v", "-q", "inspect", "-m", "m"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_missing_required_arguments() {
        assert!(LexisenseArgs::try_parse_from(["lexisense", "train", "--data", "x"]).is_err());
        assert!(LexisenseArgs::try_parse_from(["lexisense", "classify", "-m", "x"]).is_err());
    }
}
