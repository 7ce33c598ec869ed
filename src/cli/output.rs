//! Output formatting for CLI commands.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::classification::Classification;
use crate::cli::args::{LexisenseArgs, OutputFormat};

/// Result structure for training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub output: String,
    pub codec: String,
    pub records: usize,
    pub vectors_trained: usize,
    pub vectors_dropped: usize,
    pub classes: usize,
    pub shards: usize,
    pub workers: usize,
    pub duration_ms: u64,
}

/// Ranked senses for one record; padding sentinels are left out.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordClassification {
    pub line: usize,
    pub expected: Option<String>,
    pub answer: Classification,
    pub candidates: Vec<Classification>,
}

/// Result structure for classification.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub results: Vec<RecordClassification>,
    pub total: usize,
    pub labelled: usize,
    pub correct: usize,
    pub accuracy: Option<f64>,
    pub duration_ms: u64,
}

/// Class entry of a model summary.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassSummary {
    pub label: String,
    pub prior: f64,
}

/// Attribute entry of a model summary.
#[derive(Debug, Serialize, Deserialize)]
pub struct AttributeSummary {
    pub name: String,
    pub values: usize,
    pub weight: f64,
}

/// Result structure for model inspection.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelSummary {
    pub schema: String,
    pub class_attribute: String,
    pub total_weight: f64,
    pub drop_filter_words: bool,
    pub classes: Vec<ClassSummary>,
    pub attributes: Vec<AttributeSummary>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &LexisenseArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &LexisenseArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;

    if value.get("results").is_some() {
        output_classification_human(&value)
    } else if value.get("attributes").is_some() {
        output_model_summary_human(&value)
    } else {
        output_generic_human(&value)
    }
}

fn output_classification_human(value: &serde_json::Value) -> Result<()> {
    let report: ClassificationReport = serde_json::from_value(value.clone())?;

    for result in &report.results {
        let candidates = result
            .candidates
            .iter()
            .map(|c| format!("{}({:.4})", c.label(), c.score()))
            .collect::<Vec<_>>()
            .join(", ");
        let marker = match &result.expected {
            Some(expected) if expected == result.answer.label() => " ✓",
            Some(_) => " ✗",
            None => "",
        };
        println!(
            "line {}: {}{}  [{}]",
            result.line,
            result.answer.label(),
            marker,
            candidates
        );
    }

    println!();
    println!("Records: {}", report.total);
    if let Some(accuracy) = report.accuracy {
        println!(
            "Accuracy: {:.2}% ({}/{})",
            accuracy * 100.0,
            report.correct,
            report.labelled
        );
    }
    println!("Time: {}ms", report.duration_ms);
    Ok(())
}

fn output_model_summary_human(value: &serde_json::Value) -> Result<()> {
    let summary: ModelSummary = serde_json::from_value(value.clone())?;

    println!("Schema: {}", summary.schema);
    println!("Class attribute: {}", summary.class_attribute);
    println!("Training weight: {}", summary.total_weight);
    println!("Filter words dropped: {}", summary.drop_filter_words);
    println!();
    println!("Classes ({}):", summary.classes.len());
    println!("─────────────");
    for class in &summary.classes {
        println!("  {:<32} {:.6}", class.label, class.prior);
    }
    println!();
    println!("Attributes ({}):", summary.attributes.len());
    println!("─────────────");
    for attribute in &summary.attributes {
        println!(
            "  {:<16} {:>8} values  weight {}",
            attribute.name, attribute.values, attribute.weight
        );
    }
    Ok(())
}

fn output_generic_human(value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                println!("{key}: {}", format_value(val));
            }
        }
        _ => println!("{}", format_value(value)),
    }
    Ok(())
}

fn output_json<T: Serialize>(result: &T, args: &LexisenseArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&serde_json::json!("bank")), "bank");
        assert_eq!(format_value(&serde_json::json!(null)), "-");
        assert_eq!(format_value(&serde_json::json!(3)), "3");
    }

    #[test]
    fn test_report_survives_json_value() {
        let report = ClassificationReport {
            results: vec![RecordClassification {
                line: 1,
                expected: Some("a".to_string()),
                answer: Classification::new("a", 0.9),
                candidates: vec![Classification::new("a", 0.9), Classification::new("b", 0.1)],
            }],
            total: 1,
            labelled: 1,
            correct: 1,
            accuracy: Some(1.0),
            duration_ms: 3,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("results").is_some());
        let back: ClassificationReport = serde_json::from_value(value).unwrap();
        assert_eq!(back.results[0].candidates[1].label(), "b");
        assert_eq!(back.accuracy, Some(1.0));
    }
}
