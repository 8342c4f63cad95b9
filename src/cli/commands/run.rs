//! Run command implementation
//!
//! Anonymizes a file or a directory of files, prints a summary of what was
//! replaced, and writes a per-run report next to the logs.

use crate::anonymization::detector::patterns::PatternRegistry;
use crate::anonymization::detector::RegexDetector;
use crate::anonymization::{AnonymizationConfig, Orchestrator, SlugGenerator};
use crate::config::{load_or_default, load_secret_key, VeilConfig};
use crate::domain::VeilError;
use crate::pipeline::ocr::TesseractOcr;
use crate::pipeline::{process_path, ProcessOutcome};
use crate::registry::EntityRegistry;
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// File or directory to anonymize
    pub input: PathBuf,

    /// Directory for anonymized output (overrides config)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Registry database path (overrides config)
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Document language (overrides config)
    #[arg(long)]
    pub language: Option<String>,

    /// Displayed hash length, 1-64 (overrides config)
    #[arg(long)]
    pub slug_length: Option<usize>,

    /// Detector chunk size for document units (overrides config)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Verbatim string exempt from redaction (repeatable)
    #[arg(long)]
    pub allow: Vec<String>,

    /// Entity type to leave untouched (repeatable)
    #[arg(long)]
    pub preserve: Vec<String>,
}

impl RunArgs {
    /// Execute the run command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        if !self.input.exists() {
            eprintln!("Input not found: {}", self.input.display());
            return Ok(2);
        }

        let mut config = load_or_default(config_path).context("failed to load configuration")?;
        self.apply_overrides(&mut config);

        // No key, no run. Silent operation with an absent key would emit
        // unkeyed hashes.
        let key = load_secret_key().context("secret key is required")?;

        let anon_config = AnonymizationConfig::from_file_config(&config.anonymization);
        let registry = EntityRegistry::open(&config.registry.db_path)
            .context("failed to open entity registry")?;
        let detector = match &config.anonymization.patterns_path {
            Some(path) => Arc::new(RegexDetector::with_registry(
                PatternRegistry::from_file(path).context("failed to load pattern library")?,
            )),
            None => Arc::new(RegexDetector::new().context("failed to compile patterns")?),
        };
        let slugger = SlugGenerator::new(key)?;
        let mut orchestrator = Orchestrator::new(anon_config, detector, slugger, registry)?;
        let ocr = TesseractOcr::new(config.anonymization.language.clone());

        let started = Instant::now();
        let outcome =
            match process_path(&mut orchestrator, &ocr, &self.input, &config.output.dir) {
                Ok(outcome) => outcome,
                Err(VeilError::UnsupportedFormat(msg)) => {
                    eprintln!("Unsupported input: {msg}");
                    return Ok(2);
                }
                Err(e) => return Err(e.into()),
            };
        let elapsed = started.elapsed();

        print_stats(&orchestrator, outcome);
        write_report(&config, &self.input, &orchestrator, outcome, elapsed)?;

        if outcome.processed == 0 {
            eprintln!("No files processed under {}", self.input.display());
            return Ok(2);
        }
        Ok(0)
    }

    fn apply_overrides(&self, config: &mut VeilConfig) {
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(path) = &self.registry {
            config.registry.db_path = path.clone();
        }
        if let Some(language) = &self.language {
            config.anonymization.language = language.clone();
        }
        if let Some(len) = self.slug_length {
            config.anonymization.slug_length = Some(len);
        }
        if let Some(size) = self.batch_size {
            config.anonymization.batch_size = size;
        }
        config.anonymization.allow_list.extend(self.allow.iter().cloned());
        config
            .anonymization
            .preserve_entity_types
            .extend(self.preserve.iter().cloned());
    }
}

fn print_stats(orchestrator: &Orchestrator, outcome: ProcessOutcome) {
    let counters = orchestrator.counters();
    println!("--- Anonymization Stats ---");
    println!("Files processed: {}", outcome.processed);
    if outcome.failed > 0 {
        println!("Files failed: {}", outcome.failed);
    }
    println!("Total entities processed: {}", counters.total_entities_processed);
    for (entity_type, count) in counters.sorted_counts() {
        println!("  {entity_type}: {count}");
    }
}

fn write_report(
    config: &VeilConfig,
    input: &std::path::Path,
    orchestrator: &Orchestrator,
    outcome: ProcessOutcome,
    elapsed: std::time::Duration,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.output.report_dir)?;
    let base = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("run");
    let report_path = config.output.report_dir.join(format!("report_{base}.txt"));

    let counters = orchestrator.counters();
    let mut report = String::new();
    report.push_str(&format!("Input: {}\n", input.display()));
    report.push_str(&format!("Files processed: {}\n", outcome.processed));
    report.push_str(&format!("Files failed: {}\n", outcome.failed));
    report.push_str(&format!(
        "Total entities processed: {}\n",
        counters.total_entities_processed
    ));
    for (entity_type, count) in counters.sorted_counts() {
        report.push_str(&format!("  {entity_type}: {count}\n"));
    }
    report.push_str(&format!("Elapsed: {:.2}s\n", elapsed.as_secs_f64()));

    std::fs::write(&report_path, report).context("failed to write run report")?;
    tracing::info!(report = %report_path.display(), "Run report written");
    Ok(())
}
