//! Document pipeline
//!
//! Extract-anonymize-reconstruct over format-specific containers. Each
//! format adapter turns its container into structural units; the
//! orchestrator anonymizes the unit texts as one batch; the adapter then
//! reinserts the translated texts. Replacement is content-keyed, so equal
//! texts anywhere in a document always receive equal replacements.

pub mod grid;
pub mod keyvalue;
pub mod markup;
pub mod ocr;
pub mod paged;
pub mod richtext;
pub mod table;

use crate::anonymization::Orchestrator;
use crate::domain::{Result, StructuralUnit, UnitPosition, VeilError};
use ocr::OcrEngine;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Original unit text to anonymized replacement
pub type TranslationMap = HashMap<String, String>;

/// A parsed document, tagged by container shape
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Flat text
    Text(String),
    /// Tabular data with a header row
    Table(table::Table),
    /// Markup (XML) kept as source text
    Markup(String),
    /// Key/value tree (JSON)
    KeyValue(serde_json::Value),
    /// Paginated, positioned blocks
    Paged(paged::PagedDocument),
    /// Paragraphs of styled runs
    RichText(richtext::RichTextDocument),
    /// Spreadsheet workbook
    Grid(grid::GridWorkbook),
}

/// Anonymize one document, preserving its container shape where the format
/// allows
///
/// Paged and rich-text documents flatten to `Document::Text`; every other
/// variant reconstructs as itself.
pub fn anonymize_document(
    orchestrator: &mut Orchestrator,
    ocr: &dyn OcrEngine,
    document: Document,
) -> Result<Document> {
    let units = match &document {
        Document::Text(text) => vec![StructuralUnit::new(text.clone(), UnitPosition::Whole)],
        Document::Table(table) => table::extract(table),
        Document::Markup(xml) => markup::extract(xml)?,
        Document::KeyValue(value) => keyvalue::extract(value),
        Document::Paged(doc) => paged::extract(doc, ocr),
        Document::RichText(doc) => richtext::extract(doc, ocr),
        Document::Grid(workbook) => grid::extract(workbook, ocr),
    };

    let texts: Vec<String> = units.iter().map(|u| u.text.clone()).collect();
    let batch_size = orchestrator.config().batch_size;
    let anonymized = orchestrator.anonymize_batch(&texts, batch_size)?;

    let mut translations = TranslationMap::with_capacity(units.len());
    for (unit, replacement) in units.iter().zip(&anonymized) {
        translations.insert(unit.text.clone(), replacement.clone());
    }

    Ok(match document {
        Document::Text(text) => Document::Text(
            translations.get(&text).cloned().unwrap_or(text),
        ),
        Document::Table(table) => Document::Table(table::reconstruct(table, &translations)),
        Document::Markup(xml) => Document::Markup(markup::reconstruct(&xml, &translations)?),
        Document::KeyValue(value) => {
            Document::KeyValue(keyvalue::reconstruct(&value, &translations))
        }
        Document::Paged(_) => Document::Text(paged::reconstruct(&units, &translations)),
        Document::RichText(_) => Document::Text(richtext::reconstruct(&units, &translations)),
        Document::Grid(workbook) => {
            Document::Grid(grid::reconstruct(workbook, &units, &translations))
        }
    })
}

/// File formats the CLI can load directly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Text,
    Table,
    Markup,
    KeyValue,
    Image,
}

impl FileFormat {
    /// Detect by extension, case-insensitively
    pub fn from_path(path: &Path) -> Option<FileFormat> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::Text),
            "csv" => Some(Self::Table),
            "xml" => Some(Self::Markup),
            "json" => Some(Self::KeyValue),
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tiff" | "tif" | "webp" => Some(Self::Image),
            _ => None,
        }
    }

    /// Extension of the anonymized output file
    fn output_extension(&self) -> &'static str {
        match self {
            Self::Text | Self::Image => "txt",
            Self::Table => "csv",
            Self::Markup => "xml",
            Self::KeyValue => "json",
        }
    }
}

/// Counts from one `process_path` invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Files anonymized and written
    pub processed: usize,
    /// Files that errored and were skipped
    pub failed: usize,
}

/// Anonymize a single file into `output_dir`
///
/// The output lands at `output_dir/anon_<stem>.<ext>`; image and text inputs
/// both produce `.txt` output, structured formats keep their extension.
pub fn process_file(
    orchestrator: &mut Orchestrator,
    ocr: &dyn OcrEngine,
    input: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let format = FileFormat::from_path(input).ok_or_else(|| {
        VeilError::UnsupportedFormat(format!("no handler for '{}'", input.display()))
    })?;

    let document = load_document(format, input, ocr)?;
    let anonymized = anonymize_document(orchestrator, ocr, document)?;

    std::fs::create_dir_all(output_dir)?;
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let output_path = output_dir.join(format!("anon_{stem}.{}", format.output_extension()));
    write_document(&anonymized, &output_path)?;

    tracing::info!(
        input = %input.display(),
        output = %output_path.display(),
        "File anonymized"
    );
    Ok(output_path)
}

/// Anonymize a file or every supported file under a directory
///
/// Single-file errors propagate. In directory mode each file is isolated:
/// a failure is logged and counted, and the walk continues.
pub fn process_path(
    orchestrator: &mut Orchestrator,
    ocr: &dyn OcrEngine,
    input: &Path,
    output_dir: &Path,
) -> Result<ProcessOutcome> {
    if !input.is_dir() {
        process_file(orchestrator, ocr, input, output_dir)?;
        return Ok(ProcessOutcome { processed: 1, failed: 0 });
    }

    let mut outcome = ProcessOutcome::default();
    for entry in walkdir::WalkDir::new(input)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        if FileFormat::from_path(entry.path()).is_none() {
            tracing::debug!(path = %entry.path().display(), "Skipping unsupported file");
            continue;
        }
        match process_file(orchestrator, ocr, entry.path(), output_dir) {
            Ok(_) => outcome.processed += 1,
            Err(e) => {
                tracing::error!(
                    path = %entry.path().display(),
                    error = %e,
                    "File failed, continuing with the rest"
                );
                outcome.failed += 1;
            }
        }
    }
    Ok(outcome)
}

fn load_document(format: FileFormat, input: &Path, ocr: &dyn OcrEngine) -> Result<Document> {
    Ok(match format {
        FileFormat::Text => Document::Text(std::fs::read_to_string(input)?),
        FileFormat::Table => {
            let file = std::fs::File::open(input)?;
            Document::Table(table::read_csv(file)?)
        }
        FileFormat::Markup => Document::Markup(std::fs::read_to_string(input)?),
        FileFormat::KeyValue => {
            let file = std::fs::File::open(input)?;
            Document::KeyValue(serde_json::from_reader(file)?)
        }
        FileFormat::Image => {
            let bytes = std::fs::read(input)?;
            Document::Text(ocr.extract_text(&bytes))
        }
    })
}

fn write_document(document: &Document, output_path: &Path) -> Result<()> {
    match document {
        Document::Text(text) | Document::Markup(text) => {
            std::fs::write(output_path, text)?;
        }
        Document::Table(table) => {
            let file = std::fs::File::create(output_path)?;
            table::write_csv(file, table)?;
        }
        Document::KeyValue(value) => {
            let file = std::fs::File::create(output_path)?;
            serde_json::to_writer_pretty(file, value)?;
        }
        Document::Paged(_) | Document::RichText(_) | Document::Grid(_) => {
            return Err(VeilError::Document(
                "this container shape has no file serialization".to_string(),
            ));
        }
    }
    Ok(())
}
