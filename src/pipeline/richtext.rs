//! Rich-text documents
//!
//! Paragraphs hold runs of styled text or inline images. Each run is its own
//! unit so a replacement never crosses a style boundary. Output is flattened
//! to plain text; styling is deliberately not reconstructed.

use crate::domain::{StructuralUnit, UnitPosition};
use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::TranslationMap;
use serde::{Deserialize, Serialize};

/// One run inside a paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Run {
    Text(String),
    Image(Vec<u8>),
}

/// A paragraph of runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

/// A rich-text document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextDocument {
    pub paragraphs: Vec<Paragraph>,
}

/// Extract one unit per run, running OCR on inline images
pub fn extract(doc: &RichTextDocument, ocr: &dyn OcrEngine) -> Vec<StructuralUnit> {
    let mut units = Vec::new();
    for (p, paragraph) in doc.paragraphs.iter().enumerate() {
        for (r, run) in paragraph.runs.iter().enumerate() {
            let text = match run {
                Run::Text(t) => t.clone(),
                Run::Image(bytes) => ocr.extract_text(bytes),
            };
            units.push(StructuralUnit::new(
                text,
                UnitPosition::Run { paragraph: p, run: r },
            ));
        }
    }
    units
}

/// Flatten translated runs into plain text
///
/// Runs concatenate within a paragraph; paragraphs that end up empty are
/// dropped and the rest join with newlines.
pub fn reconstruct(units: &[StructuralUnit], translations: &TranslationMap) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    for unit in units {
        let paragraph = match unit.position {
            UnitPosition::Run { paragraph, .. } => paragraph,
            _ => continue,
        };
        if paragraphs.len() <= paragraph {
            paragraphs.resize(paragraph + 1, String::new());
        }
        let text = translations
            .get(unit.text.as_str())
            .map(String::as_str)
            .unwrap_or(unit.text.as_str());
        paragraphs[paragraph].push_str(text);
    }

    paragraphs
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
