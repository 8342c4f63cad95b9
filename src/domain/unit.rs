//! Structural units extracted from documents
//!
//! A structural unit is one extractable text fragment plus enough positional
//! metadata to reinsert its anonymized replacement. Units live for one
//! document's pass through the pipeline and are discarded after
//! reconstruction.

use serde::{Deserialize, Serialize};

/// Format-specific position descriptor for a structural unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UnitPosition {
    /// The whole document is one unit (flat text, OCR'd image)
    Whole,
    /// A tabular cell (row/column, zero-based; header is row 0)
    Cell { row: usize, col: usize },
    /// A grid cell within a named sheet
    GridCell { sheet: usize, row: usize, col: usize },
    /// OCR text of an embedded image within a sheet
    GridImage { sheet: usize, image: usize },
    /// The n-th text-bearing markup segment in document order
    MarkupSegment(usize),
    /// JSON path to a leaf string (pre-order)
    JsonPath(String),
    /// A block on a page, in reading order after sorting
    PageBlock { page: usize, index: usize },
    /// A run within a rich-text paragraph
    Run { paragraph: usize, run: usize },
}

/// One extractable text fragment and where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralUnit {
    /// The fragment text, exactly as extracted
    pub text: String,
    /// Where to reinsert the anonymized replacement
    pub position: UnitPosition,
}

impl StructuralUnit {
    /// Create a unit
    pub fn new(text: impl Into<String>, position: UnitPosition) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }
}
