//! Grid workbooks (spreadsheets)
//!
//! Text cells are extracted individually; numeric, boolean and empty cells
//! pass through untouched. Embedded sheet images go through OCR, and their
//! anonymized text is appended to the owning sheet as extra rows since the
//! image itself cannot be rewritten.

use crate::domain::{StructuralUnit, UnitPosition};
use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::TranslationMap;
use serde::{Deserialize, Serialize};

/// One spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

/// One sheet: a cell grid plus embedded images
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
    pub images: Vec<Vec<u8>>,
}

/// A workbook of sheets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridWorkbook {
    pub sheets: Vec<Sheet>,
}

/// Label prepended to OCR-derived rows on reconstruction
const IMAGE_TEXT_LABEL: &str = "Anonymized image text:";

/// Extract non-blank text cells and OCR'd image text
pub fn extract(workbook: &GridWorkbook, ocr: &dyn OcrEngine) -> Vec<StructuralUnit> {
    let mut units = Vec::new();
    for (s, sheet) in workbook.sheets.iter().enumerate() {
        for (r, row) in sheet.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if let Cell::Text(text) = cell {
                    if !text.trim().is_empty() {
                        units.push(StructuralUnit::new(
                            text.clone(),
                            UnitPosition::GridCell { sheet: s, row: r, col: c },
                        ));
                    }
                }
            }
        }
        for (i, image) in sheet.images.iter().enumerate() {
            let text = ocr.extract_text(image);
            if !text.trim().is_empty() {
                units.push(StructuralUnit::new(
                    text,
                    UnitPosition::GridImage { sheet: s, image: i },
                ));
            }
        }
    }
    units
}

/// Rebuild the workbook with anonymized cell and image text
///
/// Cells are replaced in place. Each sheet's OCR-derived texts land as
/// trailing label+text rows, and the original image bytes are dropped from
/// the output.
pub fn reconstruct(
    mut workbook: GridWorkbook,
    units: &[StructuralUnit],
    translations: &TranslationMap,
) -> GridWorkbook {
    for sheet in &mut workbook.sheets {
        for row in &mut sheet.rows {
            for cell in row.iter_mut() {
                if let Cell::Text(text) = cell {
                    if let Some(replacement) = translations.get(text.as_str()) {
                        *text = replacement.clone();
                    }
                }
            }
        }
        sheet.images.clear();
    }

    for unit in units {
        if let UnitPosition::GridImage { sheet, .. } = unit.position {
            let Some(target) = workbook.sheets.get_mut(sheet) else {
                continue;
            };
            let text = translations
                .get(unit.text.as_str())
                .map(String::as_str)
                .unwrap_or(unit.text.as_str());
            if !text.trim().is_empty() {
                target.rows.push(vec![
                    Cell::Text(IMAGE_TEXT_LABEL.to_string()),
                    Cell::Text(text.to_string()),
                ]);
            }
        }
    }
    workbook
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ocr::{FixedOcr, NullOcr};
    use std::collections::HashMap;

    fn workbook() -> GridWorkbook {
        GridWorkbook {
            sheets: vec![Sheet {
                name: "hosts".to_string(),
                rows: vec![
                    vec![Cell::Text("hostname".to_string()), Cell::Number(1.0)],
                    vec![Cell::Text("db01.example.com".to_string()), Cell::Bool(true)],
                    vec![Cell::Empty, Cell::Text("  ".to_string())],
                ],
                images: vec![],
            }],
        }
    }

    #[test]
    fn test_extract_text_cells_only() {
        let units = extract(&workbook(), &NullOcr);
        let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["hostname", "db01.example.com"]);
        assert_eq!(
            units[1].position,
            UnitPosition::GridCell { sheet: 0, row: 1, col: 0 }
        );
    }

    #[test]
    fn test_reconstruct_preserves_non_text_cells() {
        let wb = workbook();
        let units = extract(&wb, &NullOcr);
        let mut translations = HashMap::new();
        translations.insert(
            "db01.example.com".to_string(),
            "[HOSTNAME_ab12]".to_string(),
        );

        let rebuilt = reconstruct(wb, &units, &translations);
        assert_eq!(rebuilt.sheets[0].rows[1][0], Cell::Text("[HOSTNAME_ab12]".to_string()));
        assert_eq!(rebuilt.sheets[0].rows[0][1], Cell::Number(1.0));
        assert_eq!(rebuilt.sheets[0].rows[1][1], Cell::Bool(true));
        assert_eq!(rebuilt.sheets[0].rows[2][0], Cell::Empty);
    }

    #[test]
    fn test_image_text_appended_and_images_dropped() {
        let mut wb = workbook();
        wb.sheets[0].images.push(vec![1, 2, 3]);

        let units = extract(&wb, &FixedOcr("scanned 10.0.0.1"));
        let mut translations = HashMap::new();
        translations.insert(
            "scanned 10.0.0.1".to_string(),
            "scanned [IP_ADDRESS_ab12]".to_string(),
        );

        let rebuilt = reconstruct(wb, &units, &translations);
        let sheet = &rebuilt.sheets[0];
        assert!(sheet.images.is_empty());
        let last = sheet.rows.last().unwrap();
        assert_eq!(last[0], Cell::Text("Anonymized image text:".to_string()));
        assert_eq!(last[1], Cell::Text("scanned [IP_ADDRESS_ab12]".to_string()));
    }

    #[test]
    fn test_failed_ocr_contributes_nothing() {
        let mut wb = workbook();
        wb.sheets[0].images.push(vec![1]);
        let units = extract(&wb, &NullOcr);
        assert_eq!(units.len(), 2);

        let rebuilt = reconstruct(wb, &units, &HashMap::new());
        assert_eq!(rebuilt.sheets[0].rows.len(), 3);
    }
}
