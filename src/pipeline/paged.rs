//! Paginated documents
//!
//! Pages hold positioned blocks of text or image content. Blocks are visited
//! in reading order (top-to-bottom, then left-to-right by bounding box) and
//! the anonymized result is flattened to plain text; layout fidelity is
//! deliberately not reconstructed.

use crate::domain::{StructuralUnit, UnitPosition};
use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::TranslationMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Block bounding box in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Content carried by one block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockContent {
    Text(String),
    Image(Vec<u8>),
}

/// One positioned block on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub bbox: BBox,
    pub content: BlockContent,
}

/// One page of blocks, in arbitrary order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub blocks: Vec<Block>,
}

/// A paginated document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedDocument {
    pub pages: Vec<Page>,
}

/// Extract block texts in reading order, running OCR on image blocks
pub fn extract(doc: &PagedDocument, ocr: &dyn OcrEngine) -> Vec<StructuralUnit> {
    let mut units = Vec::new();
    for (p, page) in doc.pages.iter().enumerate() {
        let mut order: Vec<usize> = (0..page.blocks.len()).collect();
        order.sort_by(|&a, &b| reading_order(&page.blocks[a].bbox, &page.blocks[b].bbox));

        for (index, &block_idx) in order.iter().enumerate() {
            let text = match &page.blocks[block_idx].content {
                BlockContent::Text(t) => t.clone(),
                BlockContent::Image(bytes) => ocr.extract_text(bytes),
            };
            units.push(StructuralUnit::new(
                text,
                UnitPosition::PageBlock { page: p, index },
            ));
        }
    }
    units
}

fn reading_order(a: &BBox, b: &BBox) -> Ordering {
    a.y0.partial_cmp(&b.y0)
        .unwrap_or(Ordering::Equal)
        .then(a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal))
}

/// Flatten translated block texts into plain text
///
/// Blocks that produced no text (failed OCR, empty blocks) are dropped; the
/// rest join with newlines in extraction order.
pub fn reconstruct(units: &[StructuralUnit], translations: &TranslationMap) -> String {
    units
        .iter()
        .map(|u| {
            translations
                .get(u.text.as_str())
                .map(String::as_str)
                .unwrap_or(u.text.as_str())
        })
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ocr::{FixedOcr, NullOcr};
    use std::collections::HashMap;

    fn bbox(x0: f32, y0: f32) -> BBox {
        BBox { x0, y0, x1: x0 + 10.0, y1: y0 + 10.0 }
    }

    fn text_block(x0: f32, y0: f32, text: &str) -> Block {
        Block { bbox: bbox(x0, y0), content: BlockContent::Text(text.to_string()) }
    }

    #[test]
    fn test_blocks_sorted_into_reading_order() {
        let doc = PagedDocument {
            pages: vec![Page {
                blocks: vec![
                    text_block(0.0, 50.0, "bottom"),
                    text_block(30.0, 10.0, "top right"),
                    text_block(0.0, 10.0, "top left"),
                ],
            }],
        };
        let units = extract(&doc, &NullOcr);
        let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["top left", "top right", "bottom"]);
        assert_eq!(units[0].position, UnitPosition::PageBlock { page: 0, index: 0 });
    }

    #[test]
    fn test_image_blocks_go_through_ocr() {
        let doc = PagedDocument {
            pages: vec![Page {
                blocks: vec![Block {
                    bbox: bbox(0.0, 0.0),
                    content: BlockContent::Image(vec![1, 2, 3]),
                }],
            }],
        };
        let units = extract(&doc, &FixedOcr("scanned text"));
        assert_eq!(units[0].text, "scanned text");
    }

    #[test]
    fn test_failed_ocr_drops_out_of_output() {
        let doc = PagedDocument {
            pages: vec![Page {
                blocks: vec![
                    text_block(0.0, 0.0, "kept"),
                    Block { bbox: bbox(0.0, 20.0), content: BlockContent::Image(vec![0]) },
                ],
            }],
        };
        let units = extract(&doc, &NullOcr);
        let out = reconstruct(&units, &HashMap::new());
        assert_eq!(out, "kept");
    }

    #[test]
    fn test_reconstruct_applies_translations() {
        let units = vec![
            StructuralUnit::new("John Doe", UnitPosition::PageBlock { page: 0, index: 0 }),
            StructuralUnit::new("plain", UnitPosition::PageBlock { page: 0, index: 1 }),
        ];
        let mut translations = HashMap::new();
        translations.insert("John Doe".to_string(), "[PERSON_ab12]".to_string());
        assert_eq!(reconstruct(&units, &translations), "[PERSON_ab12]\nplain");
    }
}
