//! Entity detection seam
//!
//! Detection of sensitive spans is a capability consumed by the
//! orchestrator, not owned by it. The regex implementation in this module
//! covers pattern-shaped entities; NER-backed engines implement the same
//! trait and drop in without orchestrator changes.

pub mod patterns;
pub mod regex;

pub use self::regex::RegexDetector;

use crate::domain::{DetectedSpan, EntityType, Result};

/// Trait for entity detection implementations
pub trait EntityDetector: Send + Sync {
    /// Detect sensitive spans in a block of text
    ///
    /// Returns spans ordered by start offset. Matches scoring below
    /// `score_threshold` or whose type is not in `entity_types` are
    /// filtered out by the detector.
    fn analyze(
        &self,
        text: &str,
        language: &str,
        score_threshold: f32,
        entity_types: &[EntityType],
    ) -> Result<Vec<DetectedSpan>>;

    /// Analyze a chunk of texts in one call
    ///
    /// Texts never influence each other's spans; this exists so batched
    /// engines can amortize per-call cost. The default maps [`analyze`]
    /// over the chunk.
    ///
    /// [`analyze`]: EntityDetector::analyze
    fn analyze_batch(
        &self,
        texts: &[&str],
        language: &str,
        score_threshold: f32,
        entity_types: &[EntityType],
    ) -> Result<Vec<Vec<DetectedSpan>>> {
        texts
            .iter()
            .map(|text| self.analyze(text, language, score_threshold, entity_types))
            .collect()
    }

    /// The entity type universe this detector can emit
    fn supported_entities(&self) -> Vec<EntityType>;
}
