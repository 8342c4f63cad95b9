//! Regex-based entity detector

use super::patterns::PatternRegistry;
use super::EntityDetector;
use crate::domain::{DetectedSpan, EntityType, Result, VeilError};
use std::sync::Arc;

/// Pattern-based detector over a [`PatternRegistry`]
///
/// Language-agnostic: the `language` argument is accepted for contract
/// parity with NER-backed detectors and ignored here.
pub struct RegexDetector {
    registry: Arc<PatternRegistry>,
}

impl RegexDetector {
    /// Create a detector with the embedded default patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            registry: Arc::new(PatternRegistry::builtin()?),
        })
    }

    /// Create a detector with a custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

impl EntityDetector for RegexDetector {
    fn analyze(
        &self,
        text: &str,
        _language: &str,
        score_threshold: f32,
        entity_types: &[EntityType],
    ) -> Result<Vec<DetectedSpan>> {
        let mut spans = Vec::new();

        for pattern in self.registry.all_patterns() {
            if pattern.score < score_threshold {
                continue;
            }
            if !entity_types.contains(&pattern.entity_type) {
                continue;
            }

            for found in pattern.regex.find_iter(text) {
                let m = found.map_err(|e| VeilError::Detection(e.to_string()))?;
                spans.push(DetectedSpan::new(
                    m.start(),
                    m.end(),
                    pattern.entity_type,
                    pattern.score,
                ));
            }
        }

        // Ordered by start; higher score first on equal start so overlap
        // resolution sees the preferred span first.
        spans.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(b.score.total_cmp(&a.score))
                .then(b.end.cmp(&a.end))
        });
        Ok(spans)
    }

    fn supported_entities(&self) -> Vec<EntityType> {
        EntityType::ALL.to_vec()
    }
}
