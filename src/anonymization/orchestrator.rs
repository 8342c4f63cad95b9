//! Anonymization orchestrator
//!
//! Drives detection, allow/preserve filtering, overlap resolution, token
//! splicing, and batched registry writes. One orchestrator instance
//! processes documents sequentially and accumulates run counters for the
//! whole run.

use crate::anonymization::config::AnonymizationConfig;
use crate::anonymization::detector::EntityDetector;
use crate::anonymization::slug::SlugGenerator;
use crate::domain::{CollectedEntity, DetectedSpan, EntityType, Result, RunCounters};
use crate::registry::EntityRegistry;
use std::sync::Arc;

/// Minimum detector confidence for a span to be considered
pub const SCORE_THRESHOLD: f32 = 0.6;

/// Orchestrates the text anonymization process
pub struct Orchestrator {
    config: AnonymizationConfig,
    detector: Arc<dyn EntityDetector>,
    slugger: SlugGenerator,
    registry: EntityRegistry,
    counters: RunCounters,
}

impl Orchestrator {
    /// Create an orchestrator
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `config` fails validation.
    pub fn new(
        config: AnonymizationConfig,
        detector: Arc<dyn EntityDetector>,
        slugger: SlugGenerator,
        registry: EntityRegistry,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            detector,
            slugger,
            registry,
            counters: RunCounters::default(),
        })
    }

    /// Anonymize a single block of text
    ///
    /// Issues one registry write for all entities found in this call.
    pub fn anonymize_text(&mut self, text: &str) -> Result<String> {
        let mut collector = Vec::new();
        let result = self.anonymize_one(text, &mut collector)?;
        if !collector.is_empty() {
            self.registry.bulk_upsert(&collector)?;
        }
        Ok(result)
    }

    /// Anonymize a list of texts, chunking detector calls by `batch_size`
    ///
    /// Each text is processed independently - texts never influence each
    /// other's spans - but the registry write is deferred until every chunk
    /// completes, so the entire batch lands in one transaction and identical
    /// normalized strings across texts collapse to one registry row.
    pub fn anonymize_batch(&mut self, texts: &[String], batch_size: usize) -> Result<Vec<String>> {
        let batch_size = batch_size.max(1);
        let scan_types = self.scan_types();
        let mut results = Vec::with_capacity(texts.len());
        let mut collector = Vec::new();

        for chunk in texts.chunks(batch_size) {
            let refs: Vec<&str> = chunk.iter().map(String::as_str).collect();
            let spans_per_text = self.detector.analyze_batch(
                &refs,
                &self.config.language,
                SCORE_THRESHOLD,
                &scan_types,
            )?;

            for (text, spans) in chunk.iter().zip(spans_per_text) {
                results.push(self.substitute(text, spans, &mut collector));
            }
        }

        if !collector.is_empty() {
            self.registry.bulk_upsert(&collector)?;
        }
        Ok(results)
    }

    /// Run counters accumulated on this instance
    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    /// The active configuration
    pub fn config(&self) -> &AnonymizationConfig {
        &self.config
    }

    /// The owned registry handle
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Entity types to scan: everything supported minus the preserve set
    fn scan_types(&self) -> Vec<EntityType> {
        self.detector
            .supported_entities()
            .into_iter()
            .filter(|et| !self.config.preserve_entity_types.contains(et))
            .collect()
    }

    fn anonymize_one(&mut self, text: &str, collector: &mut Vec<CollectedEntity>) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let scan_types = self.scan_types();
        let spans = self.detector.analyze(
            text,
            &self.config.language,
            SCORE_THRESHOLD,
            &scan_types,
        )?;
        Ok(self.substitute(text, spans, collector))
    }

    /// Apply filtering, overlap resolution and token splicing to one text
    fn substitute(
        &mut self,
        text: &str,
        spans: Vec<DetectedSpan>,
        collector: &mut Vec<CollectedEntity>,
    ) -> String {
        if spans.is_empty() {
            return text.to_string();
        }

        let filtered: Vec<DetectedSpan> = spans
            .into_iter()
            .filter(|s| s.start < s.end && s.end <= text.len())
            .filter(|s| !self.config.allow_list.contains(&text[s.start..s.end]))
            .collect();

        let accepted = resolve_overlaps(filtered);

        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;
        for span in &accepted {
            output.push_str(&text[cursor..span.start]);
            let token = self.slugger.slug(
                &text[span.start..span.end],
                span.entity_type,
                self.config.slug_length,
                collector,
                &mut self.counters,
            );
            output.push_str(&token);
            cursor = span.end;
        }
        output.push_str(&text[cursor..]);
        output
    }
}

/// Resolve overlapping spans: leftmost wins, ties broken by highest score,
/// remaining overlapped spans dropped
fn resolve_overlaps(mut spans: Vec<DetectedSpan>) -> Vec<DetectedSpan> {
    spans.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(b.score.total_cmp(&a.score))
            .then(b.end.cmp(&a.end))
    });

    let mut accepted: Vec<DetectedSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match accepted.last() {
            Some(prev) if span.start < prev.end => {
                tracing::debug!(
                    start = span.start,
                    end = span.end,
                    entity_type = %span.entity_type,
                    "Dropping overlapped span"
                );
            }
            _ => accepted.push(span),
        }
    }
    accepted
}
