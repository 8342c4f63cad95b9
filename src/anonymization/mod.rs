//! Anonymization engine
//!
//! This module provides the core of veil: deterministic keyed slug
//! generation, entity detection behind a trait seam, and the
//! [`Orchestrator`] that drives detection, filtering, replacement and
//! registry writes.
//!
//! # Architecture
//!
//! - **Slug generator**: HMAC-SHA256 keyed pseudonymization of matched text
//! - **Detector**: trait-based span detection; a regex implementation ships
//!   with the crate, NER engines plug in behind the same trait
//! - **Orchestrator**: applies the configured allow/preserve lists, resolves
//!   overlaps, splices tokens, and batches registry writes

pub mod config;
pub mod detector;
pub mod orchestrator;
pub mod slug;

pub use config::AnonymizationConfig;
pub use orchestrator::{Orchestrator, SCORE_THRESHOLD};
pub use slug::SlugGenerator;
