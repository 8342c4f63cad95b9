//! veil - reversible document anonymizer
//!
//! Detects sensitive entities in heterogeneous documents, replaces them with
//! deterministic keyed redaction tokens, and records a content-addressed
//! registry so tokens can later be resolved back to the original text.
//!
//! The same text under the same key always yields the same token, across
//! files, formats and runs.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod pipeline;
pub mod registry;
