//! Anonymization configuration

use crate::config::schema::AnonymizationFileConfig;
use crate::domain::{EntityType, Result, VeilError};
use std::collections::HashSet;

/// Orchestrator configuration
///
/// Immutable for the lifetime of an [`Orchestrator`](super::Orchestrator)
/// instance.
#[derive(Debug, Clone)]
pub struct AnonymizationConfig {
    /// Document language tag passed through to the detector
    pub language: String,
    /// Verbatim strings exempt from redaction (case-sensitive)
    pub allow_list: HashSet<String>,
    /// Entity types left untouched
    pub preserve_entity_types: HashSet<EntityType>,
    /// Displayed hash length, 1-64; `None` means the full 64 characters
    pub slug_length: Option<usize>,
    /// Detector chunk size for batched unit processing
    pub batch_size: usize,
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            allow_list: HashSet::new(),
            preserve_entity_types: HashSet::new(),
            slug_length: None,
            batch_size: 32,
        }
    }
}

impl AnonymizationConfig {
    /// Build from the raw file config
    ///
    /// Unknown entity type names in `preserve_entity_types` are warned about
    /// and ignored rather than failing the run.
    pub fn from_file_config(file: &AnonymizationFileConfig) -> Self {
        let mut preserve = HashSet::new();
        for name in &file.preserve_entity_types {
            match name.parse::<EntityType>() {
                Ok(et) => {
                    preserve.insert(et);
                }
                Err(_) => {
                    tracing::warn!(entity_type = %name, "Ignoring unsupported entity type in preserve list");
                }
            }
        }

        Self {
            language: file.language.clone(),
            allow_list: file.allow_list.iter().cloned().collect(),
            preserve_entity_types: preserve,
            slug_length: file.slug_length,
            batch_size: file.batch_size.max(1),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(len) = self.slug_length {
            if !(1..=64).contains(&len) {
                return Err(VeilError::Configuration(format!(
                    "slug_length must be between 1 and 64, got {len}"
                )));
            }
        }
        if self.batch_size == 0 {
            return Err(VeilError::Configuration(
                "batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
