//! Pattern library for entity detection
//!
//! Patterns are `(regex, entity_type, score)` rows loaded once at setup,
//! either from the embedded default library or from a caller-supplied TOML
//! file. There is no runtime registration.

use crate::domain::{EntityType, Result, VeilError};
use fancy_regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Pattern definition as written in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Regex sources for this rule
    pub patterns: Vec<String>,
    /// Confidence score attached to every match (0.0 - 1.0)
    pub score: f32,
    /// Entity type wire name
    pub entity_type: String,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Compiled regex (fancy-regex: the library uses look-around)
    pub regex: Regex,
    /// Entity type emitted on match
    pub entity_type: EntityType,
    /// Confidence score
    pub score: f32,
}

#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: HashMap<String, PatternDefinition>,
}

/// Registry of compiled detection patterns
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
}

impl PatternRegistry {
    /// Load and compile a pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            VeilError::Configuration(format!(
                "Failed to read pattern library {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Compile a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary = toml::from_str(content)?;

        let mut patterns = Vec::new();
        for (name, def) in library.patterns {
            let entity_type: EntityType = def.entity_type.parse().map_err(|e| {
                VeilError::Configuration(format!("Pattern '{name}': {e}"))
            })?;

            for source in &def.patterns {
                let regex = Regex::new(source).map_err(|e| {
                    VeilError::Configuration(format!(
                        "Pattern '{name}': invalid regex {source:?}: {e}"
                    ))
                })?;
                patterns.push(CompiledPattern {
                    regex,
                    entity_type,
                    score: def.score,
                });
            }
        }

        // Deterministic iteration order regardless of HashMap layout.
        patterns.sort_by(|a, b| {
            a.entity_type
                .as_str()
                .cmp(b.entity_type.as_str())
                .then(b.score.total_cmp(&a.score))
        });

        Ok(Self { patterns })
    }

    /// The embedded default library
    pub fn builtin() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/detector_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// All compiled patterns
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }
}
