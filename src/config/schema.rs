//! Configuration file schema
//!
//! Mirrors the structure of `veil.toml`. Every section has defaults so a
//! missing config file still yields a working setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VeilConfig {
    /// Anonymization engine settings
    #[serde(default)]
    pub anonymization: AnonymizationFileConfig,

    /// Entity registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[anonymization]` section, as written in the file
///
/// Entity types are kept as raw strings here; unknown names are warned about
/// and dropped when the orchestrator config is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationFileConfig {
    /// Document language tag (BCP 47 primary subtag, e.g. "en", "pt")
    #[serde(default = "default_language")]
    pub language: String,

    /// Verbatim strings exempt from redaction
    #[serde(default)]
    pub allow_list: Vec<String>,

    /// Entity type names left untouched
    #[serde(default)]
    pub preserve_entity_types: Vec<String>,

    /// Displayed hash length, 1-64; unset means the full 64 characters
    #[serde(default)]
    pub slug_length: Option<usize>,

    /// Detector chunk size for batched document units
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pattern library TOML path; unset means the embedded library
    #[serde(default)]
    pub patterns_path: Option<PathBuf>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_batch_size() -> usize {
    32
}

impl Default for AnonymizationFileConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            allow_list: Vec::new(),
            preserve_entity_types: Vec::new(),
            slug_length: None,
            batch_size: default_batch_size(),
            patterns_path: None,
        }
    }
}

/// `[registry]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// SQLite database path
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("db/entities.db")
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// `[output]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving anonymized documents
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Directory receiving per-input run reports
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            report_dir: default_report_dir(),
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging in addition to the console
    #[serde(default)]
    pub file_enabled: bool,

    /// Directory for rotated log files
    #[serde(default = "default_log_dir")]
    pub file_dir: String,
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_enabled: false,
            file_dir: default_log_dir(),
        }
    }
}

/// Starter config written by `veil init`
pub const EXAMPLE_CONFIG: &str = r#"# veil configuration
#
# The HMAC secret key is never stored here. Set it in the environment:
#   export VEIL_SECRET_KEY="..."

[anonymization]
language = "en"
allow_list = []
preserve_entity_types = []
# slug_length = 16
batch_size = 32
# patterns_path = "patterns/detector_patterns.toml"

[registry]
db_path = "db/entities.db"

[output]
dir = "output"
report_dir = "logs"

[logging]
file_enabled = false
file_dir = "logs"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VeilConfig::default();
        assert_eq!(config.anonymization.language, "en");
        assert_eq!(config.anonymization.batch_size, 32);
        assert_eq!(config.anonymization.slug_length, None);
        assert_eq!(config.registry.db_path, PathBuf::from("db/entities.db"));
        assert!(!config.logging.file_enabled);
    }

    #[test]
    fn test_example_config_parses() {
        let config: VeilConfig = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("output"));
    }

    #[test]
    fn test_partial_file() {
        let config: VeilConfig = toml::from_str("[anonymization]\nlanguage = \"pt\"\n").unwrap();
        assert_eq!(config.anonymization.language, "pt");
        assert_eq!(config.anonymization.batch_size, 32);
    }
}
