//! Configuration loading with environment variable support
//!
//! Supports `${VAR}` substitution inside the TOML file and `VEIL_*`
//! environment overrides applied after parsing.

use super::schema::VeilConfig;
use crate::domain::{Result, VeilError};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Load configuration from a TOML file
///
/// Order of precedence (lowest to highest): file values, `${VAR}`
/// substitutions, `VEIL_*` environment overrides.
pub fn load_config(path: impl AsRef<Path>) -> Result<VeilConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| {
        VeilError::Configuration(format!("Failed to read config {}: {e}", path.display()))
    })?;

    let substituted = substitute_env_vars(&raw)?;
    let mut config: VeilConfig = toml::from_str(&substituted)?;

    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration, falling back to defaults when the file is absent
///
/// Used for the default config path so `veil run` works without a
/// `veil.toml`. An explicitly named file that is missing is still an error.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<VeilConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        let mut config = VeilConfig::default();
        apply_env_overrides(&mut config)?;
        validate(&config)?;
        Ok(config)
    }
}

/// Replace `${VAR}` references with environment variable values
fn substitute_env_vars(input: &str) -> Result<String> {
    // Unwrap: the pattern is a compile-time constant.
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
    let mut result = String::with_capacity(input.len());
    let mut last = 0;

    for caps in re.captures_iter(input) {
        let whole = caps.get(0).expect("capture 0 always present");
        let name = &caps[1];
        let value = std::env::var(name).map_err(|_| {
            VeilError::Configuration(format!("Environment variable not set: {name}"))
        })?;
        result.push_str(&input[last..whole.start()]);
        result.push_str(&value);
        last = whole.end();
    }
    result.push_str(&input[last..]);
    Ok(result)
}

/// Apply `VEIL_*` environment overrides
fn apply_env_overrides(config: &mut VeilConfig) -> Result<()> {
    if let Ok(val) = std::env::var("VEIL_LANGUAGE") {
        config.anonymization.language = val;
    }

    if let Ok(val) = std::env::var("VEIL_SLUG_LENGTH") {
        let parsed = val.parse::<usize>().map_err(|_| {
            VeilError::Configuration(format!("Invalid VEIL_SLUG_LENGTH value: {val}"))
        })?;
        config.anonymization.slug_length = Some(parsed);
    }

    if let Ok(val) = std::env::var("VEIL_BATCH_SIZE") {
        let parsed = val.parse::<usize>().map_err(|_| {
            VeilError::Configuration(format!("Invalid VEIL_BATCH_SIZE value: {val}"))
        })?;
        config.anonymization.batch_size = parsed;
    }

    if let Ok(val) = std::env::var("VEIL_DB_PATH") {
        config.registry.db_path = val.into();
    }

    if let Ok(val) = std::env::var("VEIL_OUTPUT_DIR") {
        config.output.dir = val.into();
    }

    Ok(())
}

/// Validate cross-field constraints
fn validate(config: &VeilConfig) -> Result<()> {
    if let Some(len) = config.anonymization.slug_length {
        if !(1..=64).contains(&len) {
            return Err(VeilError::Configuration(format!(
                "slug_length must be between 1 and 64, got {len}"
            )));
        }
    }

    if config.anonymization.batch_size == 0 {
        return Err(VeilError::Configuration(
            "batch_size must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("VEIL_TEST_SUB", "substituted");
        let out = substitute_env_vars("value = \"${VEIL_TEST_SUB}\"").unwrap();
        assert_eq!(out, "value = \"substituted\"");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        let result = substitute_env_vars("value = \"${VEIL_TEST_DEFINITELY_UNSET}\"");
        assert!(matches!(result, Err(VeilError::Configuration(_))));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/veil.toml");
        assert!(matches!(result, Err(VeilError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[anonymization]\nlanguage = \"pt\"\nslug_length = 8\nallow_list = [\"keepme\"]"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.anonymization.language, "pt");
        assert_eq!(config.anonymization.slug_length, Some(8));
        assert_eq!(config.anonymization.allow_list, vec!["keepme".to_string()]);
    }

    #[test]
    fn test_slug_length_out_of_range() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[anonymization]\nslug_length = 65").unwrap();
        let result = load_config(file.path());
        assert!(matches!(result, Err(VeilError::Configuration(_))));
    }

    #[test]
    fn test_load_or_default_absent() {
        let config = load_or_default("/nonexistent/veil.toml").unwrap();
        assert_eq!(config.anonymization.language, "en");
    }
}
