//! Domain error types
//!
//! The error hierarchy for veil. All errors are domain-specific and don't
//! expose third-party types; external failures are converted to strings at
//! the boundary.

use thiserror::Error;

/// Main veil error type
#[derive(Debug, Error)]
pub enum VeilError {
    /// Configuration-related errors (missing secret key, bad slug length, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Entity registry errors
    #[error("Registry error: {0}")]
    Registry(String),

    /// Entity detection errors
    #[error("Detection error: {0}")]
    Detection(String),

    /// Document extraction/reconstruction errors
    #[error("Document error: {0}")]
    Document(String),

    /// Input container format not handled by any pipeline adapter
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Redaction token that doesn't match the `[TYPE_hash]` grammar
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Reverse lookup miss
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for VeilError {
    fn from(err: std::io::Error) -> Self {
        VeilError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VeilError {
    fn from(err: serde_json::Error) -> Self {
        VeilError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for VeilError {
    fn from(err: toml::de::Error) -> Self {
        VeilError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<rusqlite::Error> for VeilError {
    fn from(err: rusqlite::Error) -> Self {
        VeilError::Registry(err.to_string())
    }
}

impl From<csv::Error> for VeilError {
    fn from(err: csv::Error) -> Self {
        VeilError::Document(format!("CSV error: {err}"))
    }
}

impl From<quick_xml::Error> for VeilError {
    fn from(err: quick_xml::Error) -> Self {
        VeilError::Document(format!("XML error: {err}"))
    }
}

impl From<fancy_regex::Error> for VeilError {
    fn from(err: fancy_regex::Error) -> Self {
        VeilError::Detection(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VeilError::Configuration("VEIL_SECRET_KEY not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: VEIL_SECRET_KEY not set"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: VeilError = io_err.into();
        assert!(matches!(err, VeilError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: VeilError = json_err.into();
        assert!(matches!(err, VeilError::Serialization(_)));
    }

    #[test]
    fn test_implements_std_error() {
        let err = VeilError::NotFound("no such token".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
