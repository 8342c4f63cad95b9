//! Secure secret-key handling using the secrecy crate
//!
//! The slug generator's HMAC key is held as a `Secret` so it is zeroed on
//! drop and redacted from Debug output. The key must be exposed explicitly
//! via `expose_secret()` at the single point where the HMAC is computed.

use crate::domain::{Result, VeilError};
use secrecy::{CloneableSecret, DebugSecret, Secret};
use zeroize::Zeroize;

/// Environment variable holding the process-wide secret key
pub const SECRET_KEY_VAR: &str = "VEIL_SECRET_KEY";

/// Newtype wrapper for String that implements the traits `Secret` requires
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Type alias for a secret string
pub type SecretString = Secret<SecretValue>;

/// Create a SecretString from a String
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Load the secret key from the environment
///
/// Fatal when the variable is unset or empty: nothing may be processed
/// without a key, and the generator never falls back to an unkeyed hash.
pub fn load_secret_key() -> Result<SecretString> {
    match std::env::var(SECRET_KEY_VAR) {
        Ok(val) if !val.trim().is_empty() => Ok(secret_string(val)),
        _ => Err(VeilError::Configuration(format!(
            "{SECRET_KEY_VAR} environment variable not set"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("test-key".to_string());
        assert_eq!(secret.expose_secret().as_ref(), "test-key");
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-key".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("sensitive-key"));
    }
}
