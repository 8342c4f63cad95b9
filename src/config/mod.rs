//! Configuration management
//!
//! Loads `veil.toml`, applies `VEIL_*` environment overrides, and handles
//! the process-wide secret key. The secret key is only ever read from the
//! environment, never from the config file.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_or_default};
pub use schema::{
    AnonymizationFileConfig, LoggingConfig, OutputConfig, RegistryConfig, VeilConfig,
};
pub use secret::{load_secret_key, secret_string, SecretString, SecretValue, SECRET_KEY_VAR};
