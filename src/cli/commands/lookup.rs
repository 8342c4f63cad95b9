//! Lookup command implementation
//!
//! Resolves a redaction token back to the original text recorded in the
//! entity registry.

use crate::config::{load_or_default, load_secret_key};
use crate::domain::VeilError;
use crate::registry::{lookup_token, EntityRegistry};
use anyhow::Context;
use clap::Args;

/// Arguments for the lookup command
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Redaction token, e.g. [EMAIL_ADDRESS_ab12cd34]
    pub token: String,
}

impl LookupArgs {
    /// Execute the lookup command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = load_or_default(config_path).context("failed to load configuration")?;

        // The key itself is not needed to query, but refusing to run without
        // it keeps lookup gated the same way as anonymization.
        load_secret_key().context("secret key is required")?;

        if !config.registry.db_path.exists() {
            eprintln!(
                "Registry database not found: {}",
                config.registry.db_path.display()
            );
            eprintln!("Run an anonymization first, or point --config at the right registry");
            return Ok(2);
        }

        let registry = EntityRegistry::open(&config.registry.db_path)
            .context("failed to open entity registry")?;

        match lookup_token(&registry, &self.token) {
            Ok(record) => {
                println!("Original text: {}", record.original_text);
                println!("Entity type:   {}", record.entity_type);
                println!("First seen:    {}", record.first_seen);
                println!("Last seen:     {}", record.last_seen);
                Ok(0)
            }
            Err(VeilError::InvalidToken(msg)) | Err(VeilError::NotFound(msg)) => {
                println!("{msg}");
                Ok(0)
            }
            Err(e) => Err(e.into()),
        }
    }
}
