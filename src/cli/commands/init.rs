//! Init command implementation
//!
//! Writes a starter configuration file.

use crate::config::schema::EXAMPLE_CONFIG;
use crate::config::SECRET_KEY_VAR;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "veil.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("Use --force to overwrite");
            return Ok(2);
        }

        fs::write(&self.output, EXAMPLE_CONFIG)?;
        println!("Configuration file created: {}", self.output);
        println!();
        println!("Next steps:");
        println!("  1. Edit {} with your settings", self.output);
        println!("  2. Set the secret key: export {SECRET_KEY_VAR}=\"...\"");
        println!("  3. Anonymize something: veil run <file-or-directory>");
        Ok(0)
    }
}
