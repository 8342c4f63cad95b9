//! Entities command implementation

use crate::domain::EntityType;
use clap::Args;

/// Arguments for the entities command
#[derive(Args, Debug)]
pub struct EntitiesArgs {}

impl EntitiesArgs {
    /// Print the supported entity types, one per line
    pub fn execute(&self) -> anyhow::Result<i32> {
        let mut names: Vec<&str> = EntityType::ALL.iter().map(EntityType::as_str).collect();
        names.sort_unstable();
        for name in names {
            println!("{name}");
        }
        Ok(0)
    }
}
