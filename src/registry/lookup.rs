//! Reverse token lookup
//!
//! Parses the strict `[{ENTITY_TYPE}_{display_hash}]` grammar and resolves
//! the display hash back to the stored original text.

use crate::domain::{EntityRecord, EntityType, Result, VeilError};
use crate::registry::store::EntityRegistry;
use regex::Regex;
use std::sync::OnceLock;

/// The two components of a redaction token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParts {
    /// Parsed entity type
    pub entity_type: EntityType,
    /// Lowercase hex display hash, 1 to 64 chars
    pub display_hash: String,
}

fn token_grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| {
        Regex::new(r"^\[([A-Z][A-Z0-9_]*)_([0-9a-f]{1,64})\]$").expect("valid token grammar")
    })
}

/// Parse a redaction token into its components
///
/// # Errors
///
/// Returns `InvalidToken` when the text does not match the token grammar or
/// names an unknown entity type.
pub fn parse_token(token: &str) -> Result<TokenParts> {
    let captures = token_grammar().captures(token).ok_or_else(|| {
        VeilError::InvalidToken(format!(
            "'{token}' is not a valid token (expected [ENTITY_TYPE_hash])"
        ))
    })?;

    let type_name = &captures[1];
    let entity_type = type_name
        .parse::<EntityType>()
        .map_err(|_| VeilError::InvalidToken(format!("unknown entity type '{type_name}'")))?;

    Ok(TokenParts {
        entity_type,
        display_hash: captures[2].to_string(),
    })
}

/// Resolve a token to its registry record
///
/// # Errors
///
/// `InvalidToken` for malformed tokens, `NotFound` when the display hash has
/// no registry row (wrong key, wrong database, or never-anonymized text).
pub fn lookup_token(registry: &EntityRegistry, token: &str) -> Result<EntityRecord> {
    let parts = parse_token(token)?;
    registry
        .find_by_display_hash(&parts.display_hash)?
        .ok_or_else(|| {
            VeilError::NotFound(format!(
                "no entity recorded for token '{token}' in this registry"
            ))
        })
}
