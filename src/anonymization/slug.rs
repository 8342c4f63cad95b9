//! Deterministic keyed slug generation
//!
//! Replaces matched text with a bracket-delimited redaction token whose body
//! is an HMAC-SHA256 of the whitespace-normalized text under the process
//! secret key. The same key, text and entity type always produce the same
//! token, across processes and runs - that determinism is what lets the
//! registry deduplicate by content.

use crate::config::secret::SecretString;
use crate::domain::{CollectedEntity, EntityType, Result, RunCounters, VeilError};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Collapse all whitespace runs to single spaces and trim the ends
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keyed slug generator
///
/// # Truncation caveat
///
/// A `slug_length` below 64 can make two different normalized strings
/// collide on the same displayed token. Reverse lookup by display hash then
/// returns whichever record matches first. This is an accepted limitation of
/// short slug lengths, not corrected here.
pub struct SlugGenerator {
    key: SecretString,
}

impl SlugGenerator {
    /// Create a generator from the process secret key
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the key is empty. The generator
    /// never proceeds without a key.
    pub fn new(key: SecretString) -> Result<Self> {
        if key.expose_secret().is_empty() {
            return Err(VeilError::Configuration(
                "secret key must not be empty".to_string(),
            ));
        }
        Ok(Self { key })
    }

    /// Canonical 64-hex-character keyed hash of already-normalized text
    pub fn full_hash(&self, normalized: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.key.expose_secret().as_ref().as_bytes())
            .expect("HMAC accepts keys of any size");
        mac.update(normalized.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Generate the redaction token for a matched span
    ///
    /// Normalizes `text`, computes the full and display hashes, appends the
    /// emitted entity to `collector` for the next registry write, bumps
    /// `counters`, and returns the literal `[{ENTITY_TYPE}_{display_hash}]`
    /// token.
    pub fn slug(
        &self,
        text: &str,
        entity_type: EntityType,
        slug_length: Option<usize>,
        collector: &mut Vec<CollectedEntity>,
        counters: &mut RunCounters,
    ) -> String {
        let normalized = normalize_ws(text);
        let full_hash = self.full_hash(&normalized);
        let display_hash = match slug_length {
            Some(len) => full_hash[..len.min(full_hash.len())].to_string(),
            None => full_hash.clone(),
        };

        collector.push(CollectedEntity {
            entity_type,
            normalized_text: normalized,
            display_hash: display_hash.clone(),
            full_hash,
        });
        counters.record(entity_type);

        format!("[{}_{}]", entity_type.as_str(), display_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret::secret_string;
    use test_case::test_case;

    fn generator() -> SlugGenerator {
        SlugGenerator::new(secret_string("test-key".to_string())).unwrap()
    }

    #[test_case("John   Doe", "John Doe" ; "inner runs collapse")]
    #[test_case("  trimmed  ", "trimmed" ; "ends trimmed")]
    #[test_case("one\ntwo\tthree", "one two three" ; "newlines and tabs")]
    #[test_case("", "" ; "empty stays empty")]
    fn test_normalize_ws(input: &str, expected: &str) {
        assert_eq!(normalize_ws(input), expected);
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = SlugGenerator::new(secret_string(String::new()));
        assert!(matches!(result, Err(VeilError::Configuration(_))));
    }

    #[test]
    fn test_determinism() {
        let gen = generator();
        let mut collector = Vec::new();
        let mut counters = RunCounters::default();

        let a = gen.slug("John Doe", EntityType::Person, None, &mut collector, &mut counters);
        let b = gen.slug("John Doe", EntityType::Person, None, &mut collector, &mut counters);
        assert_eq!(a, b);

        // Normalization feeds the hash, so spacing variants converge.
        let c = gen.slug("John\n  Doe", EntityType::Person, None, &mut collector, &mut counters);
        assert_eq!(a, c);
    }

    #[test]
    fn test_token_format() {
        let gen = generator();
        let mut collector = Vec::new();
        let mut counters = RunCounters::default();

        let token = gen.slug(
            "test@example.com",
            EntityType::EmailAddress,
            None,
            &mut collector,
            &mut counters,
        );
        assert!(token.starts_with("[EMAIL_ADDRESS_"));
        assert!(token.ends_with(']'));

        let body = &token["[EMAIL_ADDRESS_".len()..token.len() - 1];
        assert_eq!(body.len(), 64);
        assert!(body.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_display_hash_truncation() {
        let gen = generator();
        let mut collector = Vec::new();
        let mut counters = RunCounters::default();

        gen.slug("value", EntityType::Hostname, Some(8), &mut collector, &mut counters);
        let entity = &collector[0];
        assert_eq!(entity.display_hash.len(), 8);
        assert_eq!(entity.full_hash.len(), 64);
        assert!(entity.full_hash.starts_with(&entity.display_hash));
    }

    #[test]
    fn test_collector_and_counters() {
        let gen = generator();
        let mut collector = Vec::new();
        let mut counters = RunCounters::default();

        gen.slug("a", EntityType::Person, None, &mut collector, &mut counters);
        gen.slug("b", EntityType::Person, None, &mut collector, &mut counters);
        gen.slug("c", EntityType::Url, None, &mut collector, &mut counters);

        assert_eq!(collector.len(), 3);
        assert_eq!(counters.total_entities_processed, 3);
        assert_eq!(counters.entity_counts[&EntityType::Person], 2);
        assert_eq!(counters.entity_counts[&EntityType::Url], 1);
    }

    #[test]
    fn test_different_keys_differ() {
        let gen1 = generator();
        let gen2 = SlugGenerator::new(secret_string("other-key".to_string())).unwrap();
        assert_ne!(gen1.full_hash("same text"), gen2.full_hash("same text"));
    }
}
