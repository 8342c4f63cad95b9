//! Entity data models
//!
//! Types describing detected sensitive spans, the persisted registry rows
//! they map to, and the per-run counters the orchestrator maintains.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Entity type universe supported by the detector
///
/// Wire names are SCREAMING_SNAKE_CASE and appear verbatim inside redaction
/// tokens (`[EMAIL_ADDRESS_ab12...]`) and in the registry's `entity_type`
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// Person names
    Person,
    /// Geographic locations
    Location,
    /// Organization names
    Organization,
    /// Email addresses
    EmailAddress,
    /// Telephone numbers
    PhoneNumber,
    /// Web URLs
    Url,
    /// IPv4/IPv6 addresses
    IpAddress,
    /// Hostnames (FQDN, certificate CN, bare hex hosts)
    Hostname,
    /// Cryptographic digests (SHA-256, colon-separated fingerprints)
    Hash,
    /// UUIDs (report IDs, task IDs)
    Uuid,
    /// Certificate serial numbers (40-char hex)
    CertSerial,
    /// CPE identifier strings
    CpeString,
    /// Base64 certificate bodies
    CertBody,
}

impl EntityType {
    /// All supported entity types, in a stable order
    pub const ALL: [EntityType; 13] = [
        Self::Person,
        Self::Location,
        Self::Organization,
        Self::EmailAddress,
        Self::PhoneNumber,
        Self::Url,
        Self::IpAddress,
        Self::Hostname,
        Self::Hash,
        Self::Uuid,
        Self::CertSerial,
        Self::CpeString,
        Self::CertBody,
    ];

    /// Wire name used in tokens and in the registry
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Location => "LOCATION",
            Self::Organization => "ORGANIZATION",
            Self::EmailAddress => "EMAIL_ADDRESS",
            Self::PhoneNumber => "PHONE_NUMBER",
            Self::Url => "URL",
            Self::IpAddress => "IP_ADDRESS",
            Self::Hostname => "HOSTNAME",
            Self::Hash => "HASH",
            Self::Uuid => "UUID",
            Self::CertSerial => "CERT_SERIAL",
            Self::CpeString => "CPE_STRING",
            Self::CertBody => "CERT_BODY",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PERSON" => Ok(Self::Person),
            "LOCATION" | "GPE" => Ok(Self::Location),
            "ORGANIZATION" | "ORG" => Ok(Self::Organization),
            "EMAIL_ADDRESS" | "EMAIL" => Ok(Self::EmailAddress),
            "PHONE_NUMBER" | "PHONE" => Ok(Self::PhoneNumber),
            "URL" => Ok(Self::Url),
            "IP_ADDRESS" => Ok(Self::IpAddress),
            "HOSTNAME" => Ok(Self::Hostname),
            "HASH" => Ok(Self::Hash),
            "UUID" => Ok(Self::Uuid),
            "CERT_SERIAL" => Ok(Self::CertSerial),
            "CPE_STRING" => Ok(Self::CpeString),
            "CERT_BODY" => Ok(Self::CertBody),
            other => Err(format!("unknown entity type: {other}")),
        }
    }
}

/// A detected sensitive-text region
///
/// Produced per detector call; offsets are byte offsets into the analyzed
/// text. Ephemeral - spans never outlive the call that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedSpan {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Entity type of the match
    pub entity_type: EntityType,
    /// Confidence score (0.0 - 1.0)
    pub score: f32,
}

impl DetectedSpan {
    /// Create a new span
    pub fn new(start: usize, end: usize, entity_type: EntityType, score: f32) -> Self {
        Self {
            start,
            end,
            entity_type,
            score,
        }
    }

    /// Whether this span overlaps another
    pub fn overlaps(&self, other: &DetectedSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One entity emitted by the slug generator, queued for a registry write
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedEntity {
    /// Entity type of the match
    pub entity_type: EntityType,
    /// Whitespace-normalized original text
    pub normalized_text: String,
    /// Token body, possibly truncated
    pub display_hash: String,
    /// Canonical 64-hex-char keyed hash (registry identity)
    pub full_hash: String,
}

/// A persisted registry row
///
/// `full_hash` is the sole identity key. `original_text` and `display_hash`
/// are immutable after first insertion; only `last_seen` advances on repeat
/// observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Entity type as stored (wire name)
    pub entity_type: String,
    /// Whitespace-normalized original text
    pub original_text: String,
    /// Token body as stored
    pub display_hash: String,
    /// Canonical keyed hash, unique across the registry
    pub full_hash: String,
    /// ISO-8601 timestamp of first observation
    pub first_seen: String,
    /// ISO-8601 timestamp of most recent observation
    pub last_seen: String,
}

/// Per-run entity counters
///
/// Owned by an orchestrator instance; accumulates across every call on that
/// instance and resets with it. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct RunCounters {
    /// Total entities replaced during this run
    pub total_entities_processed: u64,
    /// Replacements by entity type
    pub entity_counts: HashMap<EntityType, u64>,
}

impl RunCounters {
    /// Record one replacement
    pub fn record(&mut self, entity_type: EntityType) {
        self.total_entities_processed += 1;
        *self.entity_counts.entry(entity_type).or_insert(0) += 1;
    }

    /// Counts sorted by wire name, for stable reporting
    pub fn sorted_counts(&self) -> Vec<(EntityType, u64)> {
        let mut counts: Vec<_> = self.entity_counts.iter().map(|(k, v)| (*k, *v)).collect();
        counts.sort_by_key(|(k, _)| k.as_str());
        counts
    }
}
