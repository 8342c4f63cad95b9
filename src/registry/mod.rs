//! Persistent entity registry
//!
//! SQLite-backed mapping from keyed hashes to the original text they
//! replaced. The full hash is the identity key; writes are batched and
//! idempotent, reads serve the reverse-lookup surface.

pub mod lookup;
pub mod store;

pub use lookup::{lookup_token, parse_token, TokenParts};
pub use store::{EntityRegistry, UpsertOutcome};
