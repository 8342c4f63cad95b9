//! Core domain types and models
//!
//! This module contains the domain types shared across the anonymization
//! engine, the entity registry, and the structural document pipeline.

pub mod entity;
pub mod errors;
pub mod result;
pub mod unit;

pub use entity::{CollectedEntity, DetectedSpan, EntityRecord, EntityType, RunCounters};
pub use errors::VeilError;
pub use result::Result;
pub use unit::{StructuralUnit, UnitPosition};
