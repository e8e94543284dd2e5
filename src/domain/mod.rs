//! Domain layer - Core character-building rules with no I/O
//!
//! This layer contains:
//! - Value Objects: Catalog, CharacterRecord, modifiers, identifiers
//! - Entities: AttributeStore, SkillAllocator
//! - Aggregates: CharacterSheet, which ties budget recompute to clamping
//! - Domain Services: Class eligibility and skill checks
//! - Errors: Catalog name lookups

pub mod aggregates;
pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
