//! Value objects - Immutable objects defined by their attributes

mod catalog;
mod character_record;
mod ids;
mod modifier;

pub use catalog::{Catalog, ClassDefinition, SkillDefinition};
pub use character_record::CharacterRecord;
pub use ids::*;
pub use modifier::{ability_modifier, skill_budget};
