//! Domain entities - Point allocations owned by a character sheet

mod attribute_store;
mod skill_allocator;

pub use attribute_store::{AttributeChange, AttributeStore};
pub use skill_allocator::{SkillAllocator, SkillChange};
