//! Domain services - Pure rules evaluated against a character sheet

mod class_eligibility;
mod skill_check;

pub use class_eligibility::is_eligible;
pub use skill_check::{resolve_skill_check, SkillCheck, CHECK_DIE};
