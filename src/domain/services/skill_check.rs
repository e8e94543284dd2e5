//! d20 skill checks against a difficulty class

use crate::domain::aggregates::CharacterSheet;
use crate::domain::errors::CharacterError;

/// Sides on the check die
pub const CHECK_DIE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCheck {
    pub skill: String,
    pub dc: i64,
    pub roll: u32,
    /// Spent points plus governing modifier at the time of the roll
    pub skill_total: i64,
    pub total: i64,
    pub success: bool,
}

/// Resolve a check for an already-rolled die; success is `roll + skill >= dc`
pub fn resolve_skill_check(
    sheet: &CharacterSheet,
    skill: &str,
    dc: i64,
    roll: u32,
) -> Result<SkillCheck, CharacterError> {
    let definition = sheet
        .catalog()
        .skill(skill)
        .ok_or_else(|| CharacterError::UnknownSkill(skill.to_string()))?;

    let skill_total = sheet.skill_total(definition);
    let total = i64::from(roll) + skill_total;

    Ok(SkillCheck {
        skill: definition.name.clone(),
        dc,
        roll,
        skill_total,
        total,
        success: total >= dc,
    })
}
