//! Ability modifiers and the skill point budget derived from them

/// Skill points granted before the budget attribute's modifier is applied
pub const BASE_SKILL_POINTS: i32 = 10;

/// Skill points granted per point of budget attribute modifier
pub const SKILL_POINTS_PER_MODIFIER: i32 = 4;

/// Ability modifier for an attribute value: `floor((value - 10) / 2)`
///
/// Uses euclidean division so odd values below ten round toward negative
/// infinity (9 gives -1, not 0).
pub fn ability_modifier(value: u32) -> i32 {
    let value = i64::from(value);
    let modifier = (value - 10).div_euclid(2);
    i32::try_from(modifier).unwrap_or(i32::MAX)
}

/// Total allocatable skill points for a given budget attribute value
///
/// `10 + 4 * modifier(value)`. Negative for values below 3; callers treat
/// a negative budget as zero available points.
pub fn skill_budget(budget_attribute_value: u32) -> i32 {
    BASE_SKILL_POINTS
        .saturating_add(SKILL_POINTS_PER_MODIFIER.saturating_mul(ability_modifier(budget_attribute_value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_table() {
        assert_eq!(ability_modifier(0), -5);
        assert_eq!(ability_modifier(1), -5);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(12), 1);
        assert_eq!(ability_modifier(20), 5);
    }

    #[test]
    fn test_modifier_large_values_do_not_overflow() {
        assert_eq!(ability_modifier(u32::MAX), ((u32::MAX as i64 - 10) / 2) as i32);
        assert!(skill_budget(u32::MAX) > 0);
    }

    #[test]
    fn test_skill_budget_follows_intelligence() {
        assert_eq!(skill_budget(10), 10);
        assert_eq!(skill_budget(20), 30);
        assert_eq!(skill_budget(8), 6);
        assert_eq!(skill_budget(0), -10);
    }
}
