//! Skill point allocations bounded by the skill point budget

use std::collections::BTreeMap;
use std::sync::Arc;

use super::attribute_store::clamp_count;
use crate::domain::errors::CharacterError;
use crate::domain::value_objects::Catalog;

/// A skill allocation that actually moved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillChange {
    pub skill: String,
    pub previous: u32,
    pub current: u32,
}

/// Owns one spent-points value per catalog skill and the current budget
///
/// Invariant: `total_spent() <= max(0, budget)` after every operation.
#[derive(Debug, Clone)]
pub struct SkillAllocator {
    catalog: Arc<Catalog>,
    spent: Vec<u32>,
    budget: i32,
}

impl SkillAllocator {
    /// Nothing spent against `budget`
    pub fn new(catalog: Arc<Catalog>, budget: i32) -> Self {
        let spent = vec![0; catalog.skills.len()];
        Self {
            catalog,
            spent,
            budget,
        }
    }

    /// Populate from a name → points map and clamp to `budget`
    ///
    /// Returns the allocator and the number of points the clamp removed.
    pub fn from_values(catalog: Arc<Catalog>, values: &BTreeMap<String, u32>, budget: i32) -> (Self, u64) {
        let spent = catalog
            .skills
            .iter()
            .map(|skill| values.get(&skill.name).copied().unwrap_or(0))
            .collect();
        let mut allocator = Self {
            catalog,
            spent,
            budget,
        };
        let removed = allocator.clamp_to_budget(budget);
        (allocator, removed)
    }

    /// Spend or refund points on one skill
    ///
    /// Spending is refused when no points are available and is capped at the
    /// points that are; refunding is refused when the skill has nothing spent
    /// and floors at zero. Refusals are `Ok(None)`, never errors.
    pub fn adjust(&mut self, name: &str, delta: i64) -> Result<Option<SkillChange>, CharacterError> {
        let index = self
            .catalog
            .skill_index(name)
            .ok_or_else(|| CharacterError::UnknownSkill(name.to_string()))?;

        let previous = self.spent[index];
        let current = if delta > 0 {
            let available = self.available_points();
            if available == 0 {
                return Ok(None);
            }
            let granted = delta.min(i64::try_from(available).unwrap_or(i64::MAX));
            clamp_count(i64::from(previous).saturating_add(granted))
        } else if delta < 0 {
            if previous == 0 {
                return Ok(None);
            }
            clamp_count(i64::from(previous).saturating_add(delta))
        } else {
            return Ok(None);
        };

        if current == previous {
            return Ok(None);
        }
        self.spent[index] = current;

        Ok(Some(SkillChange {
            skill: name.to_string(),
            previous,
            current,
        }))
    }

    /// Adopt a new budget, removing points if current spend exceeds it
    ///
    /// Removal always drains skills in catalog order: the first skill with
    /// points left loses one, then again, until the excess is gone. Earlier
    /// skills are emptied completely before later ones are touched. This is
    /// not a fair or proportional policy; it is kept because it is the
    /// observable behaviour players have saved builds against, and it must
    /// stay reproducible. Returns the number of points removed.
    pub fn clamp_to_budget(&mut self, new_budget: i32) -> u64 {
        self.budget = new_budget;

        let total = self.total_spent();
        let allowed = u64::try_from(new_budget).unwrap_or(0);
        if total <= allowed {
            return 0;
        }

        let mut excess = total - allowed;
        let mut removed = 0;
        // One skill at a time in declared order; taking `min(spent, excess)`
        // at once is the same as removing single points from the first
        // non-empty skill. A pass that reaches the end has emptied them all.
        for points in self.spent.iter_mut() {
            if excess == 0 {
                break;
            }
            let take = u64::from(*points).min(excess);
            // take <= *points, so this fits in u32
            *points -= take as u32;
            excess -= take;
            removed += take;
        }
        removed
    }

    pub fn budget(&self) -> i32 {
        self.budget
    }

    /// Recounted on every call so there is no running total to drift
    pub fn total_spent(&self) -> u64 {
        self.spent.iter().map(|v| u64::from(*v)).sum()
    }

    /// `max(0, budget - total_spent)`
    pub fn available_points(&self) -> u64 {
        let remaining = i64::from(self.budget) - i64::try_from(self.total_spent()).unwrap_or(i64::MAX);
        u64::try_from(remaining).unwrap_or(0)
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.catalog.skill_index(name).map(|i| self.spent[i])
    }

    /// Spent points in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.catalog
            .skills
            .iter()
            .map(|skill| skill.name.as_str())
            .zip(self.spent.iter().copied())
    }

    pub fn to_map(&self) -> BTreeMap<String, u32> {
        self.iter().map(|(name, points)| (name.to_string(), points)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::SkillDefinition;

    fn abc_catalog() -> Arc<Catalog> {
        let mut catalog = Catalog::standard();
        catalog.skills = vec![
            SkillDefinition::new("A", "Dexterity"),
            SkillDefinition::new("B", "Wisdom"),
            SkillDefinition::new("C", "Intelligence"),
        ];
        Arc::new(catalog)
    }

    fn allocator_with(budget: i32, points: &[(&str, u32)]) -> SkillAllocator {
        let values: BTreeMap<String, u32> = points.iter().map(|(n, p)| (n.to_string(), *p)).collect();
        let (allocator, removed) = SkillAllocator::from_values(abc_catalog(), &values, budget);
        assert_eq!(removed, 0);
        allocator
    }

    #[test]
    fn test_clamp_drains_earliest_skills_first() {
        let mut allocator = allocator_with(5, &[("A", 3), ("B", 2), ("C", 0)]);

        let removed = allocator.clamp_to_budget(1);

        assert_eq!(removed, 4);
        assert_eq!(allocator.get("A"), Some(0));
        assert_eq!(allocator.get("B"), Some(1));
        assert_eq!(allocator.get("C"), Some(0));
        assert_eq!(allocator.budget(), 1);
    }

    #[test]
    fn test_clamp_within_budget_is_a_no_op() {
        let mut allocator = allocator_with(10, &[("A", 2), ("C", 4)]);

        assert_eq!(allocator.clamp_to_budget(6), 0);
        assert_eq!(allocator.to_map()["C"], 4);
        assert_eq!(allocator.budget(), 6);
    }

    #[test]
    fn test_clamp_to_negative_budget_empties_everything() {
        let mut allocator = allocator_with(10, &[("A", 1), ("B", 2), ("C", 3)]);

        let removed = allocator.clamp_to_budget(-10);

        assert_eq!(removed, 6);
        assert_eq!(allocator.total_spent(), 0);
        assert_eq!(allocator.available_points(), 0);
    }

    #[test]
    fn test_spend_refused_without_available_points() {
        let mut allocator = allocator_with(2, &[("A", 2)]);

        assert_eq!(allocator.adjust("B", 1).unwrap(), None);
        assert_eq!(allocator.total_spent(), 2);
    }

    #[test]
    fn test_spend_is_capped_at_available_points() {
        let mut allocator = allocator_with(5, &[("A", 2)]);

        let change = allocator.adjust("C", 10).unwrap().unwrap();

        assert_eq!(change.current, 3);
        assert_eq!(allocator.available_points(), 0);
    }

    #[test]
    fn test_refund_refused_at_zero_and_floors() {
        let mut allocator = allocator_with(5, &[("A", 2)]);

        assert_eq!(allocator.adjust("B", -1).unwrap(), None);

        let change = allocator.adjust("A", -7).unwrap().unwrap();
        assert_eq!(change.previous, 2);
        assert_eq!(change.current, 0);
        assert_eq!(allocator.available_points(), 5);
    }

    #[test]
    fn test_negative_budget_allows_no_spending() {
        let mut allocator = SkillAllocator::new(abc_catalog(), -10);

        assert_eq!(allocator.available_points(), 0);
        assert_eq!(allocator.adjust("A", 1).unwrap(), None);
    }

    #[test]
    fn test_unknown_skill_is_an_error() {
        let mut allocator = allocator_with(5, &[]);
        assert_eq!(
            allocator.adjust("Juggling", 1),
            Err(CharacterError::UnknownSkill("Juggling".to_string()))
        );
    }

    #[test]
    fn test_from_values_clamps_overspent_load() {
        let values = BTreeMap::from([("B".to_string(), 4), ("C".to_string(), 4)]);

        let (allocator, removed) = SkillAllocator::from_values(abc_catalog(), &values, 5);

        assert_eq!(removed, 3);
        assert_eq!(allocator.get("B"), Some(1));
        assert_eq!(allocator.get("C"), Some(4));
    }

    #[test]
    fn test_budget_invariant_under_mixed_operations() {
        let mut allocator = allocator_with(6, &[]);
        let script: &[(&str, i64)] = &[("A", 1), ("B", 3), ("C", 5), ("A", -1), ("C", 2), ("B", 1)];

        for (skill, delta) in script {
            allocator.adjust(skill, *delta).unwrap();
            assert!(allocator.total_spent() <= 6);
        }
        allocator.clamp_to_budget(2);
        assert!(allocator.total_spent() <= 2);
    }
}
