//! Character sheet aggregate
//!
//! Owns the attribute store, the skill allocator and the class selection,
//! and is the only place where an attribute change feeds into the skill
//! budget. The two stores never call each other; the sheet runs the
//! recompute-then-clamp step explicitly after a budget attribute moves.

use std::sync::Arc;

use crate::domain::entities::{AttributeChange, AttributeStore, SkillAllocator, SkillChange};
use crate::domain::errors::CharacterError;
use crate::domain::services::is_eligible;
use crate::domain::value_objects::{
    ability_modifier, skill_budget, Catalog, CharacterRecord, ClassDefinition, SkillDefinition,
};

/// How the skill budget moved as a result of an attribute change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetChange {
    pub previous: i32,
    pub current: i32,
    /// Points the clamp took back from skills
    pub skill_points_removed: u64,
}

/// Result of an attribute edit that changed something
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeAdjusted {
    pub change: AttributeChange,
    /// Present only when the budget attribute moved
    pub budget: Option<BudgetChange>,
}

#[derive(Debug, Clone)]
pub struct CharacterSheet {
    catalog: Arc<Catalog>,
    attributes: AttributeStore,
    skills: SkillAllocator,
    selected_class: Option<String>,
}

impl CharacterSheet {
    /// All-zero sheet with no class; the budget is the one a zero budget
    /// attribute derives
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let attributes = AttributeStore::new(catalog.clone());
        let budget = derived_budget(&catalog, &attributes);
        Self {
            skills: SkillAllocator::new(catalog.clone(), budget),
            attributes,
            selected_class: None,
            catalog,
        }
    }

    /// Rebuild a sheet from a (merged) record
    ///
    /// The budget is derived from the record's attributes and its stored
    /// `skillPoints` is ignored. Skills are clamped to that budget, so a
    /// record that was overspent comes back consistent. Returns the points
    /// that removed.
    pub fn from_record(catalog: Arc<Catalog>, record: &CharacterRecord) -> (Self, u64) {
        let attributes = AttributeStore::from_values(catalog.clone(), &record.attributes);
        let budget = derived_budget(&catalog, &attributes);
        let (skills, removed) = SkillAllocator::from_values(catalog.clone(), &record.skills, budget);
        let selected_class = record
            .selected_class
            .clone()
            .filter(|name| catalog.class(name).is_some());

        let sheet = Self {
            catalog,
            attributes,
            skills,
            selected_class,
        };
        (sheet, removed)
    }

    /// Adjust an attribute and, if it is the budget attribute, re-derive the
    /// budget and clamp skills to it
    pub fn adjust_attribute(&mut self, name: &str, delta: i64) -> Result<Option<AttributeAdjusted>, CharacterError> {
        let Some(change) = self.attributes.adjust(name, delta)? else {
            return Ok(None);
        };

        let budget = if change.attribute == self.catalog.budget_attribute {
            let previous = self.skills.budget();
            let current = skill_budget(change.current);
            let skill_points_removed = self.skills.clamp_to_budget(current);
            Some(BudgetChange {
                previous,
                current,
                skill_points_removed,
            })
        } else {
            None
        };

        Ok(Some(AttributeAdjusted { change, budget }))
    }

    pub fn adjust_skill(&mut self, name: &str, delta: i64) -> Result<Option<SkillChange>, CharacterError> {
        self.skills.adjust(name, delta)
    }

    /// Record the chosen class, eligible or not; `None` clears the choice
    ///
    /// Returns whether the selection changed.
    pub fn select_class(&mut self, name: Option<&str>) -> Result<bool, CharacterError> {
        if let Some(name) = name {
            if self.catalog.class(name).is_none() {
                return Err(CharacterError::UnknownClass(name.to_string()));
            }
        }
        if self.selected_class.as_deref() == name {
            return Ok(false);
        }
        self.selected_class = name.map(str::to_string);
        Ok(true)
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn skills(&self) -> &SkillAllocator {
        &self.skills
    }

    pub fn selected_class(&self) -> Option<&str> {
        self.selected_class.as_deref()
    }

    pub fn skill_budget(&self) -> i32 {
        self.skills.budget()
    }

    pub fn available_skill_points(&self) -> u64 {
        self.skills.available_points()
    }

    /// Spent points plus the governing attribute's modifier
    pub fn skill_total(&self, skill: &SkillDefinition) -> i64 {
        let points = self.skills.get(&skill.name).unwrap_or(0);
        i64::from(points) + i64::from(self.governing_modifier(skill))
    }

    pub fn governing_modifier(&self, skill: &SkillDefinition) -> i32 {
        ability_modifier(self.attributes.get(&skill.attribute_modifier).unwrap_or(0))
    }

    /// Every catalog class paired with its current eligibility
    pub fn class_eligibility(&self) -> impl Iterator<Item = (&ClassDefinition, bool)> + '_ {
        self.catalog
            .classes
            .iter()
            .map(move |class| (class, is_eligible(class, &self.attributes)))
    }

    pub fn to_record(&self) -> CharacterRecord {
        CharacterRecord {
            attributes: self.attributes.to_map(),
            skills: self.skills.to_map(),
            selected_class: self.selected_class.clone(),
            num: self.attributes.total_points(),
            skill_points: self.skills.budget(),
        }
    }
}

fn derived_budget(catalog: &Catalog, attributes: &AttributeStore) -> i32 {
    skill_budget(attributes.get(&catalog.budget_attribute).unwrap_or(0))
}
