//! Static attribute, skill and class catalog
//!
//! The catalog is injected at startup and never mutated. Declared order is
//! significant: attributes and skills are displayed in it, and skill
//! clamping drains skills in it.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Attribute whose modifier drives the skill point budget unless overridden
pub const DEFAULT_BUDGET_ATTRIBUTE: &str = "Intelligence";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Catalog declares no attributes")]
    NoAttributes,
    #[error("Duplicate catalog entry: {0}")]
    Duplicate(String),
    #[error("Budget attribute '{0}' is not a catalog attribute")]
    UnknownBudgetAttribute(String),
    #[error("Skill '{skill}' is governed by unknown attribute '{attribute}'")]
    UnknownGoverningAttribute { skill: String, attribute: String },
    #[error("Class '{class}' requires unknown attribute '{attribute}'")]
    UnknownRequirement { class: String, attribute: String },
}

/// A skill and the attribute that governs its modifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDefinition {
    pub name: String,
    #[serde(alias = "governingAttribute")]
    pub attribute_modifier: String,
}

impl SkillDefinition {
    pub fn new(name: impl Into<String>, attribute_modifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute_modifier: attribute_modifier.into(),
        }
    }
}

/// A class and its minimum attribute values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: String,
    #[serde(default)]
    pub requirements: BTreeMap<String, u32>,
}

impl ClassDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirements: BTreeMap::new(),
        }
    }

    pub fn with_requirement(mut self, attribute: impl Into<String>, minimum: u32) -> Self {
        self.requirements.insert(attribute.into(), minimum);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub attributes: Vec<String>,
    pub skills: Vec<SkillDefinition>,
    pub classes: Vec<ClassDefinition>,
    #[serde(default = "default_budget_attribute")]
    pub budget_attribute: String,
}

fn default_budget_attribute() -> String {
    DEFAULT_BUDGET_ATTRIBUTE.to_string()
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// The six classic attributes, eighteen skills and three starter classes
    pub fn standard() -> Self {
        let attributes: Vec<String> = [
            "Strength",
            "Dexterity",
            "Constitution",
            "Intelligence",
            "Wisdom",
            "Charisma",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let skills = [
            ("Acrobatics", "Dexterity"),
            ("Animal Handling", "Wisdom"),
            ("Arcana", "Intelligence"),
            ("Athletics", "Strength"),
            ("Deception", "Charisma"),
            ("History", "Intelligence"),
            ("Insight", "Wisdom"),
            ("Intimidation", "Charisma"),
            ("Investigation", "Intelligence"),
            ("Medicine", "Wisdom"),
            ("Nature", "Intelligence"),
            ("Perception", "Wisdom"),
            ("Performance", "Charisma"),
            ("Persuasion", "Charisma"),
            ("Religion", "Intelligence"),
            ("Sleight of Hand", "Dexterity"),
            ("Stealth", "Dexterity"),
            ("Survival", "Wisdom"),
        ]
        .into_iter()
        .map(|(name, attribute)| SkillDefinition::new(name, attribute))
        .collect();

        let starter_class = |name: &str, primary: &str| {
            attributes.iter().fold(ClassDefinition::new(name), |class, attribute| {
                let minimum = if attribute == primary { 14 } else { 9 };
                class.with_requirement(attribute.clone(), minimum)
            })
        };
        let classes = vec![
            starter_class("Barbarian", "Strength"),
            starter_class("Wizard", "Intelligence"),
            starter_class("Bard", "Charisma"),
        ];

        Self {
            attributes,
            skills,
            classes,
            budget_attribute: default_budget_attribute(),
        }
    }

    /// Parse and validate a JSON catalog
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Structural checks only: names are unique and every reference resolves
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.attributes.is_empty() {
            return Err(CatalogError::NoAttributes);
        }

        let mut seen = HashSet::new();
        for attribute in &self.attributes {
            if !seen.insert(attribute.as_str()) {
                return Err(CatalogError::Duplicate(attribute.clone()));
            }
        }
        if !seen.contains(self.budget_attribute.as_str()) {
            return Err(CatalogError::UnknownBudgetAttribute(
                self.budget_attribute.clone(),
            ));
        }

        let mut skill_names = HashSet::new();
        for skill in &self.skills {
            if !skill_names.insert(skill.name.as_str()) {
                return Err(CatalogError::Duplicate(skill.name.clone()));
            }
            if !seen.contains(skill.attribute_modifier.as_str()) {
                return Err(CatalogError::UnknownGoverningAttribute {
                    skill: skill.name.clone(),
                    attribute: skill.attribute_modifier.clone(),
                });
            }
        }

        let mut class_names = HashSet::new();
        for class in &self.classes {
            if !class_names.insert(class.name.as_str()) {
                return Err(CatalogError::Duplicate(class.name.clone()));
            }
            if let Some(attribute) = class.requirements.keys().find(|a| !seen.contains(a.as_str())) {
                return Err(CatalogError::UnknownRequirement {
                    class: class.name.clone(),
                    attribute: attribute.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a == name)
    }

    pub fn skill_index(&self, name: &str) -> Option<usize> {
        self.skills.iter().position(|s| s.name == name)
    }

    pub fn class(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn skill(&self, name: &str) -> Option<&SkillDefinition> {
        self.skills.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = Catalog::standard();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.attributes.len(), 6);
        assert_eq!(catalog.skills.len(), 18);
        assert_eq!(catalog.skills[0].name, "Acrobatics");
        assert_eq!(catalog.budget_attribute, "Intelligence");
    }

    #[test]
    fn test_standard_classes() {
        let catalog = Catalog::standard();
        let wizard = catalog.class("Wizard").unwrap();
        assert_eq!(wizard.requirements.get("Intelligence"), Some(&14));
        assert_eq!(wizard.requirements.get("Strength"), Some(&9));
        assert_eq!(wizard.requirements.len(), 6);
        assert!(catalog.class("Paladin").is_none());
    }

    #[test]
    fn test_from_json_accepts_governing_attribute_alias() {
        let json = r#"{
            "attributes": ["Might", "Wits"],
            "skills": [{"name": "Lifting", "governingAttribute": "Might"}],
            "classes": [{"name": "Brute", "requirements": {"Might": 12}}],
            "budgetAttribute": "Wits"
        }"#;

        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.skills[0].attribute_modifier, "Might");
        assert_eq!(catalog.budget_attribute, "Wits");
    }

    #[test]
    fn test_validate_rejects_dangling_references() {
        let mut catalog = Catalog::standard();
        catalog.budget_attribute = "Luck".to_string();
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::UnknownBudgetAttribute(name)) if name == "Luck"
        ));

        let mut catalog = Catalog::standard();
        catalog.skills.push(SkillDefinition::new("Gambling", "Luck"));
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::UnknownGoverningAttribute { .. })
        ));

        let mut catalog = Catalog::standard();
        catalog.classes.push(ClassDefinition::new("Rogue").with_requirement("Luck", 10));
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::UnknownRequirement { .. })
        ));

        let mut catalog = Catalog::standard();
        catalog.attributes.push("Strength".to_string());
        assert!(matches!(catalog.validate(), Err(CatalogError::Duplicate(_))));
    }

    #[test]
    fn test_from_json_rejects_empty_attributes() {
        let json = r#"{"attributes": [], "skills": [], "classes": []}"#;
        assert!(matches!(Catalog::from_json(json), Err(CatalogError::NoAttributes)));
    }
}
