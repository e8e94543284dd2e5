//! Persisted character snapshot
//!
//! # Wire format
//!
//! The record service stores exactly this JSON shape, keyed by identity:
//! `{ attributes, skills, selectedClass, num, skillPoints }`. It is a
//! last-write-wins overwrite with no versioning.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::catalog::Catalog;
use super::modifier::skill_budget;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub attributes: BTreeMap<String, u32>,
    pub skills: BTreeMap<String, u32>,
    pub selected_class: Option<String>,
    /// Total attribute points
    pub num: u64,
    /// Skill point budget, always derived from the budget attribute
    pub skill_points: i32,
}

/// A field of a loaded record that could not be used as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeFallback {
    /// The whole field was absent or not of the expected JSON type
    Field(&'static str),
    /// A single attribute or skill entry was absent or not a valid count
    Entry { field: &'static str, name: String },
    /// `selectedClass` named a class the catalog does not have
    UnknownClass(String),
}

impl std::fmt::Display for MergeFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(field) => write!(f, "{} missing or malformed", field),
            Self::Entry { field, name } => write!(f, "{}.{} missing or malformed", field, name),
            Self::UnknownClass(name) => write!(f, "selectedClass '{}' not in catalog", name),
        }
    }
}

impl CharacterRecord {
    /// Catalog-derived zero record: every attribute and skill at 0, no class
    pub fn defaults(catalog: &Catalog) -> Self {
        Self {
            attributes: catalog.attributes.iter().map(|a| (a.clone(), 0)).collect(),
            skills: catalog.skills.iter().map(|s| (s.name.clone(), 0)).collect(),
            selected_class: None,
            num: 0,
            skill_points: skill_budget(0),
        }
    }

    /// True when nothing in the record is worth persisting
    ///
    /// The budget counts as default both at the value an all-zero sheet
    /// derives and at the zero a blank remote record carries.
    pub fn is_default(&self) -> bool {
        self.attributes.values().all(|v| *v == 0)
            && self.skills.values().all(|v| *v == 0)
            && self.selected_class.is_none()
            && self.num == 0
            && (self.skill_points == 0 || self.skill_points == skill_budget(0))
    }

    /// Merge a raw remote payload over the catalog defaults
    ///
    /// Every field and every entry is taken independently; anything absent
    /// or malformed keeps its default and is reported back. Keys the catalog
    /// does not know are dropped. `num` and `skillPoints` are always
    /// recomputed from the merged attributes rather than trusted.
    pub fn merge_with_defaults(catalog: &Catalog, payload: &Value) -> (Self, Vec<MergeFallback>) {
        let mut record = Self::defaults(catalog);
        let mut fallbacks = Vec::new();

        let Some(object) = payload.as_object() else {
            fallbacks.push(MergeFallback::Field("record"));
            return (record, fallbacks);
        };

        merge_counts(object.get("attributes"), "attributes", &mut record.attributes, &mut fallbacks);
        merge_counts(object.get("skills"), "skills", &mut record.skills, &mut fallbacks);

        match object.get("selectedClass") {
            None | Some(Value::Null) => {}
            Some(Value::String(name)) if catalog.class(name).is_some() => {
                record.selected_class = Some(name.clone());
            }
            Some(Value::String(name)) => fallbacks.push(MergeFallback::UnknownClass(name.clone())),
            Some(_) => fallbacks.push(MergeFallback::Field("selectedClass")),
        }

        record.num = record.attributes.values().map(|v| u64::from(*v)).sum();
        record.skill_points = skill_budget(
            record
                .attributes
                .get(&catalog.budget_attribute)
                .copied()
                .unwrap_or(0),
        );

        (record, fallbacks)
    }
}

fn merge_counts(
    source: Option<&Value>,
    field: &'static str,
    target: &mut BTreeMap<String, u32>,
    fallbacks: &mut Vec<MergeFallback>,
) {
    let Some(entries) = source.and_then(Value::as_object) else {
        fallbacks.push(MergeFallback::Field(field));
        return;
    };

    for (name, value) in target.iter_mut() {
        match entries
            .get(name)
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
        {
            Some(count) => *value = count,
            None => fallbacks.push(MergeFallback::Entry {
                field,
                name: name.clone(),
            }),
        }
    }
}
