use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::{SyncState, SyncStatus};
use crate::domain::aggregates::CharacterSheet;
use crate::domain::services::SkillCheck;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeViewDto {
    pub name: String,
    pub value: u32,
    pub modifier: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkillViewDto {
    pub name: String,
    pub attribute_modifier: String,
    pub points: u32,
    pub modifier: i32,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassViewDto {
    pub name: String,
    pub requirements: BTreeMap<String, u32>,
    pub eligible: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStateDto {
    NotLoaded,
    Loading,
    Loaded,
    Dirty,
    Saving,
}

impl From<SyncState> for SyncStateDto {
    fn from(value: SyncState) -> Self {
        match value {
            SyncState::NotLoaded => Self::NotLoaded,
            SyncState::Loading => Self::Loading,
            SyncState::Loaded => Self::Loaded,
            SyncState::Dirty => Self::Dirty,
            SyncState::Saving => Self::Saving,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusDto {
    pub state: SyncStateDto,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub saves: u64,
    pub suppressed_saves: u64,
}

impl From<SyncStatus> for SyncStatusDto {
    fn from(value: SyncStatus) -> Self {
        Self {
            state: value.state.into(),
            last_saved_at: value.last_saved_at,
            last_error: value.last_error,
            saves: value.saves,
            suppressed_saves: value.suppressed_saves,
        }
    }
}

/// Everything a client needs to render the builder and disable controls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CharacterViewDto {
    pub total_points: u64,
    pub skill_budget: i32,
    pub skill_points_spent: u64,
    pub available_skill_points: u64,
    pub attributes: Vec<AttributeViewDto>,
    pub skills: Vec<SkillViewDto>,
    pub classes: Vec<ClassViewDto>,
    pub selected_class: Option<String>,
    pub sync: SyncStatusDto,
}

impl CharacterViewDto {
    pub fn from_sheet(sheet: &CharacterSheet, sync: SyncStatus) -> Self {
        let attributes = sheet
            .attributes()
            .iter()
            .map(|(name, value)| AttributeViewDto {
                name: name.to_string(),
                value,
                modifier: sheet.attributes().modifier(name).unwrap_or_default(),
            })
            .collect();

        let skills = sheet
            .catalog()
            .skills
            .iter()
            .map(|skill| SkillViewDto {
                name: skill.name.clone(),
                attribute_modifier: skill.attribute_modifier.clone(),
                points: sheet.skills().get(&skill.name).unwrap_or(0),
                modifier: sheet.governing_modifier(skill),
                total: sheet.skill_total(skill),
            })
            .collect();

        let classes = sheet
            .class_eligibility()
            .map(|(class, eligible)| ClassViewDto {
                name: class.name.clone(),
                requirements: class.requirements.clone(),
                eligible,
                selected: sheet.selected_class() == Some(class.name.as_str()),
            })
            .collect();

        Self {
            total_points: sheet.attributes().total_points(),
            skill_budget: sheet.skill_budget(),
            skill_points_spent: sheet.skills().total_spent(),
            available_skill_points: sheet.available_skill_points(),
            attributes,
            skills,
            classes,
            selected_class: sheet.selected_class().map(str::to_string),
            sync: sync.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkillCheckDto {
    pub skill: String,
    pub dc: i64,
    pub roll: u32,
    pub skill_total: i64,
    pub total: i64,
    pub success: bool,
}

impl From<SkillCheck> for SkillCheckDto {
    fn from(value: SkillCheck) -> Self {
        Self {
            skill: value.skill,
            dc: value.dc,
            roll: value.roll,
            skill_total: value.skill_total,
            total: value.total,
            success: value.success,
        }
    }
}
