//! Character Session - The builder's top-level use cases
//!
//! Owns the character sheet and its persistence sync for one identity.
//! Every edit runs against the sheet under a write lock and, if it changed
//! anything, hands the new record snapshot to the sync for a debounced save.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::application::dto::{CharacterViewDto, SkillCheckDto};
use crate::application::ports::outbound::CharacterRecordPort;
use crate::application::services::persistence_sync::{PersistenceSync, SyncStatus, DEFAULT_SAVE_DEBOUNCE};
use crate::domain::aggregates::CharacterSheet;
use crate::domain::errors::CharacterError;
use crate::domain::services::{resolve_skill_check, CHECK_DIE};
use crate::domain::value_objects::{Catalog, SessionId};

/// Per-session settings
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Identity the record is stored under
    pub identity: String,
    pub save_debounce: Duration,
    /// Upper bound on total attribute points; `None` for no bound
    pub attribute_point_cap: Option<u64>,
}

impl SessionOptions {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            save_debounce: DEFAULT_SAVE_DEBOUNCE,
            attribute_point_cap: None,
        }
    }

    pub fn with_save_debounce(mut self, delay: Duration) -> Self {
        self.save_debounce = delay;
        self
    }

    pub fn with_attribute_point_cap(mut self, cap: Option<u64>) -> Self {
        self.attribute_point_cap = cap;
        self
    }
}

pub struct CharacterSession {
    id: SessionId,
    catalog: Arc<Catalog>,
    sheet: RwLock<CharacterSheet>,
    sync: PersistenceSync,
    attribute_point_cap: Option<u64>,
}

impl CharacterSession {
    pub fn new(catalog: Arc<Catalog>, port: Arc<dyn CharacterRecordPort>, options: SessionOptions) -> Self {
        let id = SessionId::new();
        Self {
            id,
            sheet: RwLock::new(CharacterSheet::new(catalog.clone())),
            sync: PersistenceSync::new(id, port, options.identity, options.save_debounce),
            attribute_point_cap: options.attribute_point_cap,
            catalog,
        }
    }

    /// Load the stored record into the sheet
    ///
    /// Holds the sheet lock for the whole load so no edit can interleave
    /// with it; nothing populated here is reported as a change.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn start(&self) {
        let mut sheet = self.sheet.write().await;
        let record = self.sync.load(&self.catalog).await;
        let (loaded, removed) = CharacterSheet::from_record(self.catalog.clone(), &record);
        if removed > 0 {
            warn!(removed, budget = loaded.skill_budget(), "Stored skills exceeded their budget and were clamped");
        }
        *sheet = loaded;
        info!(
            total_points = sheet.attributes().total_points(),
            skill_budget = sheet.skill_budget(),
            "Character session ready"
        );
    }

    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn adjust_attribute(&self, name: &str, delta: i64) -> Result<CharacterViewDto, CharacterError> {
        let mut sheet = self.sheet.write().await;
        let delta = self.cap_attribute_delta(&sheet, delta);

        if let Some(adjusted) = sheet.adjust_attribute(name, delta)? {
            debug!(
                attribute = %adjusted.change.attribute,
                from = adjusted.change.previous,
                to = adjusted.change.current,
                "Attribute adjusted"
            );
            if let Some(budget) = &adjusted.budget {
                debug!(from = budget.previous, to = budget.current, "Skill budget recomputed");
                if budget.skill_points_removed > 0 {
                    info!(
                        removed = budget.skill_points_removed,
                        "Skill points reclaimed after budget shrank"
                    );
                }
            }
            self.sync.record_changed(sheet.to_record());
        }

        Ok(self.view_of(&sheet))
    }

    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn adjust_skill(&self, name: &str, delta: i64) -> Result<CharacterViewDto, CharacterError> {
        let mut sheet = self.sheet.write().await;

        if let Some(change) = sheet.adjust_skill(name, delta)? {
            debug!(skill = %change.skill, from = change.previous, to = change.current, "Skill adjusted");
            self.sync.record_changed(sheet.to_record());
        }

        Ok(self.view_of(&sheet))
    }

    /// Record the chosen class; eligibility is not checked
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn select_class(&self, name: Option<&str>) -> Result<CharacterViewDto, CharacterError> {
        let mut sheet = self.sheet.write().await;

        if sheet.select_class(name)? {
            debug!(class = ?name, "Class selection changed");
            self.sync.record_changed(sheet.to_record());
        }

        Ok(self.view_of(&sheet))
    }

    /// Roll a d20 check for a skill; read-only
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn roll_skill_check(&self, skill: &str, dc: i64) -> Result<SkillCheckDto, CharacterError> {
        let roll = rand::thread_rng().gen_range(1..=CHECK_DIE);
        let sheet = self.sheet.read().await;
        let check = resolve_skill_check(&sheet, skill, dc, roll)?;
        debug!(roll, total = check.total, success = check.success, "Skill check rolled");
        Ok(check.into())
    }

    pub async fn view(&self) -> CharacterViewDto {
        let sheet = self.sheet.read().await;
        self.view_of(&sheet)
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync.status()
    }

    /// Tear down: cancel any pending save and stop scheduling new ones
    pub fn close(&self) {
        info!(session = %self.id, "Closing character session");
        self.sync.close();
    }

    fn view_of(&self, sheet: &CharacterSheet) -> CharacterViewDto {
        CharacterViewDto::from_sheet(sheet, self.sync.status())
    }

    /// Trim a positive delta to the room left under the point cap
    fn cap_attribute_delta(&self, sheet: &CharacterSheet, delta: i64) -> i64 {
        match self.attribute_point_cap {
            Some(cap) if delta > 0 => {
                let room = cap.saturating_sub(sheet.attributes().total_points());
                delta.min(i64::try_from(room).unwrap_or(i64::MAX))
            }
            _ => delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::SyncState;
    use crate::infrastructure::persistence::InMemoryRecordStore;
    use serde_json::json;

    const DELAY: Duration = Duration::from_millis(500);

    fn session_with(store: &Arc<InMemoryRecordStore>, identity: &str) -> CharacterSession {
        CharacterSession::new(
            Arc::new(Catalog::standard()),
            store.clone(),
            SessionOptions::new(identity).with_save_debounce(DELAY),
        )
    }

    async fn settle() {
        tokio::time::sleep(DELAY + Duration::from_millis(100)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_session_never_saves_round_trip_to_default() {
        let store = Arc::new(InMemoryRecordStore::new());
        let session = session_with(&store, "fresh");
        session.start().await;

        for attribute in ["Strength", "Intelligence"] {
            session.adjust_attribute(attribute, 1).await.unwrap();
            session.adjust_attribute(attribute, -1).await.unwrap();
        }
        settle().await;
        settle().await;

        assert_eq!(store.write_count(), 0);
        assert_eq!(session.sync_status().state, SyncState::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_does_not_trigger_save() {
        let store = Arc::new(InMemoryRecordStore::new());
        store
            .insert_raw(
                "veteran",
                json!({
                    "attributes": { "Strength": 15, "Intelligence": 12 },
                    "skills": { "Athletics": 3 },
                    "selectedClass": "Barbarian",
                    "num": 27,
                    "skillPoints": 40
                }),
            )
            .await;
        let session = session_with(&store, "veteran");

        session.start().await;
        settle().await;

        assert_eq!(store.write_count(), 0);
        let view = session.view().await;
        assert_eq!(view.total_points, 27);
        assert_eq!(view.skill_budget, 14);
        assert_eq!(view.available_skill_points, 11);
        assert_eq!(view.selected_class.as_deref(), Some("Barbarian"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_saved_record_reloads_identically() {
        let store = Arc::new(InMemoryRecordStore::new());
        let session = session_with(&store, "round-trip");
        session.start().await;

        session.adjust_attribute("Intelligence", 14).await.unwrap();
        session.adjust_attribute("Dexterity", 11).await.unwrap();
        session.adjust_skill("Stealth", 4).await.unwrap();
        session.adjust_skill("Arcana", 2).await.unwrap();
        session.select_class(Some("Wizard")).await.unwrap();
        settle().await;
        assert_eq!(store.write_count(), 1);
        let saved = session.view().await;
        session.close();

        let reloaded = session_with(&store, "round-trip");
        reloaded.start().await;
        let view = reloaded.view().await;

        assert_eq!(view.attributes, saved.attributes);
        assert_eq!(view.skills, saved.skills);
        assert_eq!(view.selected_class, saved.selected_class);
        assert_eq!(view.skill_budget, 18);
    }

    #[tokio::test(start_paused = true)]
    async fn test_intelligence_drop_reclaims_skill_points() {
        let store = Arc::new(InMemoryRecordStore::new());
        let session = session_with(&store, "scholar");
        session.start().await;

        session.adjust_attribute("Intelligence", 20).await.unwrap();
        for skill in ["Acrobatics", "Animal Handling", "Arcana"] {
            session.adjust_skill(skill, 4).await.unwrap();
        }

        let view = session.adjust_attribute("Intelligence", -12).await.unwrap();

        assert_eq!(view.skill_budget, 6);
        assert_eq!(view.skill_points_spent, 6);
        let points: Vec<u32> = view.skills.iter().take(3).map(|s| s.points).collect();
        assert_eq!(points, vec![0, 2, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_op_edits_do_not_mark_dirty() {
        let store = Arc::new(InMemoryRecordStore::new());
        let session = session_with(&store, "idle");
        session.start().await;

        session.adjust_attribute("Wisdom", -1).await.unwrap();
        session.adjust_skill("Insight", 1).await.unwrap();
        session.select_class(None).await.unwrap();

        assert_eq!(session.sync_status().state, SyncState::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attribute_cap_trims_increments() {
        let store = Arc::new(InMemoryRecordStore::new());
        let session = CharacterSession::new(
            Arc::new(Catalog::standard()),
            store.clone(),
            SessionOptions::new("capped")
                .with_save_debounce(DELAY)
                .with_attribute_point_cap(Some(10)),
        );
        session.start().await;

        session.adjust_attribute("Strength", 7).await.unwrap();
        let view = session.adjust_attribute("Wisdom", 7).await.unwrap();
        assert_eq!(view.total_points, 10);

        let view = session.adjust_attribute("Charisma", 1).await.unwrap();
        assert_eq!(view.total_points, 10);

        let view = session.adjust_attribute("Strength", -2).await.unwrap();
        assert_eq!(view.total_points, 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_names_are_errors() {
        let store = Arc::new(InMemoryRecordStore::new());
        let session = session_with(&store, "typo");
        session.start().await;

        assert!(matches!(
            session.adjust_attribute("Luck", 1).await,
            Err(CharacterError::UnknownAttribute(_))
        ));
        assert!(matches!(
            session.adjust_skill("Juggling", 1).await,
            Err(CharacterError::UnknownSkill(_))
        ));
        assert!(matches!(
            session.select_class(Some("Paladin")).await,
            Err(CharacterError::UnknownClass(_))
        ));
        assert!(matches!(
            session.roll_skill_check("Juggling", 10).await,
            Err(CharacterError::UnknownSkill(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_skill_check_is_read_only() {
        let store = Arc::new(InMemoryRecordStore::new());
        let session = session_with(&store, "roller");
        session.start().await;

        let check = session.roll_skill_check("Perception", 10).await.unwrap();

        assert!((1..=20).contains(&check.roll));
        assert_eq!(check.skill_total, -5);
        assert_eq!(check.total, i64::from(check.roll) - 5);
        assert_eq!(session.sync_status().state, SyncState::Loaded);
    }
}
