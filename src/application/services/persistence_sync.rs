//! Persistence Sync - Load, debounce and save the character record
//!
//! Lifecycle: `NotLoaded → Loading → Loaded → (Dirty ⇄ Saving) → Loaded`.
//!
//! The initial load is the only path that populates state from the record
//! service; it never marks the session dirty. After it, every reported
//! change restarts a single debounce timer, and only the record handed in
//! with the last change of a burst is written. Writes are serialised so
//! they reach the service in the order they were issued.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::ports::outbound::CharacterRecordPort;
use crate::domain::value_objects::{Catalog, CharacterRecord, SessionId};

/// Default quiet period before a burst of edits is written
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    NotLoaded,
    Loading,
    Loaded,
    /// Changes not yet written; a save is pending or the last one failed
    Dirty,
    Saving,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncStatus {
    pub state: SyncState,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub saves: u64,
    pub suppressed_saves: u64,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self {
            state: SyncState::NotLoaded,
            last_saved_at: None,
            last_error: None,
            saves: 0,
            suppressed_saves: 0,
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    status: SyncStatus,
    /// Bumped on every accepted change; a write only settles the state if
    /// no newer change arrived while it was in flight
    generation: u64,
    closed: bool,
}

/// Everything a detached write needs
#[derive(Clone)]
struct Writer {
    session_id: SessionId,
    port: Arc<dyn CharacterRecordPort>,
    identity: String,
    shared: Arc<Mutex<Shared>>,
    write_lock: Arc<tokio::sync::Mutex<()>>,
}

pub struct PersistenceSync {
    writer: Writer,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PersistenceSync {
    pub fn new(
        session_id: SessionId,
        port: Arc<dyn CharacterRecordPort>,
        identity: impl Into<String>,
        delay: Duration,
    ) -> Self {
        Self {
            writer: Writer {
                session_id,
                port,
                identity: identity.into(),
                shared: Arc::new(Mutex::new(Shared::default())),
                write_lock: Arc::new(tokio::sync::Mutex::new(())),
            },
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Fetch the stored record and merge it over the catalog defaults
    ///
    /// Never fails: a missing record, a transport error or an unusable
    /// payload all yield defaults. The session is `Loaded` afterwards.
    pub async fn load(&self, catalog: &Catalog) -> CharacterRecord {
        let session = self.writer.session_id;
        self.cancel_pending();
        lock(&self.writer.shared).status.state = SyncState::Loading;

        let (record, error) = match self.writer.port.fetch(&self.writer.identity).await {
            Ok(Some(payload)) => {
                let (record, fallbacks) = CharacterRecord::merge_with_defaults(catalog, &payload);
                for fallback in &fallbacks {
                    warn!(%session, %fallback, "Stored record field replaced by default");
                }
                info!(%session, identity = %self.writer.identity, "Loaded character record");
                (record, None)
            }
            Ok(None) => {
                info!(%session, identity = %self.writer.identity, "No stored character record, starting from defaults");
                (CharacterRecord::defaults(catalog), None)
            }
            Err(e) => {
                warn!(%session, error = %e, "Failed to load character record, starting from defaults");
                (CharacterRecord::defaults(catalog), Some(e.to_string()))
            }
        };

        let mut shared = lock(&self.writer.shared);
        shared.status.state = SyncState::Loaded;
        shared.status.last_error = error;
        record
    }

    /// Report that the composite state changed; `record` is its new snapshot
    ///
    /// Ignored until the initial load has completed and after `close`.
    /// Otherwise marks the session dirty and restarts the debounce timer.
    pub fn record_changed(&self, record: CharacterRecord) {
        let session = self.writer.session_id;
        let generation = {
            let mut shared = lock(&self.writer.shared);
            if shared.closed {
                debug!(%session, "Session closed, change not scheduled for saving");
                return;
            }
            if matches!(shared.status.state, SyncState::NotLoaded | SyncState::Loading) {
                debug!(%session, "Change before initial load completed, not scheduled for saving");
                return;
            }
            shared.status.state = SyncState::Dirty;
            shared.generation += 1;
            shared.generation
        };

        let mut pending = lock(&self.pending);
        if let Some(previous) = pending.take() {
            if !previous.is_finished() {
                debug!(%session, "Save debounce restarted");
            }
            previous.abort();
        }

        let writer = self.writer.clone();
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so a later restart of the timer cannot abort a write
            // that has already begun.
            tokio::spawn(writer.write(record, generation));
        }));
    }

    /// Stop accepting changes and cancel any pending save timer
    ///
    /// A write that has already started is allowed to finish.
    pub fn close(&self) {
        lock(&self.writer.shared).closed = true;
        if self.cancel_pending() {
            info!(session = %self.writer.session_id, "Pending save cancelled on close");
        }
    }

    pub fn status(&self) -> SyncStatus {
        lock(&self.writer.shared).status.clone()
    }

    fn cancel_pending(&self) -> bool {
        match lock(&self.pending).take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }
}

impl Drop for PersistenceSync {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

impl Writer {
    async fn write(self, record: CharacterRecord, generation: u64) {
        let session = self.session_id;
        let _serialised = self.write_lock.lock().await;

        if record.is_default() {
            debug!(%session, "Record is all defaults, save suppressed");
            let mut shared = lock(&self.shared);
            shared.status.suppressed_saves += 1;
            if shared.generation == generation {
                shared.status.state = SyncState::Loaded;
            }
            return;
        }

        {
            let mut shared = lock(&self.shared);
            if shared.generation == generation {
                shared.status.state = SyncState::Saving;
            }
        }

        let result = self.port.store(&self.identity, &record).await;

        let mut shared = lock(&self.shared);
        let latest = shared.generation == generation;
        match result {
            Ok(()) => {
                info!(%session, identity = %self.identity, "Character record saved");
                shared.status.saves += 1;
                shared.status.last_saved_at = Some(Utc::now());
                shared.status.last_error = None;
                if latest {
                    shared.status.state = SyncState::Loaded;
                }
            }
            Err(e) => {
                // No retry here; the next edit schedules a fresh save.
                warn!(%session, error = %e, "Failed to save character record");
                shared.status.last_error = Some(e.to_string());
                if latest {
                    shared.status.state = SyncState::Dirty;
                }
            }
        }
    }
}
