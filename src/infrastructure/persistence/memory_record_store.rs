use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{CharacterRecordPort, RecordStoreError};
use crate::domain::value_objects::CharacterRecord;

/// Process-local record store
///
/// Records are kept as raw JSON, exactly as the remote service would hold
/// them, so loads go through the same merge path. Nothing survives a
/// restart. Under test, reads and writes can be made to fail.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<String, Value>>,
    writes: AtomicU64,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a payload as-is, malformed or not
    #[cfg(test)]
    pub async fn insert_raw(&self, identity: impl Into<String>, payload: Value) {
        self.records.write().await.insert(identity.into(), payload);
    }

    pub async fn stored(&self, identity: &str) -> Option<Value> {
        self.records.read().await.get(identity).cloned()
    }

    /// Number of successful writes
    #[cfg(test)]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CharacterRecordPort for InMemoryRecordStore {
    async fn fetch(&self, identity: &str) -> Result<Option<Value>, RecordStoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RecordStoreError::Transport("record store unavailable".to_string()));
        }
        Ok(self.stored(identity).await)
    }

    async fn store(&self, identity: &str, record: &CharacterRecord) -> Result<(), RecordStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RecordStoreError::Transport("record store unavailable".to_string()));
        }
        let payload =
            serde_json::to_value(record).map_err(|e| RecordStoreError::Serialization(e.to_string()))?;
        self.records.write().await.insert(identity.to_string(), payload);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Catalog;

    #[tokio::test]
    async fn test_store_then_fetch() {
        let store = InMemoryRecordStore::new();
        let mut record = CharacterRecord::defaults(&Catalog::standard());
        record.selected_class = Some("Bard".to_string());

        assert_eq!(store.fetch("bard").await.unwrap(), None);
        store.store("bard", &record).await.unwrap();

        let payload = store.fetch("bard").await.unwrap().unwrap();
        assert_eq!(payload["selectedClass"], "Bard");
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = InMemoryRecordStore::new();
        store.fail_reads(true);
        store.fail_writes(true);

        assert!(store.fetch("x").await.is_err());
        let record = CharacterRecord::defaults(&Catalog::standard());
        assert!(matches!(
            store.store("x", &record).await,
            Err(RecordStoreError::Transport(_))
        ));
        assert_eq!(store.write_count(), 0);
    }
}
