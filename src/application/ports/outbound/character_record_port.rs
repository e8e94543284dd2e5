use async_trait::async_trait;
use serde_json::Value;

use crate::domain::value_objects::CharacterRecord;

#[derive(Debug, thiserror::Error)]
pub enum RecordStoreError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Record service returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Remote character record service, keyed by identity
///
/// `fetch` hands back the raw payload so the caller can merge it field by
/// field; `Ok(None)` means the service has no record for the identity.
/// `store` is a last-write-wins overwrite.
#[async_trait]
pub trait CharacterRecordPort: Send + Sync {
    async fn fetch(&self, identity: &str) -> Result<Option<Value>, RecordStoreError>;
    async fn store(&self, identity: &str, record: &CharacterRecord) -> Result<(), RecordStoreError>;
}
