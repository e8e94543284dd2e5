//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::ports::outbound::CharacterRecordPort;
use crate::application::services::{CharacterSession, SessionOptions};
use crate::domain::value_objects::Catalog;
use crate::infrastructure::config::{AppConfig, RecordBackend};
use crate::infrastructure::persistence::InMemoryRecordStore;
use crate::infrastructure::record_client::HttpRecordClient;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Arc<Catalog>,
    /// The character being built
    pub session: CharacterSession,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        // Load catalog
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_json_file(path)
                .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
            None => Catalog::standard(),
        };
        let catalog = Arc::new(catalog);

        // Initialize record store
        let records: Arc<dyn CharacterRecordPort> = match config.record_backend {
            RecordBackend::Http => Arc::new(
                HttpRecordClient::new(&config.record_service_url, config.record_request_timeout)
                    .context("Failed to build record service client")?,
            ),
            RecordBackend::Memory => Arc::new(InMemoryRecordStore::new()),
        };

        Ok(Self::with_port(config, catalog, records))
    }

    /// Assemble state around an already-built record store
    pub fn with_port(config: AppConfig, catalog: Arc<Catalog>, records: Arc<dyn CharacterRecordPort>) -> Self {
        let options = SessionOptions::new(config.character_identity.clone())
            .with_save_debounce(config.save_debounce)
            .with_attribute_point_cap(config.attribute_point_cap);
        let session = CharacterSession::new(catalog.clone(), records, options);

        Self {
            config,
            catalog,
            session,
        }
    }
}
