//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Record client: HTTP adapter for the remote character record service
//! - Persistence: In-process record store
//! - HTTP: REST API routes
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod http;
pub mod persistence;
pub mod record_client;
pub mod state;
