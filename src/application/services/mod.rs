//! Application services - Use case implementations
//!
//! `CharacterSession` is the entry point adapters talk to; it drives the
//! `CharacterSheet` aggregate and reports changes to `PersistenceSync`,
//! which owns the debounced conversation with the record service.

pub mod character_session;
pub mod persistence_sync;

pub use character_session::{CharacterSession, SessionOptions};
pub use persistence_sync::{SyncState, SyncStatus};
