//! Persistence adapters
//!
//! The remote record service is reached through `record_client`; this
//! module holds the process-local alternative.

mod memory_record_store;

pub use memory_record_store::InMemoryRecordStore;
