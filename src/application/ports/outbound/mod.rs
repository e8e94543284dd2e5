//! Outbound ports - Interfaces that the application requires from external systems

mod character_record_port;

pub use character_record_port::{CharacterRecordPort, RecordStoreError};
