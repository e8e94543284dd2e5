//! Application layer - Use cases over the character sheet
//!
//! This layer contains:
//! - Ports: The remote record service the application depends on
//! - Services: Persistence synchronisation and the builder session
//! - DTOs: Read models served to clients

pub mod dto;
pub mod ports;
pub mod services;
