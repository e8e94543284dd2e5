//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so infrastructure (HTTP) can
//! serialize without pulling wire concerns into the domain model.

pub mod character;

pub use character::*;
