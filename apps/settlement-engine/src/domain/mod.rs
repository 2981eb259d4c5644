//! Domain Layer
//!
//! Aggregates, value objects and pure domain services. Nothing in here does
//! I/O; persistence and notifications live behind application ports.

pub mod access;
pub mod commission;
pub mod inventory;
pub mod market;
pub mod shared;
pub mod statistics;
pub mod transaction;
