//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - **Driven Adapters (Outbound)**
//!   - `persistence/`: settlement store, user directory and seed fixtures
//!   - `market_data/`: snapshot history
//!   - `notification/`: log and capture notifiers
//!
//! - **Driver Adapters (Inbound)**
//!   - `http/`: REST API controllers
//!
//! - `config/`: dependency injection container

pub mod config;
pub mod http;
pub mod market_data;
pub mod notification;
pub mod persistence;
