//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for persistence, users, market data and notifications
//! - **Services**: Inventory, directory and notification helpers shared by use cases
//! - **Use Cases**: The commission and transaction engines and statistics
//! - **DTOs**: Inputs and read models for API boundaries

pub mod dto;
pub mod ports;
pub mod services;
pub mod use_cases;

pub use dto::*;
pub use ports::*;
pub use use_cases::*;
