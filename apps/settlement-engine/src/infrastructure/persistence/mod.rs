//! Persistence adapters.

mod in_memory;
mod seed;
mod user_directory;

pub use in_memory::{InMemorySettlementStore, InMemoryUnitOfWork};
pub use seed::{SeedData, SeedError};
pub use user_directory::InMemoryUserDirectory;
