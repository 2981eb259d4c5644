//! Inventory Bounded Context
//!
//! Company share inventory and the guard that protects it.

mod company;
mod guard;

pub use company::{Company, CompanyStatus};
pub use guard::InventoryGuard;
