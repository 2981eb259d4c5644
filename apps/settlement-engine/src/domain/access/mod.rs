//! Access Bounded Context
//!
//! Roles, the capability table and the acting user.

mod actor;
mod capability;
mod role;

pub use actor::Actor;
pub use capability::{Action, CapabilityTable};
pub use role::Role;
