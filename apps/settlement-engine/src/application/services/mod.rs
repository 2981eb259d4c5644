//! Application services shared by the use cases.

mod directory;
mod inventory;
mod notifications;

pub use directory::Directory;
pub use inventory::InventoryService;
pub use notifications::{NotificationDispatcher, OutboundMessage};
