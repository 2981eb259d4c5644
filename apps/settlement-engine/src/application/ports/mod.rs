//! Application Ports (Driven)
//!
//! Interfaces the engines use to reach persistence, the user directory,
//! market data and the notification transport.

mod market_data_port;
mod notification_port;
mod settlement_store_port;
mod user_directory_port;

pub use market_data_port::MarketDataPort;
pub use notification_port::{NoOpNotifier, NotificationError, NotificationPort};
pub use settlement_store_port::{
    CommissionFilter, SettlementStore, StoreError, TransactionFilter, UnitOfWork,
};
pub use user_directory_port::{UserDirectoryPort, UserProfile};
