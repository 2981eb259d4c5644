//! Share Transaction Bounded Context
//!
//! Buy and sell requests from creation through settlement or cancellation.

pub mod aggregate;
pub mod events;
pub mod services;
pub mod value_objects;

pub use aggregate::{
    AmendTransactionCommand, CreateTransactionCommand, ReconstitutedTransactionParams,
    ShareTransaction,
};
pub use events::TransactionEvent;
pub use services::TransactionStateMachine;
pub use value_objects::{TransactionStatus, TransactionType};
