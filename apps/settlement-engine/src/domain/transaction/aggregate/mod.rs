//! Share transaction aggregate.

mod share_transaction;

pub use share_transaction::{
    AmendTransactionCommand, CreateTransactionCommand, ReconstitutedTransactionParams,
    ShareTransaction,
};
