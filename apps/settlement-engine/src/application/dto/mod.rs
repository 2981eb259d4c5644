//! Data Transfer Objects (DTOs)
//!
//! Engine inputs and the read models returned to callers.

mod commission_dto;
mod page;
mod party_dto;
mod stats_dto;
mod transaction_dto;

pub use commission_dto::{CommissionListQuery, CommissionView, CreateCommissionInput};
pub use page::{Page, PageRequest, PageSettings};
pub use party_dto::{CompanySummary, PartySummary};
pub use stats_dto::StatsQuery;
pub use transaction_dto::{CreateTransactionInput, TransactionListQuery, TransactionView};
