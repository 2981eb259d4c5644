//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.

mod commission_rate;
mod identifiers;
mod money;
mod share_count;
mod timestamp;

pub use commission_rate::CommissionRate;
pub use identifiers::{CommissionId, CompanyId, TransactionId, UserId};
pub use money::Money;
pub use share_count::ShareCount;
pub use timestamp::Timestamp;
