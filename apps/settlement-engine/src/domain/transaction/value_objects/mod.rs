//! Transaction value objects.

mod transaction_status;
mod transaction_type;

pub use transaction_status::TransactionStatus;
pub use transaction_type::TransactionType;
