//! Commission value objects.

mod commission_status;

pub use commission_status::CommissionStatus;
