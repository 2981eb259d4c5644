//! Commission domain services.

mod commission_state_machine;

pub use commission_state_machine::CommissionStateMachine;
