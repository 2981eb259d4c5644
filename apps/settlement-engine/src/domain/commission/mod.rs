//! Commission Bounded Context
//!
//! Broker commissions, their status lifecycle and derived amounts.

pub mod aggregate;
pub mod events;
pub mod services;
pub mod value_objects;

pub use aggregate::{
    AmendCommissionCommand, Commission, CreateCommissionCommand, ReconstitutedCommissionParams,
};
pub use events::CommissionEvent;
pub use services::CommissionStateMachine;
pub use value_objects::CommissionStatus;
