//! Commission aggregate.

mod commission;

pub use commission::{
    AmendCommissionCommand, Commission, CreateCommissionCommand, ReconstitutedCommissionParams,
};
