//! Error taxonomy for the settlement engine.
//!
//! Every engine operation returns [`SettlementError`]; the HTTP adapter maps
//! each variant to a status code through [`ErrorCode`].
//!
//! | Code | HTTP | Usage |
//! |------|------|-------|
//! | `VALIDATION_FAILED` | 400 | Malformed input, wrong party role |
//! | `INSUFFICIENT_SHARES` | 400 | Inventory guard refused a release |
//! | `INVALID_TRANSITION` | 400 | Status change not permitted |
//! | `IMMUTABLE_RECORD` | 400 | Mutation of a completed/cancelled record |
//! | `UNAUTHENTICATED` | 401 | Missing or unknown acting user |
//! | `FORBIDDEN` | 403 | Role or ownership denial |
//! | `NOT_FOUND` | 404 | Referenced entity missing |
//! | `INTERNAL_ERROR` | 500 | Persistence failure |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::shared::{CompanyId, DomainError, ShareCount};

/// Error codes for the settlement engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invalid request input or party role mismatch.
    ValidationFailed,
    /// Referenced entity does not exist.
    NotFound,
    /// Not enough company shares to settle.
    InsufficientShares,
    /// Status change not permitted from the current state.
    InvalidTransition,
    /// Record is completed or cancelled and cannot change.
    ImmutableRecord,
    /// No acting user could be resolved.
    Unauthenticated,
    /// Acting user lacks the capability or ownership.
    Forbidden,
    /// Unexpected failure.
    InternalError,
}

impl ErrorCode {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::ValidationFailed
            | Self::InsufficientShares
            | Self::InvalidTransition
            | Self::ImmutableRecord => 400,
            Self::Unauthenticated => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::InternalError => 500,
        }
    }

    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::NotFound => "NOT_FOUND",
            Self::InsufficientShares => "INSUFFICIENT_SHARES",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::ImmutableRecord => "IMMUTABLE_RECORD",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Errors returned by settlement operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// Malformed or missing input, or a party with the wrong role.
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        /// Offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// Referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind.
        entity: &'static str,
        /// Requested identifier.
        id: String,
    },

    /// The inventory guard refused to release shares.
    #[error(
        "Insufficient shares for company {company_id}: requested {requested}, available {available}"
    )]
    InsufficientShares {
        /// Company whose inventory was checked.
        company_id: CompanyId,
        /// Shares requested.
        requested: ShareCount,
        /// Shares currently available.
        available: ShareCount,
    },

    /// Status change not permitted from the current state.
    #[error("Invalid {entity} status transition: {from} -> {to}: {reason}")]
    InvalidTransition {
        /// Entity kind.
        entity: &'static str,
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
        /// Why the transition is refused.
        reason: String,
    },

    /// Mutation attempted on a completed or cancelled record.
    #[error("Cannot modify {status} {entity}")]
    ImmutableRecord {
        /// Entity kind.
        entity: &'static str,
        /// Record identifier.
        id: String,
        /// Terminal status the record is in.
        status: String,
    },

    /// Missing or unknown acting user.
    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    /// Capability or ownership denial.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Persistence failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl SettlementError {
    /// Shorthand for a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a not-found error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationFailed,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::InsufficientShares { .. } => ErrorCode::InsufficientShares,
            Self::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Self::ImmutableRecord { .. } => ErrorCode::ImmutableRecord,
            Self::Unauthenticated(_) => ErrorCode::Unauthenticated,
            Self::Forbidden(_) => ErrorCode::Forbidden,
            Self::Store(_) => ErrorCode::InternalError,
        }
    }
}

impl From<DomainError> for SettlementError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidValue { field, message } => Self::Validation { field, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(ErrorCode::ValidationFailed.http_status(), 400);
        assert_eq!(ErrorCode::InsufficientShares.http_status(), 400);
        assert_eq!(ErrorCode::InvalidTransition.http_status(), 400);
        assert_eq!(ErrorCode::ImmutableRecord.http_status(), 400);
        assert_eq!(ErrorCode::Unauthenticated.http_status(), 401);
        assert_eq!(ErrorCode::Forbidden.http_status(), 403);
        assert_eq!(ErrorCode::NotFound.http_status(), 404);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn immutable_record_message_names_status() {
        let err = SettlementError::ImmutableRecord {
            entity: "commission",
            id: "com-1".to_string(),
            status: "completed".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot modify completed commission");
        assert_eq!(err.code(), ErrorCode::ImmutableRecord);
    }

    #[test]
    fn insufficient_shares_message() {
        let err = SettlementError::InsufficientShares {
            company_id: CompanyId::new("nabil"),
            requested: ShareCount::new(60),
            available: ShareCount::new(50),
        };
        let msg = err.to_string();
        assert!(msg.contains("requested 60"));
        assert!(msg.contains("available 50"));
    }

    #[test]
    fn domain_error_maps_to_validation() {
        let err: SettlementError = DomainError::InvalidValue {
            field: "pricePerShare".to_string(),
            message: "must be greater than zero".to_string(),
        }
        .into();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
