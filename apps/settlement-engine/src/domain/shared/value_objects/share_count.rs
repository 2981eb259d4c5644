//! Share count value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::domain::shared::DomainError;

/// A whole number of shares.
///
/// Inventory counts may be zero; counts on a commission or transaction must be
/// at least one (see [`ShareCount::validate_for_request`]).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ShareCount(u64);

impl ShareCount {
    /// No shares.
    pub const ZERO: Self = Self(0);

    /// Create a share count.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw count.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Subtract without going below zero; `None` if `rhs` exceeds `self`.
    #[must_use]
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.0.checked_sub(rhs.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Validate a requested count (must be at least one share).
    ///
    /// # Errors
    ///
    /// Returns error if the count is zero.
    pub fn validate_for_request(&self, field: &str) -> Result<(), DomainError> {
        if self.0 == 0 {
            return Err(DomainError::InvalidValue {
                field: field.to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for ShareCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for ShareCount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for ShareCount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl From<u64> for ShareCount {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
