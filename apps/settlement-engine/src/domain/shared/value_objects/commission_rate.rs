//! Commission rate value object (percentage between 0 and 100).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// A commission rate expressed as a percentage in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct CommissionRate(Decimal);

impl CommissionRate {
    /// Zero percent.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a rate, validating the `[0, 100]` range.
    ///
    /// # Errors
    ///
    /// Returns error if the rate is negative or above 100.
    pub fn new(percent: Decimal) -> Result<Self, DomainError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(DomainError::InvalidValue {
                field: "commissionRate".to_string(),
                message: format!("must be between 0 and 100, got {percent}"),
            });
        }
        Ok(Self(percent))
    }

    /// The percentage value.
    #[must_use]
    pub const fn percent(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for CommissionRate {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommissionRate> for Decimal {
    fn from(rate: CommissionRate) -> Self {
        rate.0
    }
}

impl fmt::Display for CommissionRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
