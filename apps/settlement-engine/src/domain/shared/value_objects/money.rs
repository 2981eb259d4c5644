//! Money value object for currency amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use super::{CommissionRate, ShareCount};
use crate::domain::shared::DomainError;

/// A monetary amount in the platform's settlement currency.
///
/// Represented as a Decimal so totals and commissions are exact; no currency
/// rounding is applied to stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new Money value from a Decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money value from a whole-unit integer amount.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the inner Decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if this amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Value of `shares` units priced at `self` each. `field` names the
    /// price in the error.
    ///
    /// # Errors
    ///
    /// Returns error if the product does not fit in a `Decimal`.
    pub fn times_shares(&self, shares: ShareCount, field: &str) -> Result<Self, DomainError> {
        self.0
            .checked_mul(Decimal::from(shares.value()))
            .map(Self)
            .ok_or_else(|| too_large(field))
    }

    /// Apply a percentage rate: `self * rate / 100`.
    ///
    /// # Errors
    ///
    /// Returns error if the intermediate product does not fit in a `Decimal`.
    pub fn apply_rate(&self, rate: CommissionRate) -> Result<Self, DomainError> {
        self.0
            .checked_mul(rate.percent())
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .map(Self)
            .ok_or_else(|| too_large("commissionRate"))
    }

    /// Validate that the amount can be used as a per-share price.
    ///
    /// # Errors
    ///
    /// Returns error if the price is zero or negative.
    pub fn validate_as_price(&self, field: &str) -> Result<(), DomainError> {
        if self.is_positive() {
            Ok(())
        } else {
            Err(DomainError::InvalidValue {
                field: field.to_string(),
                message: "must be greater than zero".to_string(),
            })
        }
    }
}

fn too_large(field: &str) -> DomainError {
    DomainError::InvalidValue {
        field: field.to_string(),
        message: "amount is too large".to_string(),
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Saturates at the `Decimal` bounds.
impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn times_shares_multiplies_exactly() {
        let price = Money::new(dec!(100.25));
        assert_eq!(
            price.times_shares(ShareCount::new(4), "pricePerShare").unwrap(),
            Money::new(dec!(401.00))
        );
    }

    #[test]
    fn times_shares_overflow_is_an_error() {
        let err = Money::new(Decimal::MAX)
            .times_shares(ShareCount::new(2), "agreedPricePerShare")
            .unwrap_err();
        assert_eq!(err.field(), "agreedPricePerShare");
    }

    #[test]
    fn apply_rate_overflow_is_an_error() {
        let rate = CommissionRate::new(dec!(50)).unwrap();
        let err = Money::new(Decimal::MAX).apply_rate(rate).unwrap_err();
        assert_eq!(err.field(), "commissionRate");
    }

    #[test]
    fn addition_saturates() {
        let mut total = Money::new(Decimal::MAX);
        total += Money::from_units(1);
        assert_eq!(total, Money::new(Decimal::MAX));
    }

    #[test]
    fn apply_rate_is_percentage() {
        let total = Money::from_units(1000);
        let rate = CommissionRate::new(dec!(2.5)).unwrap();
        assert_eq!(total.apply_rate(rate).unwrap(), Money::new(dec!(25)));
    }

    #[test]
    fn validate_as_price_rejects_zero_and_negative() {
        assert!(Money::ZERO.validate_as_price("pricePerShare").is_err());
        assert!(Money::new(dec!(-1)).validate_as_price("pricePerShare").is_err());
        assert!(Money::new(dec!(0.01)).validate_as_price("pricePerShare").is_ok());
    }

    #[test]
    fn sum_of_amounts() {
        let total: Money = [Money::from_units(10), Money::from_units(5)].into_iter().sum();
        assert_eq!(total, Money::from_units(15));
    }

    #[test]
    fn display_two_places() {
        assert_eq!(Money::new(dec!(12.5)).to_string(), "12.50");
    }
}
