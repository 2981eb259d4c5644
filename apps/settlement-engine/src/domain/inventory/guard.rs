//! Inventory Guard
//!
//! The only code allowed to change a company's available share count.
//! Callers run [`InventoryGuard::release`] inside the same unit of work as the
//! status write it gates, so a concurrent release cannot overdraw inventory.

use tracing::debug;

use super::Company;
use crate::domain::shared::ShareCount;
use crate::error::SettlementError;

/// Share inventory checks and mutations.
pub struct InventoryGuard;

impl InventoryGuard {
    /// Read-only check that `requested` shares are available.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientShares` if the company holds fewer shares.
    pub fn check_availability(
        company: &Company,
        requested: ShareCount,
    ) -> Result<(), SettlementError> {
        if requested <= company.number_of_shares() {
            Ok(())
        } else {
            Err(Self::insufficient(company, requested))
        }
    }

    /// Re-check and decrement the company's inventory.
    ///
    /// On error the company is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientShares` if the release would go negative.
    pub fn release(company: &mut Company, shares: ShareCount) -> Result<(), SettlementError> {
        let remaining = company
            .number_of_shares()
            .checked_sub(shares)
            .ok_or_else(|| Self::insufficient(company, shares))?;
        debug!(
            company_id = %company.id(),
            released = shares.value(),
            remaining = remaining.value(),
            "Releasing shares"
        );
        company.set_number_of_shares(remaining);
        Ok(())
    }

    /// Return previously released shares to the company.
    pub fn restore(company: &mut Company, shares: ShareCount) {
        let restored = company.number_of_shares() + shares;
        debug!(
            company_id = %company.id(),
            restored = shares.value(),
            available = restored.value(),
            "Restoring shares"
        );
        company.set_number_of_shares(restored);
    }

    fn insufficient(company: &Company, requested: ShareCount) -> SettlementError {
        SettlementError::InsufficientShares {
            company_id: company.id().clone(),
            requested,
            available: company.number_of_shares(),
        }
    }
}
