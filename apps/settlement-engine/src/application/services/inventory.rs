//! Inventory Guard application service.
//!
//! Loads companies from the store and applies [`InventoryGuard`] rules. Every
//! mutation happens on a caller-owned unit of work so it commits, or rolls
//! back, together with the status write it gates.

use tracing::{info, warn};

use crate::application::ports::{SettlementStore, UnitOfWork};
use crate::domain::inventory::{Company, InventoryGuard};
use crate::domain::shared::{CompanyId, ShareCount};
use crate::error::SettlementError;
use crate::observability::record_inventory_rejection;

/// Store-backed inventory checks.
pub struct InventoryService;

impl InventoryService {
    /// Read-only availability check against committed state.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown company, `InsufficientShares` when
    /// the company holds fewer than `requested` shares.
    pub async fn check_availability<S>(
        store: &S,
        company_id: &CompanyId,
        requested: ShareCount,
    ) -> Result<Company, SettlementError>
    where
        S: SettlementStore + ?Sized,
    {
        let company = store
            .find_company(company_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("company", company_id))?;
        Self::check_loaded(&company, requested)?;
        Ok(company)
    }

    /// Availability check against a company already loaded in a unit of work.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientShares` when the company holds too few shares.
    pub fn check_loaded(company: &Company, requested: ShareCount) -> Result<(), SettlementError> {
        InventoryGuard::check_availability(company, requested).inspect_err(|_| {
            record_inventory_rejection("check");
            warn!(
                company_id = %company.id(),
                requested = requested.value(),
                available = company.number_of_shares().value(),
                "Insufficient shares"
            );
        })
    }

    /// Availability check against the company as seen by `uow`, without
    /// staging a write.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown company, `InsufficientShares` when
    /// the company holds fewer than `requested` shares.
    pub async fn check_within(
        uow: &mut dyn UnitOfWork,
        company_id: &CompanyId,
        requested: ShareCount,
    ) -> Result<(), SettlementError> {
        let company = uow
            .company(company_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("company", company_id))?;
        Self::check_loaded(&company, requested)
    }

    /// Re-check and decrement inside `uow`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown company and `InsufficientShares` when
    /// the decrement would go negative. Nothing is staged on error.
    pub async fn release(
        uow: &mut dyn UnitOfWork,
        company_id: &CompanyId,
        shares: ShareCount,
    ) -> Result<Company, SettlementError> {
        let mut company = uow
            .company(company_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("company", company_id))?;

        if let Err(e) = InventoryGuard::release(&mut company, shares) {
            record_inventory_rejection("release");
            warn!(
                company_id = %company_id,
                requested = shares.value(),
                available = company.number_of_shares().value(),
                "Share release refused"
            );
            return Err(e);
        }

        uow.save_company(&company).await?;
        info!(
            company_id = %company_id,
            released = shares.value(),
            remaining = company.number_of_shares().value(),
            "Shares released"
        );
        Ok(company)
    }

    /// Return shares to the company inside `uow`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown company.
    pub async fn restore(
        uow: &mut dyn UnitOfWork,
        company_id: &CompanyId,
        shares: ShareCount,
    ) -> Result<Company, SettlementError> {
        let mut company = uow
            .company(company_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("company", company_id))?;
        InventoryGuard::restore(&mut company, shares);
        uow.save_company(&company).await?;
        info!(
            company_id = %company_id,
            restored = shares.value(),
            available = company.number_of_shares().value(),
            "Shares restored"
        );
        Ok(company)
    }
}
