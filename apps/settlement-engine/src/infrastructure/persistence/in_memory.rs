//! In-memory settlement store.
//!
//! A single `tokio::sync::Mutex` guards all state. A unit of work owns the
//! lock for its whole lifetime and stages writes in an overlay that is only
//! applied on commit, so dropping it is a rollback.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

use crate::application::ports::{
    CommissionFilter, SettlementStore, StoreError, TransactionFilter, UnitOfWork,
};
use crate::domain::commission::Commission;
use crate::domain::inventory::Company;
use crate::domain::shared::{CommissionId, CompanyId, TransactionId};
use crate::domain::transaction::ShareTransaction;

#[derive(Debug, Default)]
struct StoreState {
    companies: HashMap<CompanyId, Company>,
    commissions: HashMap<CommissionId, Commission>,
    transactions: HashMap<TransactionId, ShareTransaction>,
}

/// In-memory implementation of `SettlementStore`.
///
/// Suitable for tests, development and single-process deployments.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettlementStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemorySettlementStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `companies`.
    #[must_use]
    pub fn with_companies(companies: impl IntoIterator<Item = Company>) -> Self {
        let state = StoreState {
            companies: companies
                .into_iter()
                .map(|c| (c.id().clone(), c))
                .collect(),
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Insert or replace a company outside any unit of work.
    pub async fn insert_company(&self, company: Company) {
        let mut state = self.state.lock().await;
        state.companies.insert(company.id().clone(), company);
    }

    /// Insert or replace a commission outside any unit of work.
    pub async fn insert_commission(&self, commission: Commission) {
        let mut state = self.state.lock().await;
        state
            .commissions
            .insert(commission.id().clone(), commission);
    }

    /// Insert or replace a transaction outside any unit of work.
    pub async fn insert_transaction(&self, transaction: ShareTransaction) {
        let mut state = self.state.lock().await;
        state
            .transactions
            .insert(transaction.id().clone(), transaction);
    }
}

#[async_trait]
impl SettlementStore for InMemorySettlementStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        Ok(Box::new(InMemoryUnitOfWork {
            guard,
            staged: Staged::default(),
        }))
    }

    async fn find_company(&self, id: &CompanyId) -> Result<Option<Company>, StoreError> {
        Ok(self.state.lock().await.companies.get(id).cloned())
    }

    async fn find_commission(&self, id: &CommissionId) -> Result<Option<Commission>, StoreError> {
        Ok(self.state.lock().await.commissions.get(id).cloned())
    }

    async fn find_commissions(
        &self,
        filter: &CommissionFilter,
    ) -> Result<Vec<Commission>, StoreError> {
        let state = self.state.lock().await;
        let mut found: Vec<Commission> = state
            .commissions
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(found)
    }

    async fn find_transaction(
        &self,
        id: &TransactionId,
    ) -> Result<Option<ShareTransaction>, StoreError> {
        Ok(self.state.lock().await.transactions.get(id).cloned())
    }

    async fn find_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<ShareTransaction>, StoreError> {
        let state = self.state.lock().await;
        let mut found: Vec<ShareTransaction> = state
            .transactions
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(found)
    }
}

/// Writes staged by an open unit of work. `None` marks a deletion.
#[derive(Debug, Default)]
struct Staged {
    companies: HashMap<CompanyId, Company>,
    commissions: HashMap<CommissionId, Option<Commission>>,
    transactions: HashMap<TransactionId, Option<ShareTransaction>>,
}

impl Staged {
    fn len(&self) -> usize {
        self.companies.len() + self.commissions.len() + self.transactions.len()
    }
}

/// Unit of work holding the store lock.
#[derive(Debug)]
pub struct InMemoryUnitOfWork {
    guard: OwnedMutexGuard<StoreState>,
    staged: Staged,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn company(&mut self, id: &CompanyId) -> Result<Option<Company>, StoreError> {
        Ok(self
            .staged
            .companies
            .get(id)
            .or_else(|| self.guard.companies.get(id))
            .cloned())
    }

    async fn save_company(&mut self, company: &Company) -> Result<(), StoreError> {
        self.staged
            .companies
            .insert(company.id().clone(), company.clone());
        Ok(())
    }

    async fn commission(&mut self, id: &CommissionId) -> Result<Option<Commission>, StoreError> {
        Ok(match self.staged.commissions.get(id) {
            Some(staged) => staged.clone(),
            None => self.guard.commissions.get(id).cloned(),
        })
    }

    async fn save_commission(&mut self, commission: &Commission) -> Result<(), StoreError> {
        self.staged
            .commissions
            .insert(commission.id().clone(), Some(commission.clone()));
        Ok(())
    }

    async fn delete_commission(&mut self, id: &CommissionId) -> Result<(), StoreError> {
        self.staged.commissions.insert(id.clone(), None);
        Ok(())
    }

    async fn transaction(
        &mut self,
        id: &TransactionId,
    ) -> Result<Option<ShareTransaction>, StoreError> {
        Ok(match self.staged.transactions.get(id) {
            Some(staged) => staged.clone(),
            None => self.guard.transactions.get(id).cloned(),
        })
    }

    async fn save_transaction(
        &mut self,
        transaction: &ShareTransaction,
    ) -> Result<(), StoreError> {
        self.staged
            .transactions
            .insert(transaction.id().clone(), Some(transaction.clone()));
        Ok(())
    }

    async fn delete_transaction(&mut self, id: &TransactionId) -> Result<(), StoreError> {
        self.staged.transactions.insert(id.clone(), None);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let Self { mut guard, staged } = *self;
        trace!(writes = staged.len(), "Committing unit of work");

        guard.companies.extend(staged.companies);
        for (id, commission) in staged.commissions {
            match commission {
                Some(c) => guard.commissions.insert(id, c),
                None => guard.commissions.remove(&id),
            };
        }
        for (id, transaction) in staged.transactions {
            match transaction {
                Some(t) => guard.transactions.insert(id, t),
                None => guard.transactions.remove(&id),
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inventory::CompanyStatus;
    use crate::domain::shared::ShareCount;

    fn company(shares: u64) -> Company {
        Company::new(
            CompanyId::new("nabil"),
            "Nabil Bank",
            "NABIL",
            ShareCount::new(shares),
            CompanyStatus::Approved,
        )
    }

    #[tokio::test]
    async fn uncommitted_unit_rolls_back_on_drop() {
        let store = InMemorySettlementStore::with_companies([company(100)]);
        {
            let mut uow = store.begin().await.unwrap();
            let mut c = uow.company(&CompanyId::new("nabil")).await.unwrap().unwrap();
            crate::domain::inventory::InventoryGuard::release(&mut c, ShareCount::new(40))
                .unwrap();
            uow.save_company(&c).await.unwrap();
            // staged write is visible inside the unit
            let seen = uow.company(&CompanyId::new("nabil")).await.unwrap().unwrap();
            assert_eq!(seen.number_of_shares(), ShareCount::new(60));
        }
        let stored = store
            .find_company(&CompanyId::new("nabil"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.number_of_shares(), ShareCount::new(100));
    }

    #[tokio::test]
    async fn commit_applies_staged_writes() {
        let store = InMemorySettlementStore::with_companies([company(100)]);
        let mut uow = store.begin().await.unwrap();
        let mut c = uow.company(&CompanyId::new("nabil")).await.unwrap().unwrap();
        crate::domain::inventory::InventoryGuard::release(&mut c, ShareCount::new(40)).unwrap();
        uow.save_company(&c).await.unwrap();
        uow.commit().await.unwrap();

        let stored = store
            .find_company(&CompanyId::new("nabil"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.number_of_shares(), ShareCount::new(60));
    }

    #[tokio::test]
    async fn units_are_serialized() {
        let store = InMemorySettlementStore::new();
        let first = store.begin().await.unwrap();

        let second = tokio::time::timeout(std::time::Duration::from_millis(50), store.begin());
        assert!(second.await.is_err(), "second unit must wait for the first");

        drop(first);
        assert!(store.begin().await.is_ok());
    }
}
