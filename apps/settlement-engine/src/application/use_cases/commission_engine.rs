//! Commission Engine
//!
//! Creates commissions, drives their lifecycle and serves the commission read
//! models. Completion releases company inventory in the same unit of work as
//! the status write.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use super::observe;
use crate::application::dto::{
    CommissionListQuery, CommissionView, CompanySummary, CreateCommissionInput, Page,
    PageSettings, PartySummary,
};
use crate::application::ports::{
    CommissionFilter, NotificationPort, SettlementStore, UserDirectoryPort,
};
use crate::application::services::{Directory, InventoryService, NotificationDispatcher};
use crate::domain::access::{Action, Actor, Role};
use crate::domain::commission::{
    AmendCommissionCommand, Commission, CommissionStateMachine, CommissionStatus,
    CreateCommissionCommand,
};
use crate::domain::shared::{CommissionId, CommissionRate, CompanyId, UserId};
use crate::error::SettlementError;
use crate::observability::{record_status_transition, update_available_shares};

/// Commission engine settings.
#[derive(Debug, Clone, Copy)]
pub struct CommissionSettings {
    /// Rate used when neither the request nor the broker profile has one.
    pub default_rate: CommissionRate,
    /// Page size limits for listings.
    pub pages: PageSettings,
}

impl Default for CommissionSettings {
    fn default() -> Self {
        Self {
            default_rate: CommissionRate::ZERO,
            pages: PageSettings::default(),
        }
    }
}

/// Commission lifecycle use cases.
pub struct CommissionEngine<S, U, N>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
{
    store: Arc<S>,
    directory: Directory<U>,
    notifications: NotificationDispatcher<U, N>,
    settings: CommissionSettings,
}

impl<S, U, N> CommissionEngine<S, U, N>
where
    S: SettlementStore,
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
{
    /// Create a new `CommissionEngine`.
    pub fn new(
        store: Arc<S>,
        users: Arc<U>,
        notifier: Arc<N>,
        settings: CommissionSettings,
    ) -> Self {
        Self {
            store,
            directory: Directory::new(Arc::clone(&users)),
            notifications: NotificationDispatcher::new(users, notifier),
            settings,
        }
    }

    /// Page size limits.
    pub const fn page_settings(&self) -> PageSettings {
        self.settings.pages
    }

    /// Record a new pending commission.
    ///
    /// Brokers create commissions for themselves, clients request them for
    /// themselves, admins name both parties. The company must currently hold
    /// enough shares; nothing is reserved.
    #[instrument(skip_all, fields(actor = %actor.user_id, company_id = %input.company_id))]
    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateCommissionInput,
    ) -> Result<CommissionView, SettlementError> {
        let started = Instant::now();
        let result = self.create_inner(actor, input).await;
        observe("commission.create", started, &result);
        result
    }

    async fn create_inner(
        &self,
        actor: &Actor,
        input: CreateCommissionInput,
    ) -> Result<CommissionView, SettlementError> {
        actor.authorize(Action::CreateCommission)?;
        let (broker_id, customer_id) = resolve_parties(actor, input.broker_id, input.customer_id)?;

        let broker = self.directory.require_broker(&broker_id).await?;
        let customer = self
            .directory
            .require_customer(&customer_id, "customerId")
            .await?;

        let commission_rate = input
            .commission_rate
            .or(broker.commission_rate)
            .unwrap_or(self.settings.default_rate);

        let mut commission = Commission::new(CreateCommissionCommand {
            broker_id,
            customer_id,
            company_id: input.company_id,
            number_of_shares: input.number_of_shares,
            price_per_share: input.price_per_share,
            commission_rate,
            notes: input.notes,
            created_by: actor.user_id.clone(),
        })?;

        let company = InventoryService::check_availability(
            self.store.as_ref(),
            commission.company_id(),
            commission.number_of_shares(),
        )
        .await?;

        let mut uow = self.store.begin().await?;
        let events = commission.drain_events();
        uow.save_commission(&commission).await?;
        uow.commit().await?;

        info!(
            commission_id = %commission.id(),
            broker_id = %commission.broker_id(),
            customer_id = %commission.customer_id(),
            commission_amount = %commission.commission_amount(),
            "Commission created"
        );

        self.notifications.commission_events(&events);

        Ok(CommissionView::assemble(
            &commission,
            Some(PartySummary::from(&broker)),
            Some(PartySummary::from(&customer)),
            Some(CompanySummary::from(&company)),
        ))
    }

    /// Move a commission to `status`.
    ///
    /// Completing a commission releases its shares from company inventory in
    /// the same unit of work; if the release fails nothing is written.
    #[instrument(skip_all, fields(actor = %actor.user_id, commission_id = %id, to = %status))]
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: &CommissionId,
        status: CommissionStatus,
        notes: Option<String>,
    ) -> Result<CommissionView, SettlementError> {
        let started = Instant::now();
        let result = self.update_status_inner(actor, id, status, notes).await;
        observe("commission.update_status", started, &result);
        result
    }

    async fn update_status_inner(
        &self,
        actor: &Actor,
        id: &CommissionId,
        status: CommissionStatus,
        notes: Option<String>,
    ) -> Result<CommissionView, SettlementError> {
        actor.authorize(Action::UpdateCommissionStatus)?;

        let mut uow = self.store.begin().await?;
        let mut commission = uow
            .commission(id)
            .await?
            .ok_or_else(|| SettlementError::not_found("commission", id))?;
        actor.ensure_broker_of(commission.broker_id())?;

        let from = commission.status();
        CommissionStateMachine::validate_transition(from, status)?;

        let mut released = None;
        if status == CommissionStatus::Completed {
            released = Some(
                InventoryService::release(
                    &mut *uow,
                    commission.company_id(),
                    commission.number_of_shares(),
                )
                .await?,
            );
        }

        commission.transition_to(status, notes)?;
        let events = commission.drain_events();
        uow.save_commission(&commission).await?;
        uow.commit().await?;

        record_status_transition("commission", from.as_str(), status.as_str());
        if let Some(company) = &released {
            update_available_shares(company.id().as_str(), company.number_of_shares().value());
        }
        info!(
            commission_id = %id,
            from = %from,
            to = %status,
            "Commission status changed"
        );

        self.notifications.commission_events(&events);
        self.view(&commission).await
    }

    /// Amend an open commission and recompute its amounts.
    ///
    /// A changed share count is re-checked against current inventory.
    #[instrument(skip_all, fields(actor = %actor.user_id, commission_id = %id))]
    pub async fn update(
        &self,
        actor: &Actor,
        id: &CommissionId,
        amendment: AmendCommissionCommand,
    ) -> Result<CommissionView, SettlementError> {
        actor.authorize(Action::UpdateCommission)?;
        if amendment.is_empty() {
            return Err(SettlementError::validation("body", "no fields to update"));
        }

        let mut uow = self.store.begin().await?;
        let mut commission = uow
            .commission(id)
            .await?
            .ok_or_else(|| SettlementError::not_found("commission", id))?;
        actor.ensure_broker_of(commission.broker_id())?;

        let shares_changed = amendment
            .number_of_shares
            .is_some_and(|s| s != commission.number_of_shares());
        commission.amend(amendment)?;

        if shares_changed {
            let company = uow
                .company(commission.company_id())
                .await?
                .ok_or_else(|| SettlementError::not_found("company", commission.company_id()))?;
            InventoryService::check_loaded(&company, commission.number_of_shares())?;
        }

        uow.save_commission(&commission).await?;
        uow.commit().await?;
        info!(commission_id = %id, "Commission updated");

        self.view(&commission).await
    }

    /// Delete a commission that is not completed or cancelled.
    #[instrument(skip_all, fields(actor = %actor.user_id, commission_id = %id))]
    pub async fn delete(&self, actor: &Actor, id: &CommissionId) -> Result<(), SettlementError> {
        actor.authorize(Action::DeleteCommission)?;

        let mut uow = self.store.begin().await?;
        let commission = uow
            .commission(id)
            .await?
            .ok_or_else(|| SettlementError::not_found("commission", id))?;
        actor.ensure_broker_of(commission.broker_id())?;
        commission.ensure_mutable()?;

        uow.delete_commission(id).await?;
        uow.commit().await?;
        info!(commission_id = %id, "Commission deleted");
        Ok(())
    }

    /// Read one commission. Non-admins must be a party to it.
    pub async fn get(
        &self,
        actor: &Actor,
        id: &CommissionId,
    ) -> Result<CommissionView, SettlementError> {
        actor.authorize(Action::ViewOwnCommissions)?;
        let commission = self
            .store
            .find_commission(id)
            .await?
            .ok_or_else(|| SettlementError::not_found("commission", id))?;
        actor.ensure_party(commission.broker_id(), commission.customer_id())?;
        self.view(&commission).await
    }

    /// List all commissions matching `query`, newest first.
    pub async fn list(
        &self,
        actor: &Actor,
        query: CommissionListQuery,
    ) -> Result<Page<CommissionView>, SettlementError> {
        actor.authorize(Action::ViewAllCommissions)?;
        self.list_by_filters(query, None).await
    }

    /// List the actor's own commissions, as broker or customer.
    pub async fn list_mine(
        &self,
        actor: &Actor,
        query: CommissionListQuery,
    ) -> Result<Page<CommissionView>, SettlementError> {
        actor.authorize(Action::ViewOwnCommissions)?;
        self.list_by_filters(query, Some(actor.user_id.clone())).await
    }

    async fn list_by_filters(
        &self,
        query: CommissionListQuery,
        party: Option<UserId>,
    ) -> Result<Page<CommissionView>, SettlementError> {
        let filter = CommissionFilter {
            status: query.status,
            broker_id: query.broker_id,
            customer_id: query.customer_id,
            company_id: query.company_id,
            party,
            created_from: None,
        };
        let mut commissions = self.store.find_commissions(&filter).await?;
        commissions.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        let mut lookups = Lookups::default();
        let mut views = Vec::with_capacity(commissions.len());
        for commission in &commissions {
            let view = CommissionView::assemble(
                commission,
                lookups.user(&self.directory, commission.broker_id()).await?,
                lookups.user(&self.directory, commission.customer_id()).await?,
                lookups
                    .company(self.store.as_ref(), commission.company_id())
                    .await?,
            );
            if query
                .search
                .as_deref()
                .is_none_or(|search| view.matches_search(search))
            {
                views.push(view);
            }
        }

        Ok(Page::paginate(views, query.page))
    }

    async fn view(&self, commission: &Commission) -> Result<CommissionView, SettlementError> {
        let company = self
            .store
            .find_company(commission.company_id())
            .await?
            .as_ref()
            .map(CompanySummary::from);
        Ok(CommissionView::assemble(
            commission,
            self.directory.summary(commission.broker_id()).await?,
            self.directory.summary(commission.customer_id()).await?,
            company,
        ))
    }
}

/// Work out broker and customer from the actor's role.
fn resolve_parties(
    actor: &Actor,
    broker_id: Option<UserId>,
    customer_id: Option<UserId>,
) -> Result<(UserId, UserId), SettlementError> {
    match actor.role {
        Role::Teller | Role::Agent => {
            let broker_id = broker_id.unwrap_or_else(|| actor.user_id.clone());
            if broker_id != actor.user_id {
                return Err(SettlementError::Forbidden(
                    "brokers may only create commissions for themselves".to_string(),
                ));
            }
            let customer_id =
                customer_id.ok_or_else(|| SettlementError::validation("customerId", "is required"))?;
            Ok((broker_id, customer_id))
        }
        Role::Client => {
            let customer_id = customer_id.unwrap_or_else(|| actor.user_id.clone());
            if customer_id != actor.user_id {
                return Err(SettlementError::Forbidden(
                    "clients may only request commissions for themselves".to_string(),
                ));
            }
            let broker_id =
                broker_id.ok_or_else(|| SettlementError::validation("brokerId", "is required"))?;
            Ok((broker_id, customer_id))
        }
        Role::Admin => Ok((
            broker_id.ok_or_else(|| SettlementError::validation("brokerId", "is required"))?,
            customer_id.ok_or_else(|| SettlementError::validation("customerId", "is required"))?,
        )),
    }
}

/// Per-request cache of party and company summaries for list assembly.
#[derive(Default)]
pub(super) struct Lookups {
    users: HashMap<UserId, Option<PartySummary>>,
    companies: HashMap<CompanyId, Option<CompanySummary>>,
}

impl Lookups {
    pub(super) async fn user<U: UserDirectoryPort>(
        &mut self,
        directory: &Directory<U>,
        id: &UserId,
    ) -> Result<Option<PartySummary>, SettlementError> {
        if let Some(cached) = self.users.get(id) {
            return Ok(cached.clone());
        }
        let summary = directory.summary(id).await?;
        self.users.insert(id.clone(), summary.clone());
        Ok(summary)
    }

    pub(super) async fn company<S: SettlementStore + ?Sized>(
        &mut self,
        store: &S,
        id: &CompanyId,
    ) -> Result<Option<CompanySummary>, SettlementError> {
        if let Some(cached) = self.companies.get(id) {
            return Ok(cached.clone());
        }
        let summary = store.find_company(id).await?.as_ref().map(CompanySummary::from);
        self.companies.insert(id.clone(), summary.clone());
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broker_defaults_to_self() {
        let actor = Actor::new("b1", Role::Agent);
        let (broker, customer) =
            resolve_parties(&actor, None, Some(UserId::new("c1"))).unwrap();
        assert_eq!(broker.as_str(), "b1");
        assert_eq!(customer.as_str(), "c1");
    }

    #[test]
    fn broker_cannot_create_for_another_broker() {
        let actor = Actor::new("b1", Role::Teller);
        let err = resolve_parties(&actor, Some(UserId::new("b2")), Some(UserId::new("c1")))
            .unwrap_err();
        assert!(matches!(err, SettlementError::Forbidden(_)));
    }

    #[test]
    fn client_requests_for_self_only() {
        let actor = Actor::new("c1", Role::Client);
        assert!(resolve_parties(&actor, Some(UserId::new("b1")), None).is_ok());
        let err = resolve_parties(&actor, Some(UserId::new("b1")), Some(UserId::new("c2")))
            .unwrap_err();
        assert!(matches!(err, SettlementError::Forbidden(_)));
    }

    #[test]
    fn admin_must_name_both_parties() {
        let actor = Actor::new("root", Role::Admin);
        let err = resolve_parties(&actor, Some(UserId::new("b1")), None).unwrap_err();
        assert!(matches!(err, SettlementError::Validation { .. }));
    }
}
