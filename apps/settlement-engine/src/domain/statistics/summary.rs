//! Period statistics over commissions and transactions.
//!
//! Callers pass records already narrowed to the period and broker; sums only
//! include completed records.

use serde::{Deserialize, Serialize};

use crate::domain::commission::{Commission, CommissionStatus};
use crate::domain::shared::Money;
use crate::domain::transaction::{ShareTransaction, TransactionStatus};

/// Commission counts and sums.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionStats {
    /// All commissions in the window.
    pub total_commissions: u64,
    /// Completed commissions.
    pub completed_commissions: u64,
    /// Commissions with status `pending`.
    pub pending_commissions: u64,
    /// Sum of `commission_amount` over completed commissions.
    pub total_commission_amount: Money,
    /// Sum of `total_amount` over completed commissions.
    pub total_transaction_value: Money,
}

impl CommissionStats {
    /// Tally a set of commissions.
    #[must_use]
    pub fn tally<'a>(commissions: impl IntoIterator<Item = &'a Commission>) -> Self {
        commissions
            .into_iter()
            .fold(Self::default(), |mut acc, c| {
                acc.total_commissions += 1;
                match c.status() {
                    CommissionStatus::Completed => {
                        acc.completed_commissions += 1;
                        acc.total_commission_amount += c.commission_amount();
                        acc.total_transaction_value += c.total_amount();
                    }
                    CommissionStatus::Pending => acc.pending_commissions += 1,
                    _ => {}
                }
                acc
            })
    }
}

/// Transaction counts and sums.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    /// All transactions in the window.
    pub total_transactions: u64,
    /// Completed transactions.
    pub completed_transactions: u64,
    /// Transactions waiting on broker approval, payment or listing.
    pub pending_transactions: u64,
    /// Cancelled transactions.
    pub cancelled_transactions: u64,
    /// Sum of `total_transaction_value` over completed transactions.
    pub total_transaction_value: Money,
}

impl TransactionStats {
    /// Tally a set of transactions.
    #[must_use]
    pub fn tally<'a>(transactions: impl IntoIterator<Item = &'a ShareTransaction>) -> Self {
        transactions
            .into_iter()
            .fold(Self::default(), |mut acc, t| {
                acc.total_transactions += 1;
                match t.status() {
                    TransactionStatus::Completed => {
                        acc.completed_transactions += 1;
                        acc.total_transaction_value += t.total_transaction_value();
                    }
                    TransactionStatus::Cancelled => acc.cancelled_transactions += 1,
                    s if s.is_pending() => acc.pending_transactions += 1,
                    _ => {}
                }
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commission::CreateCommissionCommand;
    use crate::domain::shared::{CommissionRate, CompanyId, ShareCount, UserId};
    use crate::domain::transaction::{CreateTransactionCommand, TransactionType};
    use rust_decimal_macros::dec;

    fn commission(status: CommissionStatus) -> Commission {
        let mut c = Commission::new(CreateCommissionCommand {
            broker_id: UserId::new("b"),
            customer_id: UserId::new("c"),
            company_id: CompanyId::new("x"),
            number_of_shares: ShareCount::new(10),
            price_per_share: Money::from_units(100),
            commission_rate: CommissionRate::new(dec!(2)).unwrap(),
            notes: None,
            created_by: UserId::new("b"),
        })
        .unwrap();
        if status != CommissionStatus::Pending {
            c.transition_to(status, None).unwrap();
        }
        c
    }

    #[test]
    fn commission_sums_cover_completed_only() {
        let records = [
            commission(CommissionStatus::Completed),
            commission(CommissionStatus::Completed),
            commission(CommissionStatus::Pending),
            commission(CommissionStatus::InProgress),
            commission(CommissionStatus::Cancelled),
        ];
        let stats = CommissionStats::tally(&records);
        assert_eq!(stats.total_commissions, 5);
        assert_eq!(stats.completed_commissions, 2);
        assert_eq!(stats.pending_commissions, 1);
        assert_eq!(stats.total_commission_amount, Money::from_units(40));
        assert_eq!(stats.total_transaction_value, Money::from_units(2000));
    }

    #[test]
    fn transaction_counts_by_bucket() {
        let make = || {
            ShareTransaction::new(CreateTransactionCommand {
                transaction_type: TransactionType::Sell,
                user_id: UserId::new("c"),
                broker_id: UserId::new("b"),
                company_id: CompanyId::new("x"),
                requested_shares: ShareCount::new(3),
                agreed_price_per_share: Money::from_units(10),
                market_price_at_transaction: None,
                notes: None,
            })
            .unwrap()
        };
        let pending = make();
        let mut cancelled = make();
        cancelled
            .transition_to(TransactionStatus::Cancelled, None)
            .unwrap();
        let mut completed = make();
        for to in [
            TransactionStatus::PendingMarketListing,
            TransactionStatus::ListedOnMarket,
            TransactionStatus::Completed,
        ] {
            completed.transition_to(to, None).unwrap();
        }
        let mut listed = make();
        listed
            .transition_to(TransactionStatus::PendingMarketListing, None)
            .unwrap();
        listed
            .transition_to(TransactionStatus::ListedOnMarket, None)
            .unwrap();

        let stats = TransactionStats::tally([&pending, &cancelled, &completed, &listed]);
        assert_eq!(stats.total_transactions, 4);
        assert_eq!(stats.pending_transactions, 1);
        assert_eq!(stats.cancelled_transactions, 1);
        assert_eq!(stats.completed_transactions, 1);
        assert_eq!(stats.total_transaction_value, Money::from_units(30));
    }
}
