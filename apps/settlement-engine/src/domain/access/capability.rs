//! Capability table: which role may attempt which action.
//!
//! Ownership (a broker touching only its own records, a client only theirs)
//! is checked separately by [`Actor::ensure_party`](super::Actor::ensure_party).

use std::fmt;

use super::Role;

/// Actions gated at the engine boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Create a commission.
    CreateCommission,
    /// Amend a commission.
    UpdateCommission,
    /// Change a commission's status.
    UpdateCommissionStatus,
    /// Delete a commission.
    DeleteCommission,
    /// List every commission.
    ViewAllCommissions,
    /// List or read the actor's own commissions.
    ViewOwnCommissions,
    /// Commission statistics.
    ViewCommissionStats,
    /// Create a transaction request.
    CreateTransaction,
    /// Amend a transaction.
    UpdateTransaction,
    /// Change a transaction's status.
    UpdateTransactionStatus,
    /// Attach a payment proof.
    UploadPaymentProof,
    /// Delete a transaction.
    DeleteTransaction,
    /// List every transaction.
    ViewAllTransactions,
    /// List or read the actor's own transactions.
    ViewOwnTransactions,
    /// Transaction statistics.
    ViewTransactionStats,
    /// Market statistics.
    ViewMarketStats,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateCommission => "create commissions",
            Self::UpdateCommission => "update commissions",
            Self::UpdateCommissionStatus => "change commission status",
            Self::DeleteCommission => "delete commissions",
            Self::ViewAllCommissions => "list all commissions",
            Self::ViewOwnCommissions => "view commissions",
            Self::ViewCommissionStats => "view commission statistics",
            Self::CreateTransaction => "create transactions",
            Self::UpdateTransaction => "update transactions",
            Self::UpdateTransactionStatus => "change transaction status",
            Self::UploadPaymentProof => "upload payment proofs",
            Self::DeleteTransaction => "delete transactions",
            Self::ViewAllTransactions => "list all transactions",
            Self::ViewOwnTransactions => "view transactions",
            Self::ViewTransactionStats => "view transaction statistics",
            Self::ViewMarketStats => "view market statistics",
        };
        f.write_str(name)
    }
}

/// Static role → action table.
pub struct CapabilityTable;

impl CapabilityTable {
    /// Whether `role` may attempt `action` at all.
    #[must_use]
    pub const fn allows(role: Role, action: Action) -> bool {
        match role {
            Role::Admin => true,
            Role::Teller | Role::Agent => matches!(
                action,
                Action::CreateCommission
                    | Action::UpdateCommission
                    | Action::UpdateCommissionStatus
                    | Action::DeleteCommission
                    | Action::ViewOwnCommissions
                    | Action::ViewCommissionStats
                    | Action::UpdateTransaction
                    | Action::UpdateTransactionStatus
                    | Action::DeleteTransaction
                    | Action::ViewOwnTransactions
                    | Action::ViewTransactionStats
                    | Action::ViewMarketStats
            ),
            Role::Client => matches!(
                action,
                Action::CreateCommission
                    | Action::ViewOwnCommissions
                    | Action::CreateTransaction
                    | Action::UpdateTransaction
                    | Action::UpdateTransactionStatus
                    | Action::UploadPaymentProof
                    | Action::ViewOwnTransactions
                    | Action::ViewMarketStats
            ),
        }
    }
}
