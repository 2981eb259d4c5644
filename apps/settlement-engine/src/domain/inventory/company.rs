//! Company share inventory.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{CompanyId, ShareCount, Timestamp};

/// Listing status of a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    /// Awaiting approval.
    #[default]
    Pending,
    /// Approved for trading.
    Approved,
    /// Listing rejected.
    Rejected,
}

impl fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A company and the number of its shares available to sell.
///
/// `number_of_shares` only changes through [`InventoryGuard`](super::InventoryGuard).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    id: CompanyId,
    name: String,
    symbol: String,
    number_of_shares: ShareCount,
    #[serde(default)]
    status: CompanyStatus,
    #[serde(default)]
    updated_at: Timestamp,
}

impl Company {
    /// Create a company record.
    #[must_use]
    pub fn new(
        id: CompanyId,
        name: impl Into<String>,
        symbol: impl Into<String>,
        number_of_shares: ShareCount,
        status: CompanyStatus,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            symbol: symbol.into(),
            number_of_shares,
            status,
            updated_at: Timestamp::now(),
        }
    }

    /// Company ID.
    #[must_use]
    pub const fn id(&self) -> &CompanyId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Market symbol used to look up price snapshots.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Shares currently available.
    #[must_use]
    pub const fn number_of_shares(&self) -> ShareCount {
        self.number_of_shares
    }

    /// Listing status.
    #[must_use]
    pub const fn status(&self) -> CompanyStatus {
        self.status
    }

    /// Last inventory change.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub(super) fn set_number_of_shares(&mut self, shares: ShareCount) {
        self.number_of_shares = shares;
        self.updated_at = Timestamp::now();
    }
}
