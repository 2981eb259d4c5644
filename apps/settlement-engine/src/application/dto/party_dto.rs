//! Summaries of the parties a record refers to.

use serde::{Deserialize, Serialize};

use crate::application::ports::UserProfile;
use crate::domain::access::Role;
use crate::domain::inventory::Company;
use crate::domain::shared::{CompanyId, UserId};

/// Broker or customer summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartySummary {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Role.
    pub role: Role,
}

impl From<&UserProfile> for PartySummary {
    fn from(user: &UserProfile) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

impl PartySummary {
    /// Case-insensitive match on name or email; `needle` must be lowercase.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.email.to_lowercase().contains(needle)
    }
}

/// Company summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    /// Company ID.
    pub id: CompanyId,
    /// Name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
}

impl From<&Company> for CompanySummary {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id().clone(),
            name: company.name().to_string(),
            symbol: company.symbol().to_string(),
        }
    }
}
