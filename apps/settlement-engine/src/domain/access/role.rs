//! Platform roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform administrator.
    Admin,
    /// Broker working a counter.
    Teller,
    /// Field broker.
    Agent,
    /// Customer buying or selling shares.
    Client,
}

impl Role {
    /// Tellers and agents act as brokers.
    #[must_use]
    pub const fn is_broker(&self) -> bool {
        matches!(self, Self::Teller | Self::Agent)
    }

    /// Clients are the customer side of a commission or transaction.
    #[must_use]
    pub const fn is_customer(&self) -> bool {
        matches!(self, Self::Client)
    }

    /// Lowercase name as used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teller => "teller",
            Self::Agent => "agent",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broker_roles() {
        assert!(Role::Teller.is_broker());
        assert!(Role::Agent.is_broker());
        assert!(!Role::Client.is_broker());
        assert!(!Role::Admin.is_broker());
    }

    #[test]
    fn serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Teller).unwrap(), "\"teller\"");
        let parsed: Role = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(parsed, Role::Client);
    }
}
