//! Strongly-typed identifiers for domain entities.
//!
//! These prevent mixing up IDs from different contexts.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Generate a new unique identifier using UUID v4.
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(UserId, "Identifier of a platform user (broker, customer or admin).");
define_id!(CompanyId, "Identifier of a listed company holding share inventory.");
define_id!(CommissionId, "Unique identifier for a broker commission.");
define_id!(TransactionId, "Unique identifier for a share transaction.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commission_id_new_and_display() {
        let id = CommissionId::new("com-123");
        assert_eq!(id.as_str(), "com-123");
        assert_eq!(format!("{id}"), "com-123");
    }

    #[test]
    fn transaction_id_generate_is_unique() {
        assert_ne!(TransactionId::generate(), TransactionId::generate());
    }

    #[test]
    fn user_id_from_str_and_string() {
        let a: UserId = "usr-1".into();
        let b: UserId = String::from("usr-1").into();
        assert_eq!(a, b);
    }

    #[test]
    fn serde_is_transparent() {
        let id = CompanyId::new("nabil");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"nabil\"");
    }
}
