//! UTC instants for record creation, updates and completion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// UTC instant; serialized as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap an instant.
    #[must_use]
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse RFC 3339, normalising any offset to UTC.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(s).map(|instant| Self(instant.to_utc()))
    }

}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rfc3339() {
        let ts = Timestamp::parse("2026-03-01T10:00:00Z").unwrap();
        assert_eq!(ts.to_string(), "2026-03-01T10:00:00+00:00");
    }

    #[test]
    fn offsets_normalise_to_utc() {
        let ts = Timestamp::parse("2026-03-01T15:45:00+05:45").unwrap();
        assert_eq!(ts, Timestamp::parse("2026-03-01T10:00:00Z").unwrap());
    }

    #[test]
    fn ordering_follows_time() {
        let a = Timestamp::parse("2026-03-01T10:00:00Z").unwrap();
        let b = Timestamp::parse("2026-03-01T10:00:01Z").unwrap();
        assert!(a < b);
    }
}
