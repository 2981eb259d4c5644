//! Reporting periods.

use chrono::{DateTime, Datelike, Days, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SettlementError;

/// Window a statistics query covers, ending now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    /// Since the start of the current UTC day.
    Today,
    /// The last seven days.
    Week,
    /// Since the first of the current UTC month.
    Month,
    /// Since January 1st of the current UTC year.
    Year,
    /// Everything.
    #[default]
    All,
}

impl StatsPeriod {
    /// Inclusive lower bound of the window relative to `now`.
    #[must_use]
    pub fn lower_bound(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        let midnight = |date: chrono::NaiveDate| date.and_time(NaiveTime::default()).and_utc();

        match self {
            Self::Today => midnight(today),
            Self::Week => now - Duration::days(7),
            Self::Month => midnight(today - Days::new(u64::from(today.day0()))),
            Self::Year => midnight(today - Days::new(u64::from(today.ordinal0()))),
            Self::All => DateTime::UNIX_EPOCH,
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }
}

impl fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsPeriod {
    type Err = SettlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "all" => Ok(Self::All),
            other => Err(SettlementError::validation(
                "period",
                format!("unknown period '{other}', expected today, week, month, year or all"),
            )),
        }
    }
}
