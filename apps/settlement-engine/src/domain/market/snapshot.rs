//! Market snapshot read model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::shared::{Money, Timestamp};

/// One scraped quote for a listed security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    /// Ticker symbol.
    pub security: String,
    /// Closing price.
    pub closing: Money,
    /// Previous closing price.
    pub previous: Money,
    /// Percentage change from the previous close.
    pub change: Decimal,
    /// Shares traded.
    pub volume: u64,
    /// Turnover.
    pub value: Money,
    /// When the quote was scraped.
    pub scraped_at: Timestamp,
}

/// Reduce a history of snapshots to the most recent one per security.
///
/// Output is ordered by security symbol.
#[must_use]
pub fn latest_per_security<'a>(
    snapshots: impl IntoIterator<Item = &'a MarketSnapshot>,
) -> Vec<MarketSnapshot> {
    let mut latest: HashMap<&str, &MarketSnapshot> = HashMap::new();
    for snapshot in snapshots {
        latest
            .entry(snapshot.security.as_str())
            .and_modify(|current| {
                if snapshot.scraped_at > current.scraped_at {
                    *current = snapshot;
                }
            })
            .or_insert(snapshot);
    }

    let mut out: Vec<MarketSnapshot> = latest.into_values().cloned().collect();
    out.sort_by(|a, b| a.security.cmp(&b.security));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    fn snap(security: &str, closing: i64, minutes_ago: i64) -> MarketSnapshot {
        MarketSnapshot {
            security: security.to_string(),
            closing: Money::from_units(closing),
            previous: Money::from_units(closing),
            change: dec!(0),
            volume: 0,
            value: Money::ZERO,
            scraped_at: Timestamp::new(Utc::now() - Duration::minutes(minutes_ago)),
        }
    }

    #[test]
    fn keeps_newest_per_security() {
        let history = vec![
            snap("NABIL", 500, 60),
            snap("NABIL", 510, 5),
            snap("ADBL", 300, 10),
            snap("NABIL", 505, 30),
        ];
        let latest = latest_per_security(&history);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].security, "ADBL");
        assert_eq!(latest[1].closing, Money::from_units(510));
    }
}
