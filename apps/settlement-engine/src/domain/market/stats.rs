//! Market-wide statistics over the latest snapshot per security.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::MarketSnapshot;
use crate::domain::shared::Money;

/// A security singled out by a statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityHighlight {
    /// Ticker symbol.
    pub security: String,
    /// Closing price.
    pub closing: Money,
    /// Percentage change.
    pub change: Decimal,
    /// Shares traded.
    pub volume: u64,
}

impl From<&MarketSnapshot> for SecurityHighlight {
    fn from(s: &MarketSnapshot) -> Self {
        Self {
            security: s.security.clone(),
            closing: s.closing,
            change: s.change,
            volume: s.volume,
        }
    }
}

/// Aggregate market statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    /// Number of securities with a snapshot.
    pub total_securities: usize,
    /// Sum of traded volume.
    pub total_volume: u64,
    /// Sum of turnover.
    pub total_value: Money,
    /// Mean percentage change; zero when there are no securities.
    pub average_change: Decimal,
    /// Highest volume.
    pub most_active_security: Option<SecurityHighlight>,
    /// Highest change.
    pub highest_gainer: Option<SecurityHighlight>,
    /// Lowest change.
    pub lowest_loser: Option<SecurityHighlight>,
}

impl MarketStats {
    /// Compute statistics over one snapshot per security.
    ///
    /// Ties on volume or change go to the lexicographically smallest symbol,
    /// so the result does not depend on input order.
    #[must_use]
    pub fn compute(latest: &[MarketSnapshot]) -> Self {
        if latest.is_empty() {
            return Self::default();
        }

        let total_volume = latest.iter().map(|s| s.volume).fold(0u64, u64::saturating_add);
        let total_value: Money = latest.iter().map(|s| s.value).sum();
        let change_sum: Decimal = latest.iter().map(|s| s.change).sum();
        let average_change = change_sum / Decimal::from(latest.len());

        let most_active = pick(latest, |a, b| a.volume.cmp(&b.volume));
        let highest_gainer = pick(latest, |a, b| a.change.cmp(&b.change));
        let lowest_loser = pick(latest, |a, b| b.change.cmp(&a.change));

        Self {
            total_securities: latest.len(),
            total_volume,
            total_value,
            average_change,
            most_active_security: most_active.map(SecurityHighlight::from),
            highest_gainer: highest_gainer.map(SecurityHighlight::from),
            lowest_loser: lowest_loser.map(SecurityHighlight::from),
        }
    }
}

/// Best snapshot by `rank` (greater wins), smallest symbol on ties.
fn pick<F>(snapshots: &[MarketSnapshot], rank: F) -> Option<&MarketSnapshot>
where
    F: Fn(&MarketSnapshot, &MarketSnapshot) -> Ordering,
{
    snapshots
        .iter()
        .max_by(|a, b| rank(a, b).then_with(|| b.security.cmp(&a.security)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Timestamp;
    use rust_decimal_macros::dec;

    fn snap(security: &str, change: Decimal, volume: u64, value: i64) -> MarketSnapshot {
        MarketSnapshot {
            security: security.to_string(),
            closing: Money::from_units(100),
            previous: Money::from_units(100),
            change,
            volume,
            value: Money::from_units(value),
            scraped_at: Timestamp::now(),
        }
    }

    #[test]
    fn empty_input_yields_zeros() {
        let stats = MarketStats::compute(&[]);
        assert_eq!(stats.total_securities, 0);
        assert_eq!(stats.average_change, Decimal::ZERO);
        assert!(stats.most_active_security.is_none());
        assert!(stats.highest_gainer.is_none());
        assert!(stats.lowest_loser.is_none());
    }

    #[test]
    fn totals_and_extremes() {
        let stats = MarketStats::compute(&[
            snap("ADBL", dec!(2.5), 1_000, 50_000),
            snap("NABIL", dec!(-1.5), 4_000, 90_000),
            snap("NICA", dec!(0.5), 500, 10_000),
        ]);
        assert_eq!(stats.total_securities, 3);
        assert_eq!(stats.total_volume, 5_500);
        assert_eq!(stats.total_value, Money::from_units(150_000));
        assert_eq!(stats.average_change, dec!(0.5));
        assert_eq!(stats.most_active_security.unwrap().security, "NABIL");
        assert_eq!(stats.highest_gainer.unwrap().security, "ADBL");
        assert_eq!(stats.lowest_loser.unwrap().security, "NABIL");
    }

    #[test]
    fn ties_go_to_smallest_symbol_regardless_of_order() {
        let forward = [
            snap("BBB", dec!(3), 100, 1),
            snap("AAA", dec!(3), 100, 1),
            snap("CCC", dec!(3), 100, 1),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        for input in [&forward[..], &reversed[..]] {
            let stats = MarketStats::compute(input);
            assert_eq!(stats.most_active_security.unwrap().security, "AAA");
            assert_eq!(stats.highest_gainer.unwrap().security, "AAA");
            assert_eq!(stats.lowest_loser.unwrap().security, "AAA");
        }
    }
}
