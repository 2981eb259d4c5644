//! Statistics query.

use crate::domain::shared::UserId;
use crate::domain::statistics::StatsPeriod;

/// Period statistics request.
#[derive(Debug, Clone, Default)]
pub struct StatsQuery {
    /// Restrict to one broker. Forced to the actor for brokers.
    pub broker_id: Option<UserId>,
    /// Window.
    pub period: StatsPeriod,
}
