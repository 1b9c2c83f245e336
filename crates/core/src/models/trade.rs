use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Side of a bot trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

/// A single closed trade as reported by the account service.
///
/// Read-only to the client. Two percentages are carried and must never be
/// swapped for one another:
/// - `shown_return_pct` is the trade's own return, the figure shown on a row.
/// - `portfolio_impact_pct` is what the trade did to account equity, and is
///   the only value used when aggregating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEvent {
    /// Unique identifier assigned by the server
    pub id: String,

    /// When the trade closed
    pub date: DateTime<Utc>,

    /// Instrument symbol, e.g. "BTCUSDT"
    pub pair: String,

    pub direction: Direction,

    /// Leverage multiplier (always >= 1)
    pub leverage: u32,

    /// Display-facing trade return, in percent
    pub shown_return_pct: f64,

    /// Contribution to portfolio value, in percent
    pub portfolio_impact_pct: f64,
}

impl TradeEvent {
    /// "LONG x10" style label.
    pub fn side_label(&self) -> String {
        format!("{} x{}", self.direction, self.leverage)
    }
}
