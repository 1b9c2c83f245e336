use serde::{Deserialize, Serialize};

use super::trade::TradeEvent;

/// Bot performance over a timeframe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    #[serde(default)]
    pub total_trades: usize,

    /// Share of trades with a positive shown return, 0 when there are none
    #[serde(default)]
    pub win_rate_pct: f64,

    #[serde(default)]
    pub best_shown_pct: f64,

    #[serde(default)]
    pub worst_shown_pct: f64,

    #[serde(default)]
    pub sum_shown_return_pct: f64,

    #[serde(default)]
    pub sum_portfolio_impact_pct: f64,
}

/// Trades for one timeframe, with the server's summary when it sent one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeList {
    #[serde(default)]
    pub summary: Option<PerformanceSummary>,

    #[serde(default)]
    pub trades: Vec<TradeEvent>,
}
