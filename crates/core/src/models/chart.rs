use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::trade::TradeEvent;
use crate::services::format::format_signed_pct;

/// A single point on the portfolio growth curve.
///
/// The core generates these; the frontend just renders them.
/// `cumulative_value` is the unrounded running sum so that consecutive
/// points never compound rounding error; use [`GrowthPoint::display_value`]
/// when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    /// Axis label ("Nov 22", or "no data" for the placeholder point)
    pub label: String,

    /// Running sum of portfolio impact up to and including this trade, in percent
    pub cumulative_value: f64,
}

impl GrowthPoint {
    pub fn display_value(&self) -> String {
        format_signed_pct(self.cumulative_value)
    }
}

/// One calendar day in the trailing daily-PnL window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    /// Local calendar date, rendered as `YYYY-MM-DD`
    pub date_key: String,

    /// Short weekday label ("Mon")
    pub label: String,

    /// Sum of `portfolio_impact_pct` of all trades on this local date
    pub aggregated_impact_pct: f64,
}

impl DayBucket {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date_key: date.format("%Y-%m-%d").to_string(),
            label: date.format("%a").to_string(),
            aggregated_impact_pct: 0.0,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.aggregated_impact_pct >= 0.0
    }

    pub fn display_value(&self) -> String {
        format_signed_pct(self.aggregated_impact_pct)
    }
}

/// Everything derived from one trade list in a single aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    pub growth: Vec<GrowthPoint>,
    pub daily_pnl: Vec<DayBucket>,
    /// Up to three newest trades within the recent-activity window, newest first
    pub recent: Vec<TradeEvent>,
}

/// A recent trade prepared for the "Recent Trades" card.
///
/// Sign and colour follow `shown_return_pct`, the figure printed on the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentTradeView {
    pub id: String,
    pub pair: String,
    /// "LONG x10"
    pub side: String,
    /// "2h ago"
    pub age: String,
    /// "+3.40%"
    pub pnl: String,
    pub positive: bool,
}
