use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;

use crate::models::analytics::PerformanceSummary;
use crate::models::chart::{AggregatedSeries, DayBucket, GrowthPoint, RecentTradeView};
use crate::models::trade::TradeEvent;
use crate::services::format::{format_signed_pct, percent_of, relative_age, round2};

/// Number of trailing calendar days in the daily PnL chart (today included).
pub const DAILY_WINDOW_DAYS: u32 = 7;

/// Trailing window for "recent activity".
pub const RECENT_WINDOW_DAYS: i64 = 3;

/// Maximum number of trades in "recent activity".
pub const RECENT_LIMIT: usize = 3;

/// Label of the placeholder point emitted for an empty growth series.
pub const NO_DATA_LABEL: &str = "no data";

/// Turns a flat, unordered list of trades into chart-ready series.
///
/// Pure: no I/O, no clock. The caller passes `now`, and its timezone decides
/// which calendar day each trade belongs to. The same input always yields
/// the same output, bit for bit.
///
/// Only `portfolio_impact_pct` is aggregated. `shown_return_pct` is used
/// for display and for the performance summary's best/worst/win figures.
#[derive(Debug, Clone, Default)]
pub struct TradeSeriesAggregator;

impl TradeSeriesAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Derive growth, daily PnL and recent activity from one trade list.
    pub fn aggregate<Tz: TimeZone>(&self, trades: &[TradeEvent], now: &DateTime<Tz>) -> AggregatedSeries {
        AggregatedSeries {
            growth: self.growth_series(trades, &now.timezone()),
            daily_pnl: self.daily_buckets(trades, now),
            recent: self.recent_activity(trades, now),
        }
    }

    /// Cumulative portfolio growth, one point per trade in date order.
    ///
    /// Ties on `date` keep their input order. An empty input yields a single
    /// zero point labeled [`NO_DATA_LABEL`] so a chart never gets an empty series.
    pub fn growth_series<Tz: TimeZone>(&self, trades: &[TradeEvent], tz: &Tz) -> Vec<GrowthPoint> {
        let sorted = sorted_ascending(trades);
        if sorted.is_empty() {
            return vec![GrowthPoint {
                label: NO_DATA_LABEL.to_string(),
                cumulative_value: 0.0,
            }];
        }

        let mut running = 0.0;
        sorted
            .into_iter()
            .map(|trade| {
                running += trade.portfolio_impact_pct;
                GrowthPoint {
                    label: local_date(trade.date, tz).format("%b %-d").to_string(),
                    cumulative_value: running,
                }
            })
            .collect()
    }

    /// Exactly [`DAILY_WINDOW_DAYS`] buckets, oldest first, ending on `now`'s
    /// local date. Days without trades stay at 0; trades outside the window
    /// are ignored.
    pub fn daily_buckets<Tz: TimeZone>(&self, trades: &[TradeEvent], now: &DateTime<Tz>) -> Vec<DayBucket> {
        let tz = now.timezone();
        let today = now.date_naive();

        let days: Vec<NaiveDate> = (0..DAILY_WINDOW_DAYS)
            .rev()
            .filter_map(|back| today.checked_sub_days(chrono::Days::new(u64::from(back))))
            .collect();
        let index: HashMap<NaiveDate, usize> =
            days.iter().enumerate().map(|(i, day)| (*day, i)).collect();
        let mut buckets: Vec<DayBucket> = days.into_iter().map(DayBucket::new).collect();

        // Summed in date order so float results do not depend on input order.
        for trade in sorted_ascending(trades) {
            if let Some(&i) = index.get(&local_date(trade.date, &tz)) {
                buckets[i].aggregated_impact_pct += trade.portfolio_impact_pct;
            }
        }

        buckets
    }

    /// Trades dated within the last [`RECENT_WINDOW_DAYS`] of `now`, newest
    /// first, at most [`RECENT_LIMIT`]. Ties keep their input order.
    pub fn recent_activity<Tz: TimeZone>(&self, trades: &[TradeEvent], now: &DateTime<Tz>) -> Vec<TradeEvent> {
        let cutoff = now.with_timezone(&Utc) - Duration::days(RECENT_WINDOW_DAYS);

        let mut recent: Vec<&TradeEvent> = trades.iter().filter(|t| t.date >= cutoff).collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent.into_iter().take(RECENT_LIMIT).cloned().collect()
    }

    /// Display rows for the recent-activity card.
    pub fn recent_views<Tz: TimeZone>(&self, trades: &[TradeEvent], now: &DateTime<Tz>) -> Vec<RecentTradeView> {
        let now_utc = now.with_timezone(&Utc);
        self.recent_activity(trades, now)
            .into_iter()
            .map(|t| RecentTradeView {
                side: t.side_label(),
                age: relative_age(t.date, now_utc),
                pnl: format_signed_pct(t.shown_return_pct),
                positive: round2(t.shown_return_pct) >= 0.0,
                id: t.id,
                pair: t.pair,
            })
            .collect()
    }

    /// Totals and extremes over a trade list. A win is a positive shown return.
    pub fn summarize(&self, trades: &[TradeEvent]) -> PerformanceSummary {
        if trades.is_empty() {
            return PerformanceSummary::default();
        }

        let sorted = sorted_ascending(trades);
        let wins = sorted.iter().filter(|t| t.shown_return_pct > 0.0).count();
        let best = sorted
            .iter()
            .map(|t| t.shown_return_pct)
            .fold(f64::NEG_INFINITY, f64::max);
        let worst = sorted
            .iter()
            .map(|t| t.shown_return_pct)
            .fold(f64::INFINITY, f64::min);

        PerformanceSummary {
            total_trades: sorted.len(),
            win_rate_pct: percent_of(wins as f64, sorted.len() as f64),
            best_shown_pct: best,
            worst_shown_pct: worst,
            sum_shown_return_pct: sorted.iter().map(|t| t.shown_return_pct).sum(),
            sum_portfolio_impact_pct: sorted.iter().map(|t| t.portfolio_impact_pct).sum(),
        }
    }
}

/// Stable ascending sort by date.
fn sorted_ascending(trades: &[TradeEvent]) -> Vec<&TradeEvent> {
    let mut sorted: Vec<&TradeEvent> = trades.iter().collect();
    sorted.sort_by_key(|t| t.date);
    sorted
}

fn local_date<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}
