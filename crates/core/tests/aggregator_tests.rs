// ═══════════════════════════════════════════════════════════════════
// Aggregator Tests — growth series, daily buckets, recent activity,
// performance summary
// ═══════════════════════════════════════════════════════════════════

mod common;

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

use common::trade;
use futurefund_core::models::trade::{Direction, TradeEvent};
use futurefund_core::services::aggregator::{
    TradeSeriesAggregator, DAILY_WINDOW_DAYS, NO_DATA_LABEL, RECENT_LIMIT,
};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, day, hour, 0, 0).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn ids(trades: &[TradeEvent]) -> Vec<&str> {
    trades.iter().map(|t| t.id.as_str()).collect()
}

// ═══════════════════════════════════════════════════════════════════
// Growth series
// ═══════════════════════════════════════════════════════════════════

mod growth {
    use super::*;

    #[test]
    fn test_two_trades_accumulate() {
        let agg = TradeSeriesAggregator::new();
        let trades = vec![trade("a", at(20, 10), 3.0), trade("b", at(21, 10), -1.0)];

        let growth = agg.growth_series(&trades, &Utc);

        assert_eq!(growth.len(), 2);
        assert!(approx(growth[0].cumulative_value, 3.0));
        assert!(approx(growth[1].cumulative_value, 2.0));
        assert_eq!(growth[0].label, "Nov 20");
        assert_eq!(growth[1].label, "Nov 21");
    }

    #[test]
    fn test_one_point_per_trade_and_last_equals_total() {
        let agg = TradeSeriesAggregator::new();
        let trades = vec![
            trade("a", at(3, 8), 0.4),
            trade("b", at(5, 9), -0.15),
            trade("c", at(9, 1), 1.25),
            trade("d", at(12, 23), 0.05),
        ];

        let growth = agg.growth_series(&trades, &Utc);
        let total: f64 = trades.iter().map(|t| t.portfolio_impact_pct).sum();

        assert_eq!(growth.len(), trades.len());
        assert!(approx(growth.last().unwrap().cumulative_value, total));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let agg = TradeSeriesAggregator::new();
        let sorted = vec![
            trade("a", at(1, 0), 1.0),
            trade("b", at(2, 0), 2.0),
            trade("c", at(3, 0), -0.5),
        ];
        let shuffled = vec![sorted[2].clone(), sorted[0].clone(), sorted[1].clone()];

        assert_eq!(
            agg.growth_series(&sorted, &Utc),
            agg.growth_series(&shuffled, &Utc)
        );
    }

    #[test]
    fn test_empty_input_yields_placeholder() {
        let agg = TradeSeriesAggregator::new();
        let growth = agg.growth_series(&[], &Utc);

        assert_eq!(growth.len(), 1);
        assert_eq!(growth[0].label, NO_DATA_LABEL);
        assert_eq!(growth[0].cumulative_value, 0.0);
    }

    #[test]
    fn test_uses_impact_not_shown_return() {
        let agg = TradeSeriesAggregator::new();
        // shown = 10x impact in the helper
        let growth = agg.growth_series(&[trade("a", at(1, 0), 0.3)], &Utc);
        assert!(approx(growth[0].cumulative_value, 0.3));
    }

    #[test]
    fn test_same_date_trades_keep_input_order() {
        let agg = TradeSeriesAggregator::new();
        let gain = trade("gain", at(20, 10), 1.0);
        let loss = trade("loss", at(20, 10), -3.0);

        let forward = agg.growth_series(&[gain.clone(), loss.clone()], &Utc);
        assert!(approx(forward[0].cumulative_value, 1.0));
        assert!(approx(forward[1].cumulative_value, -2.0));

        let reversed = agg.growth_series(&[loss, gain], &Utc);
        assert!(approx(reversed[0].cumulative_value, -3.0));
        assert!(approx(reversed[1].cumulative_value, -2.0));
    }

    #[test]
    fn test_labels_follow_timezone() {
        let agg = TradeSeriesAggregator::new();
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let growth = agg.growth_series(&[trade("a", at(20, 22), 1.0)], &tz);
        assert_eq!(growth[0].label, "Nov 21");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Daily PnL buckets
// ═══════════════════════════════════════════════════════════════════

mod daily {
    use super::*;

    #[test]
    fn test_always_seven_days_ending_today() {
        let agg = TradeSeriesAggregator::new();
        let buckets = agg.daily_buckets(&[], &at(22, 12));

        assert_eq!(buckets.len(), DAILY_WINDOW_DAYS as usize);
        assert_eq!(buckets[0].date_key, "2025-11-16");
        assert_eq!(buckets[6].date_key, "2025-11-22");
        assert_eq!(buckets[6].label, "Sat");
        assert!(buckets.iter().all(|b| b.aggregated_impact_pct == 0.0));
    }

    #[test]
    fn test_sums_per_day_and_ignores_out_of_window() {
        let agg = TradeSeriesAggregator::new();
        let trades = vec![
            trade("a", at(22, 1), 1.0),
            trade("b", at(22, 9), 0.5),
            trade("c", at(16, 0), -0.25),
            trade("d", at(10, 12), 9.0),
        ];

        let buckets = agg.daily_buckets(&trades, &at(22, 12));

        assert!(approx(buckets[6].aggregated_impact_pct, 1.5));
        assert!(approx(buckets[0].aggregated_impact_pct, -0.25));
        assert!(!buckets[0].is_positive());
        let total: f64 = buckets.iter().map(|b| b.aggregated_impact_pct).sum();
        assert!(approx(total, 1.25));
    }

    #[test]
    fn test_day_assignment_uses_now_timezone() {
        let agg = TradeSeriesAggregator::new();
        let late_utc = trade("late", Utc.with_ymd_and_hms(2025, 11, 21, 23, 30, 0).unwrap(), 2.0);

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let now_local = plus_two.with_ymd_and_hms(2025, 11, 22, 12, 0, 0).unwrap();
        let local = agg.daily_buckets(std::slice::from_ref(&late_utc), &now_local);
        assert_eq!(local.len(), 7);
        assert_eq!(local[6].date_key, "2025-11-22");
        assert!(approx(local[6].aggregated_impact_pct, 2.0));

        let utc = agg.daily_buckets(&[late_utc], &at(22, 12));
        assert_eq!(utc[5].date_key, "2025-11-21");
        assert!(approx(utc[5].aggregated_impact_pct, 2.0));
        assert_eq!(utc[6].aggregated_impact_pct, 0.0);
    }

    #[test]
    fn test_negative_offset_still_seven_buckets() {
        let agg = TradeSeriesAggregator::new();
        let tz = FixedOffset::west_opt(11 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2025, 1, 2, 0, 30, 0).unwrap();

        let buckets = agg.daily_buckets(&[], &now);
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].date_key, "2024-12-27");
        assert_eq!(buckets[6].date_key, "2025-01-02");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Recent activity
// ═══════════════════════════════════════════════════════════════════

mod recent {
    use super::*;

    #[test]
    fn test_only_trades_inside_window() {
        let agg = TradeSeriesAggregator::new();
        let trades = vec![trade("day6", at(6, 12), 1.0), trade("day8", at(8, 12), 1.0)];

        let recent = agg.recent_activity(&trades, &at(10, 12));
        assert_eq!(ids(&recent), vec!["day8"]);
    }

    #[test]
    fn test_window_start_is_inclusive() {
        let agg = TradeSeriesAggregator::new();
        let now = at(10, 12);
        let trades = vec![trade("edge", now - Duration::days(3), 1.0)];

        assert_eq!(agg.recent_activity(&trades, &now).len(), 1);
    }

    #[test]
    fn test_newest_first_capped() {
        let agg = TradeSeriesAggregator::new();
        let trades = vec![
            trade("t1", at(9, 1), 0.1),
            trade("t4", at(9, 4), 0.1),
            trade("t2", at(9, 2), 0.1),
            trade("t5", at(9, 5), 0.1),
            trade("t3", at(9, 3), 0.1),
        ];

        let recent = agg.recent_activity(&trades, &at(10, 0));
        assert_eq!(recent.len(), RECENT_LIMIT);
        assert_eq!(ids(&recent), vec!["t5", "t4", "t3"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let agg = TradeSeriesAggregator::new();
        let trades = vec![
            trade("first", at(9, 6), 0.1),
            trade("second", at(9, 6), 0.2),
        ];

        let recent = agg.recent_activity(&trades, &at(10, 0));
        assert_eq!(ids(&recent), vec!["first", "second"]);
    }

    #[test]
    fn test_views_colour_matches_rounded_text() {
        let agg = TradeSeriesAggregator::new();
        let now = at(10, 12);
        let mut tiny_loss = trade("tiny", now - Duration::hours(1), -0.0001);
        tiny_loss.shown_return_pct = -0.001;

        let views = agg.recent_views(&[tiny_loss], &now);
        assert_eq!(views[0].pnl, "0.00%");
        assert!(views[0].positive);
    }

    #[test]
    fn test_views_sign_follows_shown_return() {
        let agg = TradeSeriesAggregator::new();
        let now = at(10, 12);
        let trades = vec![TradeEvent {
            id: "x".into(),
            date: now - Duration::hours(2),
            pair: "ETHUSDT".into(),
            direction: Direction::Short,
            leverage: 5,
            shown_return_pct: 4.0,
            portfolio_impact_pct: -0.1,
        }];

        let views = agg.recent_views(&trades, &now);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].side, "SHORT x5");
        assert_eq!(views[0].age, "2h ago");
        assert_eq!(views[0].pnl, "+4.00%");
        assert!(views[0].positive);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Whole-pass behaviour and summary
// ═══════════════════════════════════════════════════════════════════

mod aggregate {
    use super::*;

    #[test]
    fn test_aggregate_is_idempotent() {
        let agg = TradeSeriesAggregator::new();
        let trades = vec![
            trade("a", at(19, 3), 0.7),
            trade("b", at(20, 14), -0.3),
            trade("c", at(21, 9), 0.11),
        ];
        let now = at(21, 18);

        let first = agg.aggregate(&trades, &now);
        let second = agg.aggregate(&trades, &now);
        assert_eq!(first, second);
        assert_eq!(first.daily_pnl.len(), 7);
        assert_eq!(ids(&first.recent), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_summary_counts_wins_by_shown_return() {
        let agg = TradeSeriesAggregator::new();
        let trades = vec![
            trade("a", at(1, 0), 0.5),
            trade("b", at(2, 0), -0.2),
            trade("c", at(3, 0), 0.3),
        ];

        let summary = agg.summarize(&trades);
        assert_eq!(summary.total_trades, 3);
        assert!(approx(summary.win_rate_pct, 200.0 / 3.0));
        assert!(approx(summary.best_shown_pct, 5.0));
        assert!(approx(summary.worst_shown_pct, -2.0));
        assert!(approx(summary.sum_portfolio_impact_pct, 0.6));
    }

    #[test]
    fn test_summary_of_nothing_is_zero() {
        let summary = TradeSeriesAggregator::new().summarize(&[]);
        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.win_rate_pct, 0.0);
        assert_eq!(summary.best_shown_pct, 0.0);
    }
}
