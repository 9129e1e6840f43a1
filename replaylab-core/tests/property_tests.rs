//! Property tests for metric and playback invariants.
//!
//! Uses proptest to verify:
//! 1. Drawdown bounds — within [0, 1) for positive curves, 0 when non-decreasing
//! 2. Degenerate curves — constant or short equity has a zero ratio
//! 3. Win rate bounds — within [0, 1], 0 with no completed trades
//! 4. Tick count — wall-clock advances move the cursor by the elapsed periods

use proptest::prelude::*;
use replaylab_core::domain::{
    Dataset, PerformanceSeries, PriceSeries, SentimentRegime, SentimentSeries,
};
use replaylab_core::metrics::{max_drawdown, risk_adjusted_return, win_rate};
use replaylab_core::sink::NullSink;
use replaylab_core::{ManualClock, PlaybackConfig, PlaybackController, PlaybackStatus};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_equity() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.5..2.0_f64, 1..200)
}

fn arb_sorted_unique(max: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::btree_set(0..max, 0..20).prop_map(|s| s.into_iter().collect())
}

fn flat_dataset(n: usize) -> Dataset {
    let base = chrono::NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
    let dates: Vec<_> = (0..n).map(|i| base + chrono::Duration::days(i as i64)).collect();
    Dataset::new(
        PriceSeries::from_closes(dates.clone(), vec![100.0; n]),
        SentimentSeries {
            dates: dates.clone(),
            values: vec![50.0; n],
            regimes: vec![SentimentRegime::Neutral; n],
        },
        PerformanceSeries {
            dates,
            strategy_equity: vec![1.0; n],
            benchmark_equity: vec![1.0; n],
        },
    )
    .unwrap()
}

// ── 1. Drawdown ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn drawdown_is_a_fraction(equity in arb_equity()) {
        let dd = max_drawdown(&equity);
        prop_assert!((0.0..1.0).contains(&dd));
    }

    #[test]
    fn non_decreasing_curve_has_no_drawdown(mut equity in arb_equity()) {
        equity.sort_by(|a, b| a.partial_cmp(b).unwrap());
        prop_assert_eq!(max_drawdown(&equity), 0.0);
    }
}

// ── 2. Degenerate ratio ──────────────────────────────────────────────

proptest! {
    #[test]
    fn constant_equity_has_zero_ratio(v in 0.1..10.0_f64, n in 1usize..300) {
        prop_assert_eq!(risk_adjusted_return(&vec![v; n]), 0.0);
    }

    #[test]
    fn short_equity_has_zero_ratio(equity in prop::collection::vec(0.5..2.0_f64, 0..10)) {
        prop_assert_eq!(risk_adjusted_return(&equity), 0.0);
    }
}

// ── 3. Win rate ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn win_rate_is_bounded(
        buys in arb_sorted_unique(100),
        sells in arb_sorted_unique(100),
        closes in prop::collection::vec(1.0..100.0_f64, 100),
        cursor in 0usize..100,
    ) {
        let wr = win_rate(&buys, &sells, &closes, cursor);
        prop_assert!((0.0..=1.0).contains(&wr));
    }

    #[test]
    fn no_sells_means_no_win_rate(buys in arb_sorted_unique(50), cursor in 0usize..50) {
        let closes: Vec<f64> = (0..50).map(|i| i as f64 + 1.0).collect();
        prop_assert_eq!(win_rate(&buys, &[], &closes, cursor), 0.0);
    }
}

// ── 4. Tick count ────────────────────────────────────────────────────

proptest! {
    /// However the advances are split across pumps, the cursor moves by
    /// `floor(total / period)` until the end of the dataset.
    #[test]
    fn cursor_moves_by_elapsed_periods(steps in prop::collection::vec(0u64..400, 1..30)) {
        let n = 300;
        let clock = ManualClock::new();
        let mut c = PlaybackController::new(
            flat_dataset(n),
            PlaybackConfig::default(),
            clock.clone(),
            NullSink,
        )
        .unwrap();
        c.start().unwrap();

        let mut total = 0u64;
        for step in &steps {
            clock.advance_millis(*step);
            total += step;
            c.pump();
        }

        let ticks = (total / 50) as usize;
        let expected = (49 + ticks).min(n - 1);
        prop_assert_eq!(c.cursor(), expected);
        if 49 + ticks >= n {
            prop_assert_eq!(c.status(), PlaybackStatus::Finished);
        } else {
            prop_assert_eq!(c.status(), PlaybackStatus::Playing);
        }
    }
}
