//! Trailing metrics — pure functions over a revealed prefix.
//!
//! Every metric takes only data up to the cursor and degrades to 0.0 on
//! short or degenerate input instead of failing.

use serde::{Deserialize, Serialize};

use crate::slicer::{PerformanceView, PriceView};

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Minimum equity points before the risk-adjusted return is reported.
pub const MIN_POINTS_FOR_RATIO: usize = 10;

/// Key performance figures for the revealed prefix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiSet {
    /// Strategy equity at the cursor minus 1.
    pub strategy_return: f64,
    /// Benchmark equity at the cursor minus 1.
    pub benchmark_return: f64,
    /// Largest peak-to-trough decline, as a positive fraction.
    pub max_drawdown: f64,
    /// Annualized mean/std of period returns.
    pub risk_adjusted_return: f64,
    pub win_rate: f64,
    pub completed_trades: usize,
}

impl KpiSet {
    /// Compute every KPI from the price and performance prefixes.
    pub fn compute(price: &PriceView, performance: &PerformanceView) -> Self {
        let strategy = performance.strategy_equity();
        let benchmark = performance.benchmark_equity();
        let (buys, sells) = (price.buy_indices(), price.sell_indices());
        Self {
            strategy_return: cumulative_return(strategy),
            benchmark_return: cumulative_return(benchmark),
            max_drawdown: max_drawdown(strategy),
            risk_adjusted_return: risk_adjusted_return(strategy),
            win_rate: win_rate(buys, sells, price.close(), price.end()),
            completed_trades: completed_trades(buys, sells).count(),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Last equity value minus 1; 0.0 for an empty curve.
pub fn cumulative_return(equity: &[f64]) -> f64 {
    equity.last().map(|e| e - 1.0).unwrap_or(0.0)
}

/// Maximum drawdown as a positive fraction of the running peak.
///
/// Returns 0.0 for fewer than 2 points and for non-decreasing curves.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }
    let mut peak = equity[0];
    let mut max_dd = 0.0_f64;

    for &eq in &equity[1..] {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (peak - eq) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Simple period returns `(e[i] - e[i-1]) / e[i-1]`.
///
/// A zero previous value yields a 0.0 return for that period.
pub fn period_returns(equity: &[f64]) -> Vec<f64> {
    equity
        .windows(2)
        .map(|w| if w[0] != 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

/// Annualized risk-adjusted return: `mean(r) / std(r) * sqrt(252)`.
///
/// Population statistics. Returns 0.0 below [`MIN_POINTS_FOR_RATIO`] equity
/// points or when the standard deviation is exactly zero.
pub fn risk_adjusted_return(equity: &[f64]) -> f64 {
    if equity.len() < MIN_POINTS_FOR_RATIO {
        return 0.0;
    }
    let returns = period_returns(equity);
    let mean = mean(&returns);
    let std = population_std(&returns, mean);
    if std == 0.0 {
        return 0.0;
    }
    (mean / std) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Pair buys and sells by position: the i-th buy with the i-th sell.
///
/// Only pairs where the sell comes after the buy count as completed trades.
/// Both slices must be ascending.
pub fn completed_trades<'a>(
    buys: &'a [usize],
    sells: &'a [usize],
) -> impl Iterator<Item = (usize, usize)> + 'a {
    buys.iter()
        .zip(sells.iter())
        .filter(|(b, s)| s > b)
        .map(|(&b, &s)| (b, s))
}

/// Win rate over signals revealed up to `cursor` (inclusive).
///
/// The index sets are filtered to `<= cursor` and paired positionally; a
/// trade wins when the close at the sell exceeds the close at the buy.
/// Returns 0.0 when there are no completed trades.
pub fn win_rate(buys: &[usize], sells: &[usize], close: &[f64], cursor: usize) -> f64 {
    let buys = &buys[..buys.partition_point(|&i| i <= cursor)];
    let sells = &sells[..sells.partition_point(|&i| i <= cursor)];
    let mut wins = 0;
    let mut total = 0;
    for (buy, sell) in completed_trades(buys, sells) {
        total += 1;
        if close[sell] > close[buy] {
            wins += 1;
        }
    }
    ratio(wins, total)
}

fn ratio(wins: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        wins as f64 / total as f64
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::slicer::{slice_performance, slice_price};
    use crate::test_support::dataset_from_closes;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    // ── Max drawdown ──

    #[test]
    fn max_dd_reference_curve() {
        let dd = max_drawdown(&[1.0, 1.2, 0.9, 1.5]);
        assert_eq!(dd, (1.2 - 0.9) / 1.2);
        assert!(approx(dd, 0.25));
    }

    #[test]
    fn max_dd_non_decreasing_is_zero() {
        assert_eq!(max_drawdown(&[1.0, 1.0, 1.1, 1.3, 1.3]), 0.0);
    }

    #[test]
    fn max_dd_short_input() {
        assert_eq!(max_drawdown(&[]), 0.0);
        assert_eq!(max_drawdown(&[0.5]), 0.0);
    }

    #[test]
    fn max_dd_keeps_the_worst_trough() {
        // Peak 2.0 → 1.0 (50%), later peak 3.0 → 2.4 (20%)
        let dd = max_drawdown(&[1.0, 2.0, 1.0, 3.0, 2.4]);
        assert!(approx(dd, 0.5));
    }

    #[test]
    fn max_dd_zero_peak_does_not_divide() {
        assert_eq!(max_drawdown(&[0.0, 0.0, 0.0]), 0.0);
    }

    // ── Risk-adjusted return ──

    #[test]
    fn ratio_constant_equity_is_zero() {
        assert_eq!(risk_adjusted_return(&[1.0; 30]), 0.0);
    }

    #[test]
    fn ratio_needs_ten_points() {
        let nine = [1.0, 1.01, 0.99, 1.02, 1.03, 1.0, 1.05, 1.04, 1.06];
        assert_eq!(risk_adjusted_return(&nine), 0.0);
    }

    #[test]
    fn ratio_matches_population_formula() {
        let eq = [1.0, 1.01, 0.99, 1.02, 1.03, 1.0, 1.05, 1.04, 1.06, 1.08];
        let r = period_returns(&eq);
        assert_eq!(r.len(), 9);
        let m = r.iter().sum::<f64>() / 9.0;
        let sd = (r.iter().map(|x| (x - m).powi(2)).sum::<f64>() / 9.0).sqrt();
        let expected = m / sd * 252.0_f64.sqrt();
        assert!(approx(risk_adjusted_return(&eq), expected));
        assert!(risk_adjusted_return(&eq) > 0.0);
    }

    #[test]
    fn ratio_negative_for_falling_noisy_curve() {
        let eq = [1.0, 0.98, 0.99, 0.95, 0.96, 0.92, 0.93, 0.90, 0.91, 0.87];
        assert!(risk_adjusted_return(&eq) < 0.0);
    }

    #[test]
    fn constant_growth_has_zero_std() {
        // Every return identical → std exactly zero.
        let eq: Vec<f64> = (0..12).map(|i| 2f64.powi(i)).collect();
        assert_eq!(risk_adjusted_return(&eq), 0.0);
    }

    // ── Win rate ──

    #[test]
    fn win_rate_reference_case() {
        let close = [0.0, 0.0, 10.0, 0.0, 12.0, 20.0, 0.0, 18.0];
        assert_eq!(win_rate(&[2, 5], &[4, 7], &close, 7), 0.5);
    }

    #[test]
    fn win_rate_ignores_unrevealed_signals() {
        let close = [0.0, 0.0, 10.0, 0.0, 12.0, 20.0, 0.0, 18.0];
        // At cursor 5 only the (2, 4) pair is complete.
        assert_eq!(win_rate(&[2, 5], &[4, 7], &close, 5), 1.0);
        // At cursor 3 nothing is complete.
        assert_eq!(win_rate(&[2, 5], &[4, 7], &close, 3), 0.0);
    }

    #[test]
    fn win_rate_pairs_by_position_not_chronology() {
        // Buys at 1 and 2 before the sell at 3: pairs are (1,3) and (2,_).
        let close = [5.0, 10.0, 1.0, 11.0, 0.0];
        assert_eq!(win_rate(&[1, 2], &[3], &close, 4), 1.0);
        // Pairs (2, 0) and (4, 3) are both inverted, so nothing completes.
        let close = [5.0, 10.0, 1.0, 11.0, 0.0];
        assert_eq!(win_rate(&[2, 4], &[0, 3], &close, 4), 0.0);
    }

    #[test]
    fn win_rate_equal_close_is_a_loss() {
        let close = [10.0, 10.0];
        assert_eq!(win_rate(&[0], &[1], &close, 1), 0.0);
    }

    #[test]
    fn completed_trades_skip_inverted_pairs() {
        let pairs: Vec<_> = completed_trades(&[1, 6], &[0, 8]).collect();
        assert_eq!(pairs, vec![(6, 8)]);
    }

    // ── KPI set ──

    #[test]
    fn kpis_from_views() {
        let closes = [100.0, 110.0, 99.0, 121.0, 130.0];
        let ds = Arc::new(dataset_from_closes(&closes, &[0, 3], &[1, 4]));
        let price = slice_price(&ds, 4);
        let perf = slice_performance(&ds, 4);
        let kpis = KpiSet::compute(&price, &perf);

        assert!(approx(kpis.strategy_return, 0.3));
        assert!(approx(kpis.benchmark_return, 0.3));
        assert!(approx(kpis.max_drawdown, (1.1 - 0.99) / 1.1));
        assert_eq!(kpis.risk_adjusted_return, 0.0); // only 5 points
        assert_eq!(kpis.completed_trades, 2);
        assert_eq!(kpis.win_rate, 1.0);
    }

    #[test]
    fn kpi_win_rate_tracks_cursor() {
        let closes = [100.0, 110.0, 99.0, 121.0, 130.0, 90.0, 95.0, 80.0];
        let (buys, sells) = ([0, 2, 5], [1, 4, 7]);
        let ds = Arc::new(dataset_from_closes(&closes, &buys, &sells));
        for cursor in 0..closes.len() {
            let kpis = KpiSet::compute(&slice_price(&ds, cursor), &slice_performance(&ds, cursor));
            assert_eq!(kpis.win_rate, win_rate(&buys, &sells, &closes, cursor), "cursor {cursor}");
        }
        let last = KpiSet::compute(&slice_price(&ds, 7), &slice_performance(&ds, 7));
        assert_eq!(last.completed_trades, 3);
        assert!(approx(last.win_rate, 2.0 / 3.0));
    }

    #[test]
    fn kpis_at_earlier_cursor_use_prefix_only() {
        let closes = [100.0, 110.0, 99.0, 121.0, 130.0];
        let ds = Arc::new(dataset_from_closes(&closes, &[0, 3], &[1, 4]));
        let kpis = KpiSet::compute(&slice_price(&ds, 2), &slice_performance(&ds, 2));
        assert!(approx(kpis.strategy_return, -0.01));
        assert_eq!(kpis.completed_trades, 1);
    }
}
