//! Long/flat backtest and full-run summary metrics.
//!
//! Every metric is a pure function over the return or equity series.
//! These figures describe the whole run; they are reported by the CLI and
//! stored with exports but never shown during playback, where only
//! trailing metrics over the revealed prefix are allowed.

use serde::{Deserialize, Serialize};

use replaylab_core::strategy::Position;

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Per-day curves produced by a backtest.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BacktestCurves {
    /// Previous day's exposure times today's return.
    pub strategy_returns: Vec<f64>,
    pub strategy_equity: Vec<f64>,
    pub benchmark_equity: Vec<f64>,
    /// Exposure held during each day (the previous day's position).
    pub lagged_exposure: Vec<f64>,
}

/// Aggregate metrics for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub strategy_cumulative_return: f64,
    pub benchmark_cumulative_return: f64,
    /// Deepest decline from the running peak, as a negative fraction.
    pub strategy_max_drawdown: f64,
    pub strategy_sharpe_ratio: f64,
    /// Share of in-market days with a positive strategy return.
    pub strategy_hit_rate: f64,
    pub days_in_market: usize,
    pub trade_count: usize,
}

impl BacktestSummary {
    /// Compute every metric from backtest curves.
    pub fn compute(curves: &BacktestCurves, trade_count: usize) -> Self {
        let days_in_market = curves.lagged_exposure.iter().filter(|&&e| e != 0.0).count();
        Self {
            strategy_cumulative_return: cumulative_return(&curves.strategy_equity),
            benchmark_cumulative_return: cumulative_return(&curves.benchmark_equity),
            strategy_max_drawdown: max_drawdown(&curves.strategy_equity),
            strategy_sharpe_ratio: sharpe_ratio(&curves.strategy_returns),
            strategy_hit_rate: hit_rate(&curves.strategy_returns, &curves.lagged_exposure),
            days_in_market,
            trade_count,
        }
    }

    /// `(label, value)` pairs in report order.
    pub fn rows(&self) -> [(&'static str, f64); 5] {
        [
            ("strategy_cumulative_return", self.strategy_cumulative_return),
            ("benchmark_cumulative_return", self.benchmark_cumulative_return),
            ("strategy_max_drawdown", self.strategy_max_drawdown),
            ("strategy_sharpe_ratio", self.strategy_sharpe_ratio),
            ("strategy_hit_rate", self.strategy_hit_rate),
        ]
    }
}

/// Run the long/flat backtest.
///
/// A position decided on day `t` earns day `t + 1`'s return; the first day
/// is always flat.
pub fn run_backtest(returns: &[f64], positions: &[Position]) -> BacktestCurves {
    debug_assert_eq!(returns.len(), positions.len());

    let lagged_exposure: Vec<f64> = std::iter::once(0.0)
        .chain(positions.iter().map(|p| p.exposure()))
        .take(returns.len())
        .collect();
    let strategy_returns: Vec<f64> = returns
        .iter()
        .zip(&lagged_exposure)
        .map(|(r, e)| r * e)
        .collect();

    BacktestCurves {
        strategy_equity: equity_curve(&strategy_returns),
        benchmark_equity: equity_curve(returns),
        strategy_returns,
        lagged_exposure,
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Cumulative product of `1 + r`.
pub fn equity_curve(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |eq, r| {
            *eq *= 1.0 + r;
            Some(*eq)
        })
        .collect()
}

/// Final equity minus 1; 0.0 for an empty curve.
pub fn cumulative_return(equity: &[f64]) -> f64 {
    equity.last().map(|e| e - 1.0).unwrap_or(0.0)
}

/// Minimum of `equity / running_max - 1`: zero or negative.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &eq in equity {
        peak = peak.max(eq);
        if peak > 0.0 {
            worst = worst.min(eq / peak - 1.0);
        }
    }
    worst
}

/// Annualized Sharpe ratio of daily returns (zero risk-free rate).
///
/// Sample standard deviation. Returns 0.0 with fewer than 2 returns or
/// zero variance.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(returns);
    let std = std_dev(returns);
    if std <= 0.0 {
        return 0.0;
    }
    (mean / std) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Fraction of days with non-zero exposure whose strategy return is positive.
pub fn hit_rate(strategy_returns: &[f64], exposure: &[f64]) -> f64 {
    let (wins, days) = strategy_returns
        .iter()
        .zip(exposure)
        .filter(|&(_, &e)| e != 0.0)
        .fold((0usize, 0usize), |(w, n), (&r, _)| (w + usize::from(r > 0.0), n + 1));
    if days == 0 {
        0.0
    } else {
        wins as f64 / days as f64
    }
}

fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (N - 1).
fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean_f64(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}
