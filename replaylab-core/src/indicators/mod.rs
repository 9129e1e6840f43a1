//! Indicators over a close-price series.
//!
//! Each indicator maps the full series to an output series of the same
//! length. Warm-up positions are `None`. Output at index `t` depends only
//! on inputs `0..=t`, so a truncated series yields a prefix of the full
//! result.

pub mod bollinger;
pub mod kalman;
pub mod sma;

pub use bollinger::BollingerBands;
pub use kalman::KalmanTrend;
pub use sma::Sma;

/// A single-output indicator over close prices.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_5", "kalman_trend").
    fn name(&self) -> &str;

    /// Number of points needed before the indicator produces a value.
    fn lookback(&self) -> usize;

    /// Compute over the whole series. Output length equals `closes.len()`.
    fn compute(&self, closes: &[f64]) -> Vec<Option<f64>>;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
