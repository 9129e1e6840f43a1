//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! Three bands:
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses sample stddev (divide by N - 1), so a period of 1 has a middle
//! band but no upper or lower band.
//! Lookback: period - 1.

/// Mean and sample stddev of a window. Stddev is `None` for a single point.
fn window_stats(window: &[f64]) -> (f64, Option<f64>) {
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    if window.len() < 2 {
        return (mean, None);
    }
    let variance = window.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0);
    (mean, Some(variance.sqrt()))
}

/// All three bands computed in one pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

impl BollingerBands {
    pub fn compute(closes: &[f64], period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let n = closes.len();
        let mut bands = Self {
            upper: vec![None; n],
            middle: vec![None; n],
            lower: vec![None; n],
        };
        if n < period {
            return bands;
        }
        for i in (period - 1)..n {
            let (mean, stddev) = window_stats(&closes[i + 1 - period..=i]);
            bands.middle[i] = Some(mean);
            bands.upper[i] = stddev.map(|s| mean + multiplier * s);
            bands.lower[i] = stddev.map(|s| mean - multiplier * s);
        }
        bands
    }
}
