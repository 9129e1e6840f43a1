//! One-dimensional Kalman filter trend estimate.
//!
//! A random-walk state model smoothing the close series. The estimate
//! starts at the first close; there is no warm-up, so every output is `Some`.

pub const DEFAULT_PROCESS_VARIANCE: f64 = 1e-5;
pub const DEFAULT_MEASUREMENT_VARIANCE: f64 = 1e-2;
pub const DEFAULT_INITIAL_VARIANCE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct KalmanTrend {
    pub process_variance: f64,
    pub measurement_variance: f64,
    pub initial_variance: f64,
}

impl Default for KalmanTrend {
    fn default() -> Self {
        Self {
            process_variance: DEFAULT_PROCESS_VARIANCE,
            measurement_variance: DEFAULT_MEASUREMENT_VARIANCE,
            initial_variance: DEFAULT_INITIAL_VARIANCE,
        }
    }
}

impl KalmanTrend {
    /// The raw estimates, one per close.
    pub fn estimate(&self, closes: &[f64]) -> Vec<f64> {
        let Some(&first) = closes.first() else {
            return Vec::new();
        };

        let mut estimates = Vec::with_capacity(closes.len());
        let mut estimate = first;
        let mut variance = self.initial_variance;
        estimates.push(estimate);

        for &x in &closes[1..] {
            // Predict
            variance += self.process_variance;
            // Update
            let gain = variance / (variance + self.measurement_variance);
            estimate += gain * (x - estimate);
            variance *= 1.0 - gain;
            estimates.push(estimate);
        }

        estimates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn std(xs: &[f64]) -> f64 {
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        (xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / xs.len() as f64).sqrt()
    }

    #[test]
    fn empty_input() {
        assert!(KalmanTrend::default().estimate(&[]).is_empty());
    }

    #[test]
    fn starts_at_first_close() {
        let est = KalmanTrend::default().estimate(&[100.0, 110.0]);
        assert_eq!(est[0], 100.0);
    }

    #[test]
    fn first_update_matches_hand_computation() {
        let est = KalmanTrend::default().estimate(&[100.0, 110.0]);
        let v = 1.0 + 1e-5;
        let gain = v / (v + 1e-2);
        assert_approx(est[1], 100.0 + gain * 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn constant_series_is_fixed_point() {
        let est = KalmanTrend::default().estimate(&[42.0; 30]);
        assert!(est.iter().all(|&e| (e - 42.0).abs() < DEFAULT_EPSILON));
    }

    #[test]
    fn smooths_a_noisy_series() {
        // Deterministic zig-zag around a slow drift.
        let raw: Vec<f64> = (0..200)
            .map(|i| 100.0 + i as f64 * 0.05 + if i % 2 == 0 { 3.0 } else { -3.0 })
            .collect();
        let trend = KalmanTrend::default().estimate(&raw);
        assert!(std(&trend) < std(&raw));
    }
}
