//! Dataset builders shared by unit tests.

use chrono::{Duration, NaiveDate};

use crate::domain::{
    Dataset, PerformanceSeries, PriceSeries, SentimentRegime, SentimentSeries,
};

pub fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

pub fn dates(n: usize) -> Vec<NaiveDate> {
    (0..n).map(|i| base_date() + Duration::days(i as i64)).collect()
}

/// Closes `100, 101, ...`, flat sentiment, gently rising equity. Not validated.
pub fn dataset_with_signals(n: usize, buys: &[usize], sells: &[usize]) -> Dataset {
    let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
    dataset_from_closes(&closes, buys, sells)
}

/// Dataset over the given closes. Equity tracks the closes normalized to 1.0.
pub fn dataset_from_closes(closes: &[f64], buys: &[usize], sells: &[usize]) -> Dataset {
    let n = closes.len();
    let mut price = PriceSeries::from_closes(dates(n), closes.to_vec());
    price.buy_indices = buys.to_vec();
    price.sell_indices = sells.to_vec();

    let first = closes.first().copied().unwrap_or(1.0);
    let equity: Vec<f64> = closes.iter().map(|c| c / first).collect();

    Dataset {
        price,
        sentiment: SentimentSeries {
            dates: dates(n),
            values: vec![50.0; n],
            regimes: vec![SentimentRegime::Neutral; n],
        },
        performance: PerformanceSeries {
            dates: dates(n),
            strategy_equity: equity.clone(),
            benchmark_equity: equity,
        },
    }
}
