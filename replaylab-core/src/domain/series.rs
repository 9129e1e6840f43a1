//! The three aligned series that make up a replay dataset.
//!
//! All three are column-oriented: one `Vec` per field, indexed by point.
//! Indicator columns are `Option<f64>` because rolling windows have no value
//! until they fill; `None` serializes as JSON `null`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Price and indicator columns plus the buy/sell signal positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub sma_short: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
    /// Strictly ascending positions where a Buy signal fired.
    pub buy_indices: Vec<usize>,
    /// Strictly ascending positions where a Sell signal fired.
    pub sell_indices: Vec<usize>,
}

impl PriceSeries {
    /// Number of points in the series.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// A series with only dates and closes; every indicator column is empty (`None`).
    pub fn from_closes(dates: Vec<NaiveDate>, close: Vec<f64>) -> Self {
        let n = close.len();
        Self {
            dates,
            close,
            bb_upper: vec![None; n],
            bb_middle: vec![None; n],
            bb_lower: vec![None; n],
            sma_short: vec![None; n],
            sma_long: vec![None; n],
            buy_indices: Vec::new(),
            sell_indices: Vec::new(),
        }
    }
}

/// Fear & Greed readings, one per point. May be shorter or longer than the price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSeries {
    pub dates: Vec<NaiveDate>,
    /// Index value in [0, 100].
    pub values: Vec<f64>,
    pub regimes: Vec<SentimentRegime>,
}

impl SentimentSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Strategy and benchmark equity curves (cumulative return multipliers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSeries {
    pub dates: Vec<NaiveDate>,
    pub strategy_equity: Vec<f64>,
    pub benchmark_equity: Vec<f64>,
}

impl PerformanceSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Qualitative Fear & Greed bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentRegime {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl SentimentRegime {
    /// Classify an index value.
    ///
    /// Boundaries: `<= extreme_fear` → ExtremeFear, `< 45` → Fear, `<= 55` → Neutral,
    /// `< extreme_greed` → Greed, otherwise ExtremeGreed.
    pub fn classify(value: f64, extreme_fear: f64, extreme_greed: f64) -> Self {
        if value <= extreme_fear {
            SentimentRegime::ExtremeFear
        } else if value < 45.0 {
            SentimentRegime::Fear
        } else if value <= 55.0 {
            SentimentRegime::Neutral
        } else if value < extreme_greed {
            SentimentRegime::Greed
        } else {
            SentimentRegime::ExtremeGreed
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SentimentRegime::ExtremeFear => "Extreme Fear",
            SentimentRegime::Fear => "Fear",
            SentimentRegime::Neutral => "Neutral",
            SentimentRegime::Greed => "Greed",
            SentimentRegime::ExtremeGreed => "Extreme Greed",
        }
    }
}
