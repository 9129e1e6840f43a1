//! Slicer — read-only prefix views of a dataset.
//!
//! A view is an `Arc` to the dataset plus an inclusive end bound. Every
//! accessor returns a sub-slice ending at that bound, so nothing past the
//! cursor is reachable through a view. Signal index sets are sorted, which
//! makes "all indices <= end" a prefix found by binary search.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{Dataset, SentimentRegime};

/// Price/indicator prefix `[0, end]`.
#[derive(Debug, Clone)]
pub struct PriceView {
    dataset: Arc<Dataset>,
    end: usize,
    buy_end: usize,
    sell_end: usize,
}

impl PriceView {
    /// Inclusive end index of this view.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dataset.price.dates[..=self.end]
    }

    pub fn close(&self) -> &[f64] {
        &self.dataset.price.close[..=self.end]
    }

    pub fn bb_upper(&self) -> &[Option<f64>] {
        &self.dataset.price.bb_upper[..=self.end]
    }

    pub fn bb_middle(&self) -> &[Option<f64>] {
        &self.dataset.price.bb_middle[..=self.end]
    }

    pub fn bb_lower(&self) -> &[Option<f64>] {
        &self.dataset.price.bb_lower[..=self.end]
    }

    pub fn sma_short(&self) -> &[Option<f64>] {
        &self.dataset.price.sma_short[..=self.end]
    }

    pub fn sma_long(&self) -> &[Option<f64>] {
        &self.dataset.price.sma_long[..=self.end]
    }

    /// Buy positions `<= end`, ascending.
    pub fn buy_indices(&self) -> &[usize] {
        &self.dataset.price.buy_indices[..self.buy_end]
    }

    /// Sell positions `<= end`, ascending.
    pub fn sell_indices(&self) -> &[usize] {
        &self.dataset.price.sell_indices[..self.sell_end]
    }

    /// Close at the end of the view.
    pub fn last_close(&self) -> f64 {
        self.dataset.price.close[self.end]
    }

    pub fn last_date(&self) -> NaiveDate {
        self.dataset.price.dates[self.end]
    }
}

/// Sentiment prefix `[0, end]`; `end` is already clamped to the sentiment length.
#[derive(Debug, Clone)]
pub struct SentimentView {
    dataset: Arc<Dataset>,
    end: usize,
}

impl SentimentView {
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dataset.sentiment.dates[..=self.end]
    }

    pub fn values(&self) -> &[f64] {
        &self.dataset.sentiment.values[..=self.end]
    }

    pub fn regimes(&self) -> &[SentimentRegime] {
        &self.dataset.sentiment.regimes[..=self.end]
    }

    pub fn last_value(&self) -> f64 {
        self.dataset.sentiment.values[self.end]
    }

    pub fn last_regime(&self) -> SentimentRegime {
        self.dataset.sentiment.regimes[self.end]
    }
}

/// Equity-curve prefix `[0, end]`.
#[derive(Debug, Clone)]
pub struct PerformanceView {
    dataset: Arc<Dataset>,
    end: usize,
}

impl PerformanceView {
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dataset.performance.dates[..=self.end]
    }

    pub fn strategy_equity(&self) -> &[f64] {
        &self.dataset.performance.strategy_equity[..=self.end]
    }

    pub fn benchmark_equity(&self) -> &[f64] {
        &self.dataset.performance.benchmark_equity[..=self.end]
    }
}

/// Clamp a bound into `[0, len)`. Out-of-range bounds are caller bugs.
fn clamp_end(end: usize, len: usize, what: &str) -> usize {
    debug_assert!(len > 0, "{what}: slicing an empty series");
    debug_assert!(end < len, "{what}: end {end} out of range for {len} points");
    end.min(len.saturating_sub(1))
}

/// Price view ending at `end` (inclusive).
pub fn slice_price(dataset: &Arc<Dataset>, end: usize) -> PriceView {
    let end = clamp_end(end, dataset.price.len(), "price");
    let buy_end = dataset.price.buy_indices.partition_point(|&i| i <= end);
    let sell_end = dataset.price.sell_indices.partition_point(|&i| i <= end);
    PriceView {
        dataset: Arc::clone(dataset),
        end,
        buy_end,
        sell_end,
    }
}

/// Sentiment view ending at `end` (inclusive). Use [`sentiment_cursor`] to map a price cursor.
pub fn slice_sentiment(dataset: &Arc<Dataset>, end: usize) -> SentimentView {
    let end = clamp_end(end, dataset.sentiment.len(), "sentiment");
    SentimentView {
        dataset: Arc::clone(dataset),
        end,
    }
}

/// Performance view ending at `end` (inclusive).
pub fn slice_performance(dataset: &Arc<Dataset>, end: usize) -> PerformanceView {
    let end = clamp_end(end, dataset.performance.len(), "performance");
    PerformanceView {
        dataset: Arc::clone(dataset),
        end,
    }
}

/// Map a price cursor onto the sentiment timeline: `min(cursor, M - 1)`.
pub fn sentiment_cursor(dataset: &Dataset, cursor: usize) -> usize {
    cursor.min(dataset.sentiment.len().saturating_sub(1))
}

/// All three views for one cursor position.
#[derive(Debug, Clone)]
pub struct DatasetView {
    pub price: PriceView,
    pub sentiment: SentimentView,
    pub performance: PerformanceView,
}

/// Slice every series at `cursor`, clamping the sentiment bound.
pub fn slice_all(dataset: &Arc<Dataset>, cursor: usize) -> DatasetView {
    DatasetView {
        price: slice_price(dataset, cursor),
        sentiment: slice_sentiment(dataset, sentiment_cursor(dataset, cursor)),
        performance: slice_performance(dataset, cursor),
    }
}
