//! Dataset — the immutable input to a playback session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::series::{PerformanceSeries, PriceSeries, SentimentSeries};

/// Structural problems that make a dataset unusable for playback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("price series is empty")]
    EmptyPriceSeries,

    #[error("sentiment series is empty")]
    EmptySentimentSeries,

    #[error("{series}.{column} has length {actual}, expected {expected}")]
    LengthMismatch {
        series: &'static str,
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{set} index {index} is out of range for {len} points")]
    IndexOutOfRange {
        set: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{set} indices are not strictly ascending at position {position}")]
    IndicesNotAscending { set: &'static str, position: usize },

    #[error("index {index} is both a buy and a sell signal")]
    ConflictingSignal { index: usize },
}

/// Price, sentiment and performance series for one replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub price: PriceSeries,
    pub sentiment: SentimentSeries,
    pub performance: PerformanceSeries,
}

impl Dataset {
    /// Build a dataset, rejecting anything that would break slicing.
    pub fn new(
        price: PriceSeries,
        sentiment: SentimentSeries,
        performance: PerformanceSeries,
    ) -> Result<Self, DatasetError> {
        let dataset = Self {
            price,
            sentiment,
            performance,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Number of points on the primary (price) timeline.
    pub fn len(&self) -> usize {
        self.price.len()
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_empty()
    }

    /// Last valid cursor position. Only meaningful for a validated dataset.
    pub fn last_index(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Check every structural invariant the slicer relies on.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let n = self.price.len();
        if n == 0 {
            return Err(DatasetError::EmptyPriceSeries);
        }

        let p = &self.price;
        check_len("price", "close", n, p.close.len())?;
        check_len("price", "bb_upper", n, p.bb_upper.len())?;
        check_len("price", "bb_middle", n, p.bb_middle.len())?;
        check_len("price", "bb_lower", n, p.bb_lower.len())?;
        check_len("price", "sma_short", n, p.sma_short.len())?;
        check_len("price", "sma_long", n, p.sma_long.len())?;

        check_indices("buy", &p.buy_indices, n)?;
        check_indices("sell", &p.sell_indices, n)?;
        // Both sets are sorted, so a merge walk finds any overlap.
        let (mut i, mut j) = (0, 0);
        while i < p.buy_indices.len() && j < p.sell_indices.len() {
            let (b, s) = (p.buy_indices[i], p.sell_indices[j]);
            if b == s {
                return Err(DatasetError::ConflictingSignal { index: b });
            }
            if b < s {
                i += 1;
            } else {
                j += 1;
            }
        }

        let s = &self.sentiment;
        if s.is_empty() {
            return Err(DatasetError::EmptySentimentSeries);
        }
        check_len("sentiment", "values", s.len(), s.values.len())?;
        check_len("sentiment", "regimes", s.len(), s.regimes.len())?;

        let perf = &self.performance;
        check_len("performance", "dates", n, perf.dates.len())?;
        check_len("performance", "strategy_equity", n, perf.strategy_equity.len())?;
        check_len("performance", "benchmark_equity", n, perf.benchmark_equity.len())?;

        Ok(())
    }
}

fn check_len(
    series: &'static str,
    column: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), DatasetError> {
    if expected != actual {
        return Err(DatasetError::LengthMismatch {
            series,
            column,
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_indices(set: &'static str, indices: &[usize], len: usize) -> Result<(), DatasetError> {
    for (position, &index) in indices.iter().enumerate() {
        if index >= len {
            return Err(DatasetError::IndexOutOfRange { set, index, len });
        }
        if position > 0 && indices[position - 1] >= index {
            return Err(DatasetError::IndicesNotAscending { set, position });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::dataset_with_signals;

    #[test]
    fn valid_dataset_passes() {
        let ds = dataset_with_signals(10, &[2, 6], &[4, 8]);
        assert!(ds.validate().is_ok());
        assert_eq!(ds.len(), 10);
        assert_eq!(ds.last_index(), 9);
    }

    #[test]
    fn rejects_empty_price() {
        let mut ds = dataset_with_signals(3, &[], &[]);
        ds.price = PriceSeries::from_closes(vec![], vec![]);
        assert_eq!(ds.validate(), Err(DatasetError::EmptyPriceSeries));
    }

    #[test]
    fn rejects_short_column() {
        let mut ds = dataset_with_signals(5, &[], &[]);
        ds.price.sma_long.pop();
        assert!(matches!(
            ds.validate(),
            Err(DatasetError::LengthMismatch { column: "sma_long", expected: 5, actual: 4, .. })
        ));
    }

    #[test]
    fn rejects_performance_length_mismatch() {
        let mut ds = dataset_with_signals(5, &[], &[]);
        ds.performance.strategy_equity.push(1.0);
        assert!(matches!(
            ds.validate(),
            Err(DatasetError::LengthMismatch { series: "performance", .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let ds = dataset_with_signals(5, &[5], &[]);
        assert_eq!(
            ds.validate(),
            Err(DatasetError::IndexOutOfRange { set: "buy", index: 5, len: 5 })
        );
    }

    #[test]
    fn rejects_unsorted_indices() {
        let ds = dataset_with_signals(10, &[], &[6, 3]);
        assert_eq!(
            ds.validate(),
            Err(DatasetError::IndicesNotAscending { set: "sell", position: 1 })
        );
    }

    #[test]
    fn rejects_duplicate_index_in_one_set() {
        let ds = dataset_with_signals(10, &[3, 3], &[]);
        assert!(matches!(
            ds.validate(),
            Err(DatasetError::IndicesNotAscending { set: "buy", .. })
        ));
    }

    #[test]
    fn rejects_buy_and_sell_on_same_point() {
        let ds = dataset_with_signals(10, &[1, 4], &[2, 4]);
        assert_eq!(ds.validate(), Err(DatasetError::ConflictingSignal { index: 4 }));
    }

    #[test]
    fn sentiment_may_differ_in_length() {
        let mut ds = dataset_with_signals(10, &[], &[]);
        ds.sentiment.dates.truncate(4);
        ds.sentiment.values.truncate(4);
        ds.sentiment.regimes.truncate(4);
        assert!(ds.validate().is_ok());
    }

    #[test]
    fn dataset_json_roundtrip() {
        let ds = dataset_with_signals(6, &[1], &[3]);
        let json = serde_json::to_string(&ds).unwrap();
        let back: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(ds, back);
    }
}
