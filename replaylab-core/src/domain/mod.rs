//! Domain types for ReplayLab

pub mod dataset;
pub mod series;

pub use dataset::{Dataset, DatasetError};
pub use series::{PerformanceSeries, PriceSeries, SentimentRegime, SentimentSeries};
