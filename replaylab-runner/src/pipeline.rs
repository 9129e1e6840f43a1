//! Dataset pipeline — merged rows in, replayable dataset out.
//!
//! indicators → sentiment regimes → positions → trade signals → backtest →
//! rounding → validated [`Dataset`]. Everything here runs once per
//! (data, parameters) pair, before playback starts.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use replaylab_core::domain::{
    Dataset, DatasetError, PerformanceSeries, PriceSeries, SentimentRegime, SentimentSeries,
};
use replaylab_core::indicators::{BollingerBands, Indicator, KalmanTrend, Sma};
use replaylab_core::strategy::{
    generate_positions, generate_trade_signals, latest_recommendation, signal_indices,
    Recommendation, StrategyInputs,
};
use replaylab_core::SignalKind;

use crate::backtest::{run_backtest, BacktestSummary};
use crate::config::{ConfigError, ReplayConfig, StrategyParams};
use crate::data_loader::{load_csv_data, DataSource, LoadError, LoadedData};
use crate::synthetic::{synthetic_data, DEFAULT_SEED};

/// Errors from building a dataset.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid strategy parameters: {0}")]
    Params(#[from] ConfigError),

    #[error("no input rows")]
    Empty,

    #[error("built dataset is invalid: {0}")]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Where the input series for a build come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// The CSV files named in [`DataConfig`](crate::config::DataConfig).
    Csv,
    /// Seeded synthetic data over the configured date range.
    Synthetic { seed: String },
}

impl InputSource {
    pub fn synthetic() -> Self {
        Self::Synthetic {
            seed: DEFAULT_SEED.to_string(),
        }
    }
}

/// Load the input series named by `config` and `source`.
pub fn load_input(config: &ReplayConfig, source: &InputSource) -> Result<LoadedData, LoadError> {
    match source {
        InputSource::Csv => load_csv_data(&config.data),
        InputSource::Synthetic { seed } => {
            synthetic_data(seed, config.data.start_date, config.data.end_date)
        }
    }
}

/// Load the input series and build the dataset in one step.
pub fn load_and_build(
    config: &ReplayConfig,
    source: &InputSource,
) -> Result<BuiltDataset, PipelineError> {
    config.validate()?;
    let data = load_input(config, source)?;
    build_dataset(&data, &config.strategy)
}

/// A replayable dataset plus the full-run figures that describe it.
#[derive(Debug, Clone)]
pub struct BuiltDataset {
    pub dataset: Arc<Dataset>,
    pub summary: BacktestSummary,
    pub recommendation: Recommendation,
    pub params: StrategyParams,
    pub source: DataSource,
    pub data_hash: String,
}

/// Round to `decimals` places, ties to even.
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round_ties_even() / factor
}

fn round_opt(v: &[Option<f64>], decimals: i32) -> Vec<Option<f64>> {
    v.iter().map(|x| x.map(|x| round_to(x, decimals))).collect()
}

fn round_all(v: &[f64], decimals: i32) -> Vec<f64> {
    v.iter().map(|&x| round_to(x, decimals)).collect()
}

/// Build the dataset for `params` from merged rows.
pub fn build_dataset(
    data: &LoadedData,
    params: &StrategyParams,
) -> Result<BuiltDataset, PipelineError> {
    params.validate()?;
    if data.rows.is_empty() {
        return Err(PipelineError::Empty);
    }

    let dates: Vec<NaiveDate> = data.rows.iter().map(|r| r.date).collect();
    let closes: Vec<f64> = data.rows.iter().map(|r| r.close).collect();
    let returns: Vec<f64> = data.rows.iter().map(|r| r.ret).collect();
    let fg_values: Vec<f64> = data.rows.iter().map(|r| r.fg_value).collect();

    // Indicators
    let sma_short = Sma::new(params.short_window).compute(&closes);
    let sma_long = Sma::new(params.long_window).compute(&closes);
    let bands = BollingerBands::compute(&closes, params.bollinger_window, params.bollinger_std);
    let trend = KalmanTrend::default().estimate(&closes);

    // Sentiment
    let regimes: Vec<SentimentRegime> = fg_values
        .iter()
        .map(|&v| {
            SentimentRegime::classify(v, f64::from(params.extreme_fear), f64::from(params.extreme_greed))
        })
        .collect();

    // Strategy
    let positions = generate_positions(&StrategyInputs {
        sma_short: &sma_short,
        sma_long: &sma_long,
        trend: &trend,
        regimes: &regimes,
    });
    let signals = generate_trade_signals(&positions);
    let (buy_indices, sell_indices) = signal_indices(&signals);
    let recommendation = latest_recommendation(&signals, &sma_short, &sma_long).unwrap_or(
        Recommendation {
            signal: SignalKind::Hold,
            explanation: String::new(),
        },
    );

    // Backtest
    let curves = run_backtest(&returns, &positions);
    let summary = BacktestSummary::compute(&curves, buy_indices.len());
    debug!(
        buys = buy_indices.len(),
        sells = sell_indices.len(),
        days_in_market = summary.days_in_market,
        "strategy evaluated"
    );

    let price = PriceSeries {
        dates: dates.clone(),
        close: round_all(&closes, 2),
        bb_upper: round_opt(&bands.upper, 2),
        bb_middle: round_opt(&bands.middle, 2),
        bb_lower: round_opt(&bands.lower, 2),
        sma_short: round_opt(&sma_short, 2),
        sma_long: round_opt(&sma_long, 2),
        buy_indices,
        sell_indices,
    };
    let sentiment = SentimentSeries {
        dates: dates.clone(),
        values: round_all(&fg_values, 0),
        regimes,
    };
    let performance = PerformanceSeries {
        dates,
        strategy_equity: round_all(&curves.strategy_equity, 3),
        benchmark_equity: round_all(&curves.benchmark_equity, 3),
    };

    let dataset = Dataset::new(price, sentiment, performance)?;
    info!(
        points = dataset.len(),
        short = params.short_window,
        long = params.long_window,
        strategy_return = summary.strategy_cumulative_return,
        "dataset built"
    );

    Ok(BuiltDataset {
        dataset: Arc::new(dataset),
        summary,
        recommendation,
        params: params.clone(),
        source: data.source,
        data_hash: data.data_hash.clone(),
    })
}
