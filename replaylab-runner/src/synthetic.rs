//! Deterministic synthetic market data for demos and tests.
//!
//! A seeded random walk for the close and a mean-reverting Fear & Greed
//! series clamped to [0, 100], one point per calendar day. The same seed
//! always produces the same data.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data_loader::{
    merge_price_and_sentiment, DataSource, LoadError, LoadedData, PricePoint, SentimentPoint,
};

/// Default seed label for synthetic runs.
pub const DEFAULT_SEED: &str = "replaylab-synthetic";

/// Seed an RNG from a label via BLAKE3.
fn rng_for(seed: &str) -> StdRng {
    let hash = blake3::hash(seed.as_bytes());
    StdRng::from_seed(*hash.as_bytes())
}

/// Generate closes and Fear & Greed readings for every day in `[start, end]`.
pub fn generate_series(
    seed: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> (Vec<PricePoint>, Vec<SentimentPoint>) {
    let mut rng = rng_for(seed);
    let mut prices = Vec::new();
    let mut sentiment = Vec::new();

    let mut close = 30_000.0_f64;
    let mut fg = 50.0_f64;

    for date in start.iter_days().take_while(|d| *d <= end) {
        let daily_return: f64 = rng.gen_range(-0.04..0.042);
        close *= 1.0 + daily_return;

        // Sentiment leans with the day's move and drifts back toward neutral.
        let shock: f64 = rng.gen_range(-6.0..6.0);
        fg += shock + daily_return * 150.0 + (50.0 - fg) * 0.05;
        fg = fg.clamp(0.0, 100.0);

        prices.push(PricePoint { date, close });
        sentiment.push(SentimentPoint {
            date,
            value: fg.round(),
            classification: None,
        });
    }

    (prices, sentiment)
}

/// Synthetic data merged the same way as CSV input.
pub fn synthetic_data(seed: &str, start: NaiveDate, end: NaiveDate) -> Result<LoadedData, LoadError> {
    let (prices, sentiment) = generate_series(seed, start, end);
    let rows = merge_price_and_sentiment(&prices, &sentiment)?;
    tracing::info!(seed, rows = rows.len(), "generated synthetic data");
    Ok(LoadedData::new(rows, DataSource::Synthetic))
}
