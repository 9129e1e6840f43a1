//! CSV loading and the price/sentiment merge.
//!
//! Two local CSV inputs:
//! - price: `Date` and `Close` columns (header case is ignored)
//! - Fear & Greed: a `date` or `timestamp` column, `value`, and optionally
//!   `value_classification`
//!
//! Both are filtered to the configured date range and sorted. The merge
//! keeps every price date, forward-fills sentiment onto it, computes the
//! close-to-close return, and drops the first row (which has no return).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DataConfig;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: missing column {column}")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{path}: row {row}: {reason}")]
    BadRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    #[error("{0}: no rows within the requested date range")]
    EmptyRange(PathBuf),

    #[error("no price dates with sentiment after merging")]
    EmptyMerge,
}

/// Where the input series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    Csv,
    Synthetic,
}

/// One daily close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// One Fear & Greed reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub classification: Option<String>,
}

/// A price date with its return and forward-filled sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    pub date: NaiveDate,
    pub close: f64,
    /// Close-to-close return from the previous price date.
    pub ret: f64,
    pub fg_value: f64,
}

/// Merged input ready for the pipeline.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub rows: Vec<MergedRow>,
    pub source: DataSource,
    /// BLAKE3 over the merged rows, for cache keys.
    pub data_hash: String,
}

impl LoadedData {
    pub fn new(rows: Vec<MergedRow>, source: DataSource) -> Self {
        let data_hash = hash_rows(&rows);
        Self {
            rows,
            source,
            data_hash,
        }
    }
}

/// Load both CSVs named by `config` and merge them.
pub fn load_csv_data(config: &DataConfig) -> Result<LoadedData, LoadError> {
    let prices = load_price_csv(&config.price_csv, config.start_date, config.end_date)?;
    let sentiment = load_sentiment_csv(&config.sentiment_csv, config.start_date, config.end_date)?;
    let rows = merge_price_and_sentiment(&prices, &sentiment)?;
    info!(
        prices = prices.len(),
        sentiment = sentiment.len(),
        rows = rows.len(),
        "loaded CSV data"
    );
    Ok(LoadedData::new(rows, DataSource::Csv))
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Index of the first header matching any of `names`, ignoring case.
fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    })
}

/// Parse a date cell: `YYYY-MM-DD`, an ISO datetime, `DD-MM-YYYY`, or unix seconds.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d-%m-%Y") {
        return Some(d);
    }
    if let Ok(secs) = s.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive());
    }
    None
}

fn parse_number(path: &Path, row: usize, column: &str, s: &str) -> Result<f64, LoadError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoadError::BadRow {
            path: path.to_path_buf(),
            row,
            reason: format!("invalid {column} value {s:?}"),
        })
}

/// Load daily closes within `[start, end]`, sorted by date.
///
/// Rows with an empty close are skipped; a later duplicate date replaces
/// an earlier one.
pub fn load_price_csv(
    path: &Path,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PricePoint>, LoadError> {
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let date_col = find_column(&headers, &["date"]).ok_or_else(|| LoadError::MissingColumn {
        path: path.to_path_buf(),
        column: "Date",
    })?;
    let close_col = find_column(&headers, &["close", "adj close"]).ok_or_else(|| {
        LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: "Close",
        }
    })?;

    let mut by_date = BTreeMap::new();
    let mut skipped = 0usize;
    for (i, record) in reader.records().enumerate() {
        let row = i + 2;
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let raw_date = record.get(date_col).unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| LoadError::BadRow {
            path: path.to_path_buf(),
            row,
            reason: format!("unparseable date {raw_date:?}"),
        })?;
        if date < start || date > end {
            continue;
        }
        let raw_close = record.get(close_col).unwrap_or_default();
        if raw_close.is_empty() {
            skipped += 1;
            continue;
        }
        let close = parse_number(path, row, "close", raw_close)?;
        by_date.insert(date, close);
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "skipped price rows without a close");
    }
    if by_date.is_empty() {
        return Err(LoadError::EmptyRange(path.to_path_buf()));
    }

    let points: Vec<PricePoint> = by_date
        .into_iter()
        .map(|(date, close)| PricePoint { date, close })
        .collect();
    debug!(path = %path.display(), points = points.len(), "price CSV loaded");
    Ok(points)
}

/// Load Fear & Greed readings within `[start, end]`, sorted by date.
pub fn load_sentiment_csv(
    path: &Path,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<SentimentPoint>, LoadError> {
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let date_col = find_column(&headers, &["date", "timestamp"]).ok_or_else(|| {
        LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: "date or timestamp",
        }
    })?;
    let value_col = find_column(&headers, &["value"]).ok_or_else(|| LoadError::MissingColumn {
        path: path.to_path_buf(),
        column: "value",
    })?;
    let class_col = find_column(&headers, &["value_classification"]);

    let mut by_date = BTreeMap::new();
    for (i, record) in reader.records().enumerate() {
        let row = i + 2;
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let raw_date = record.get(date_col).unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| LoadError::BadRow {
            path: path.to_path_buf(),
            row,
            reason: format!("unparseable date {raw_date:?}"),
        })?;
        if date < start || date > end {
            continue;
        }
        let value = parse_number(path, row, "value", record.get(value_col).unwrap_or_default())?;
        let classification = class_col
            .and_then(|c| record.get(c))
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        by_date.insert(
            date,
            SentimentPoint {
                date,
                value,
                classification,
            },
        );
    }

    if by_date.is_empty() {
        return Err(LoadError::EmptyRange(path.to_path_buf()));
    }
    Ok(by_date.into_values().collect())
}

/// Left-join sentiment onto price dates with forward fill, then add returns.
///
/// Only readings dated exactly on a price date are joined; a reading on a
/// day without a price is ignored, and the last joined value carries
/// forward. Both inputs must be sorted by date. The first price row is
/// dropped because it has no return; rows before the first joined reading
/// are dropped because there is nothing to forward-fill from.
pub fn merge_price_and_sentiment(
    prices: &[PricePoint],
    sentiment: &[SentimentPoint],
) -> Result<Vec<MergedRow>, LoadError> {
    let mut rows = Vec::with_capacity(prices.len());
    let mut next_sentiment = 0;
    let mut last_value: Option<f64> = None;

    for (i, p) in prices.iter().enumerate() {
        while next_sentiment < sentiment.len() && sentiment[next_sentiment].date < p.date {
            next_sentiment += 1;
        }
        if let Some(reading) = sentiment.get(next_sentiment).filter(|s| s.date == p.date) {
            last_value = Some(reading.value);
            next_sentiment += 1;
        }
        if i == 0 {
            continue;
        }
        let Some(fg_value) = last_value else {
            continue;
        };
        let prev = prices[i - 1].close;
        let ret = if prev != 0.0 { p.close / prev - 1.0 } else { 0.0 };
        rows.push(MergedRow {
            date: p.date,
            close: p.close,
            ret,
            fg_value,
        });
    }

    if rows.is_empty() {
        return Err(LoadError::EmptyMerge);
    }
    Ok(rows)
}

/// BLAKE3 over every merged row, hex-encoded.
pub fn hash_rows(rows: &[MergedRow]) -> String {
    let mut hasher = blake3::Hasher::new();
    for r in rows {
        hasher.update(r.date.to_string().as_bytes());
        hasher.update(&r.close.to_le_bytes());
        hasher.update(&r.fg_value.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
