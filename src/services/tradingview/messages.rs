//! Scanner request and response payloads.

use serde::{Deserialize, Serialize};

use crate::models::{Interval, Listing};

/// Columns requested per listing, without interval suffix. Order matters:
/// response values come back positionally.
pub const RATING_COLUMNS: [&str; 8] = [
    "Recommend.All",
    "Recommend.MA",
    "Recommend.Other",
    "RSI",
    "MACD.macd",
    "MACD.signal",
    "close",
    "volume",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanRequest {
    pub symbols: ScanSymbols,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanSymbols {
    pub tickers: Vec<String>,
    pub query: ScanQuery,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScanQuery {
    pub types: Vec<String>,
}

impl ScanRequest {
    /// Rating request for a single listing on one interval.
    pub fn rating(listing: &Listing, interval: Interval) -> Self {
        let suffix = interval.column_suffix();
        Self {
            symbols: ScanSymbols {
                tickers: vec![listing.qualified()],
                query: ScanQuery::default(),
            },
            columns: RATING_COLUMNS
                .iter()
                .map(|c| format!("{}{}", c, suffix))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub data: Option<Vec<ScanRow>>,
    #[serde(rename = "totalCount", default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One listing: `s` is `EXCHANGE:TICKER`, `d` the requested column values.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanRow {
    pub s: String,
    #[serde(default)]
    pub d: Vec<Option<f64>>,
}

impl ScanRow {
    /// Value of `column` (unsuffixed name from [`RATING_COLUMNS`]).
    pub fn value(&self, column: &str) -> Option<f64> {
        let idx = RATING_COLUMNS.iter().position(|c| *c == column)?;
        self.d.get(idx).copied().flatten()
    }
}
