use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScreenError;
use crate::models::interval::Interval;
use crate::models::symbol::{Listing, Symbol};

/// Technical-analysis verdict, ordered from most bearish to most bullish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongSell,
    Sell,
    Neutral,
    Buy,
    StrongBuy,
}

impl Recommendation {
    /// Map an aggregate rating score in [-1, 1] to a label.
    ///
    /// Boundaries: -0.5 belongs to SELL, +/-0.1 to NEUTRAL, 0.5 to BUY.
    /// Returns `None` for NaN or out-of-range scores.
    pub fn from_score(score: f64) -> Option<Self> {
        if !(-1.0..=1.0).contains(&score) {
            return None;
        }
        let rec = if score < -0.5 {
            Recommendation::StrongSell
        } else if score < -0.1 {
            Recommendation::Sell
        } else if score <= 0.1 {
            Recommendation::Neutral
        } else if score <= 0.5 {
            Recommendation::Buy
        } else {
            Recommendation::StrongBuy
        };
        Some(rec)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongSell => "STRONG_SELL",
            Recommendation::Sell => "SELL",
            Recommendation::Neutral => "NEUTRAL",
            Recommendation::Buy => "BUY",
            Recommendation::StrongBuy => "STRONG_BUY",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recommendation {
    type Err = ScreenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "STRONG_SELL" => Ok(Recommendation::StrongSell),
            "SELL" => Ok(Recommendation::Sell),
            "NEUTRAL" => Ok(Recommendation::Neutral),
            "BUY" => Ok(Recommendation::Buy),
            "STRONG_BUY" => Ok(Recommendation::StrongBuy),
            _ => Err(ScreenError::invalid_input(format!(
                "unknown recommendation '{}'",
                s.trim()
            ))),
        }
    }
}

/// Numeric values reported alongside a rating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Aggregate rating score the recommendation was derived from.
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_averages: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oscillators: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            ..Self::default()
        }
    }
}

/// One successful rating lookup for a (Symbol, Interval) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub symbol: Symbol,
    pub interval: Interval,
    pub listing: Listing,
    pub recommendation: Recommendation,
    pub indicators: IndicatorSnapshot,
}
