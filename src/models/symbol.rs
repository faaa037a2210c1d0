use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScreenError;

/// Market segment a symbol trades in. Decides which scanner screener is
/// queried and which exchanges are tried when no venue is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Crypto,
    America,
}

impl Market {
    /// Screener path segment on the scanner API.
    pub fn screener(&self) -> &'static str {
        match self {
            Market::Crypto => "crypto",
            Market::America => "america",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.screener())
    }
}

impl FromStr for Market {
    type Err = ScreenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crypto" => Ok(Market::Crypto),
            "america" | "us" | "equity" | "equities" => Ok(Market::America),
            other => Err(ScreenError::invalid_input(format!("unknown market '{}'", other))),
        }
    }
}

/// A member of the Universe. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub ticker: String,
    pub market: Market,
    /// Venue tag; when set, only this exchange is queried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    /// Crypto ticker already carries its quote currency (`BTCUSDT`).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub paired: bool,
}

impl Symbol {
    pub fn new(ticker: impl Into<String>, market: Market) -> Self {
        Self {
            ticker: ticker.into(),
            market,
            exchange: None,
            name: None,
            market_cap: None,
            paired: false,
        }
    }

    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = Some(exchange.into().trim().to_uppercase());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = Some(market_cap);
        self
    }

    /// Mark the ticker as a complete trading pair; venues get it verbatim.
    pub fn as_pair(mut self) -> Self {
        self.paired = true;
        self
    }

    /// Identity used for deduplication: market, ticker and pinned venue.
    pub fn key(&self) -> (Market, &str, Option<&str>) {
        (self.market, self.ticker.as_str(), self.exchange.as_deref())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.exchange {
            Some(exchange) => write!(f, "{}:{}", exchange, self.ticker),
            None => f.write_str(&self.ticker),
        }
    }
}

/// Exchange-qualified ticker as the data source addresses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Listing {
    pub exchange: String,
    pub ticker: String,
    pub market: Market,
}

impl Listing {
    pub fn new(exchange: impl Into<String>, ticker: impl Into<String>, market: Market) -> Self {
        Self {
            exchange: exchange.into(),
            ticker: ticker.into(),
            market,
        }
    }

    /// `EXCHANGE:TICKER`
    pub fn qualified(&self) -> String {
        format!("{}:{}", self.exchange, self.ticker)
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.exchange, self.ticker)
    }
}
