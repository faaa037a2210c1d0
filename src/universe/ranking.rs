//! Ranked universes: a configured list or CoinGecko market-cap order.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use super::membership::normalize_ticker;
use super::RankingProvider;
use crate::error::ScreenError;
use crate::models::{Market, Symbol};

/// CoinGecko's maximum page size for `/coins/markets`.
pub const COINGECKO_PAGE_SIZE: usize = 250;

/// Ranking taken verbatim from configuration. `EXCHANGE:TICKER` entries pin
/// the venue; crypto entries written as `BASE/QUOTE` are used as complete
/// pairs on every venue.
pub struct StaticRanking {
    symbols: Vec<Symbol>,
}

impl StaticRanking {
    pub fn new(tickers: &[String], market: Market) -> Self {
        let symbols = tickers
            .iter()
            .filter_map(|raw| {
                let (exchange, ticker) = match raw.split_once(':') {
                    Some((exchange, ticker)) => (Some(exchange.trim()), ticker),
                    None => (None, raw.as_str()),
                };
                let pair = match (market, ticker.split_once('/')) {
                    (Market::Crypto, Some((base, quote))) => {
                        Some(format!("{}{}", normalize_ticker(base), normalize_ticker(quote)))
                    }
                    _ => None,
                };
                let ticker = pair.clone().unwrap_or_else(|| normalize_ticker(ticker));
                if ticker.is_empty() {
                    return None;
                }
                let mut symbol = Symbol::new(ticker, market);
                if pair.is_some() {
                    symbol = symbol.as_pair();
                }
                Some(match exchange.filter(|e| !e.is_empty()) {
                    Some(exchange) => symbol.with_exchange(exchange),
                    None => symbol,
                })
            })
            .collect();
        Self { symbols }
    }
}

#[async_trait]
impl RankingProvider for StaticRanking {
    async fn ranked(&self, n: usize) -> Result<Vec<Symbol>, ScreenError> {
        Ok(self.symbols.iter().take(n).cloned().collect())
    }
}

#[derive(Debug, Deserialize)]
struct CoinMarket {
    symbol: String,
    name: String,
    #[serde(default)]
    market_cap: Option<f64>,
}

pub struct CoinGeckoRanking {
    base_url: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl CoinGeckoRanking {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, ScreenError> {
        Self::with_client(base_url, api_key, reqwest::Client::new())
    }

    pub fn with_client(
        base_url: impl Into<String>,
        api_key: Option<String>,
        http: reqwest::Client,
    ) -> Result<Self, ScreenError> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|e| {
            ScreenError::invalid_input(format!("invalid CoinGecko URL '{}': {}", base_url, e))
        })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http,
        })
    }

    async fn fetch_page(&self, page: usize, per_page: usize) -> Result<Vec<CoinMarket>, ScreenError> {
        let url = format!("{}/coins/markets", self.base_url);
        let mut request = self.http.get(&url).query(&[
            ("vs_currency", "usd".to_string()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ScreenError::Universe(format!("CoinGecko request failed: {}", e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScreenError::Universe(format!(
                "CoinGecko returned HTTP {} for page {}",
                status, page
            )));
        }
        response
            .json::<Vec<CoinMarket>>()
            .await
            .map_err(|e| ScreenError::Universe(format!("malformed CoinGecko response: {}", e)))
    }
}

#[async_trait]
impl RankingProvider for CoinGeckoRanking {
    async fn ranked(&self, n: usize) -> Result<Vec<Symbol>, ScreenError> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let per_page = COINGECKO_PAGE_SIZE.min(n);
        let pages = n.div_ceil(per_page);
        let mut symbols = Vec::with_capacity(n);

        for page in 1..=pages {
            let coins = self.fetch_page(page, per_page).await?;
            debug!(page, count = coins.len(), "CoinGecko: fetched ranking page");
            let exhausted = coins.len() < per_page;
            symbols.extend(coins.into_iter().map(|coin| {
                let symbol = Symbol::new(coin.symbol.to_uppercase(), Market::Crypto).with_name(coin.name);
                match coin.market_cap {
                    Some(cap) => symbol.with_market_cap(cap),
                    None => symbol,
                }
            }));
            if exhausted {
                break;
            }
        }

        info!(count = symbols.len(), "CoinGecko: ranked {} coins by market cap", symbols.len());
        Ok(symbols)
    }
}
