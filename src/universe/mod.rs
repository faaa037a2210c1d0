//! Universe selection: ranked top-N lists and membership files.

pub mod membership;
pub mod ranking;

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::info;

use crate::config::{RankingSource, SliceWindow, UniverseSelection};
use crate::error::ScreenError;
use crate::models::{Market, Symbol};

pub use membership::{
    fetch_membership, load_membership, normalize_ticker, read_membership, read_membership_from_reader,
};
pub use ranking::{CoinGeckoRanking, StaticRanking};

/// Ordered, duplicate-free set of symbols for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Universe {
    symbols: Vec<Symbol>,
}

impl Universe {
    /// Keeps the first occurrence of every (market, ticker, venue).
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for symbol in symbols {
            let key = (symbol.market, symbol.ticker.clone(), symbol.exchange.clone());
            if seen.insert(key) {
                unique.push(symbol);
            }
        }
        Self { symbols: unique }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }

    pub fn get(&self, rank: usize) -> Option<&Symbol> {
        self.symbols.get(rank)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.iter().any(|s| s.key() == symbol.key())
    }

    pub fn truncate(mut self, n: usize) -> Self {
        self.symbols.truncate(n);
        self
    }

    /// Restrict to the `[start, end)` window, clamped to the universe size.
    pub fn slice(self, window: SliceWindow) -> Self {
        if window.is_full() {
            return self;
        }
        let len = self.symbols.len();
        let end = window.end.unwrap_or(len).min(len);
        let start = window.start.min(end);
        Self {
            symbols: self.symbols[start..end].to_vec(),
        }
    }
}

impl<'a> IntoIterator for &'a Universe {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}

/// Source of a ranked symbol list (market cap, volume, ...).
#[async_trait]
pub trait RankingProvider: Send + Sync {
    /// Up to `n` symbols, best-ranked first.
    async fn ranked(&self, n: usize) -> Result<Vec<Symbol>, ScreenError>;
}

/// First `n` distinct symbols of the provider's ranking.
pub async fn top_n(provider: &dyn RankingProvider, n: usize) -> Result<Universe, ScreenError> {
    let ranked = provider.ranked(n).await?;
    Ok(Universe::new(ranked).truncate(n))
}

/// Build the Universe the configuration selects. Does no rating requests.
pub async fn load_universe(selection: &UniverseSelection) -> Result<Universe, ScreenError> {
    let universe = match selection {
        UniverseSelection::Top { n, market, ranking } => {
            let provider: Box<dyn RankingProvider> = match ranking {
                RankingSource::Static(tickers) => Box::new(StaticRanking::new(tickers, *market)),
                RankingSource::CoinGecko { base_url, api_key } => {
                    if *market != Market::Crypto {
                        return Err(ScreenError::invalid_input(
                            "CoinGecko ranking only covers the crypto market",
                        ));
                    }
                    Box::new(CoinGeckoRanking::new(base_url.clone(), api_key.clone())?)
                }
            };
            top_n(provider.as_ref(), *n).await?
        }
        UniverseSelection::Membership(source) => load_membership(source).await?,
    };

    info!(size = universe.len(), "Universe: loaded {} symbols", universe.len());
    Ok(universe)
}
