//! Shared fixtures for unit tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use ratingscreen::config::{
    FetchConfig, OutputConfig, OutputFormat, RankingSource, ScreenConfig, SliceWindow,
    UniverseSelection,
};
use ratingscreen::models::{Interval, Market, Symbol};
use ratingscreen::signals::PassRule;
use ratingscreen::universe::Universe;

pub fn equities(tickers: &[&str]) -> Universe {
    Universe::new(tickers.iter().map(|t| Symbol::new(*t, Market::America)))
}

/// Equity universe pinned to NASDAQ, so each symbol has one candidate listing.
pub fn nasdaq(tickers: &[&str]) -> Universe {
    Universe::new(
        tickers
            .iter()
            .map(|t| Symbol::new(*t, Market::America).with_exchange("NASDAQ")),
    )
}

pub fn fast_fetch() -> FetchConfig {
    FetchConfig {
        scanner_url: "http://127.0.0.1:1".to_string(),
        timeout: Duration::from_secs(10),
        retries: 0,
        pacing: Duration::ZERO,
        concurrency: 1,
    }
}

pub fn config(intervals: &[Interval]) -> ScreenConfig {
    ScreenConfig {
        universe: UniverseSelection::Top {
            n: 10,
            market: Market::America,
            ranking: RankingSource::Static(vec!["AAA".to_string()]),
        },
        slice: SliceWindow::default(),
        intervals: intervals.to_vec(),
        pass_rule: PassRule::default(),
        fetch: fast_fetch(),
        output: OutputConfig {
            format: OutputFormat::Table,
            dir: None::<PathBuf>,
            label: "test".to_string(),
        },
        metrics_file: None,
    }
}

use ratingscreen::models::{IndicatorSnapshot, Listing, Recommendation, SignalResult};
use ratingscreen::signals::FetchOutcome;
use ratingscreen::ScreenError;

/// Successful outcome for the symbol at `rank`.
pub fn rated(universe: &Universe, rank: usize, interval: Interval, rec: Recommendation) -> FetchOutcome {
    let symbol = universe.get(rank).expect("rank in universe").clone();
    let listing = Listing::new("NASDAQ", symbol.ticker.clone(), symbol.market);
    FetchOutcome {
        rank,
        symbol: symbol.clone(),
        interval,
        result: Ok(SignalResult {
            symbol,
            interval,
            listing,
            recommendation: rec,
            indicators: IndicatorSnapshot::new(0.3),
        }),
    }
}

/// Failed outcome for the symbol at `rank`.
pub fn failed(universe: &Universe, rank: usize, interval: Interval, error: ScreenError) -> FetchOutcome {
    let symbol = universe.get(rank).expect("rank in universe").clone();
    FetchOutcome {
        rank,
        symbol,
        interval,
        result: Err(error),
    }
}
