//! Unit tests for universe construction

use ratingscreen::config::{RankingSource, SliceWindow, UniverseSelection};
use ratingscreen::models::{Market, Symbol};
use ratingscreen::universe::{load_universe, top_n, StaticRanking, Universe};
use ratingscreen::ScreenError;

use crate::common::equities;

fn tickers(universe: &Universe) -> Vec<&str> {
    universe.iter().map(|s| s.ticker.as_str()).collect()
}

#[test]
fn dedupes_keeping_first_occurrence() {
    let universe = equities(&["AAA", "BBB", "AAA", "CCC", "BBB"]);
    assert_eq!(tickers(&universe), vec!["AAA", "BBB", "CCC"]);
}

#[test]
fn same_ticker_on_different_venues_is_distinct() {
    let universe = Universe::new(vec![
        Symbol::new("BTCUSDT", Market::Crypto).with_exchange("BINANCE"),
        Symbol::new("BTCUSDT", Market::Crypto).with_exchange("BYBIT"),
    ]);
    assert_eq!(universe.len(), 2);
}

#[test]
fn slice_is_clamped() {
    let universe = equities(&["A", "B", "C", "D"]);

    let mid = universe.clone().slice(SliceWindow { start: 1, end: Some(3) });
    assert_eq!(tickers(&mid), vec!["B", "C"]);

    let tail = universe.clone().slice(SliceWindow { start: 2, end: Some(99) });
    assert_eq!(tickers(&tail), vec!["C", "D"]);

    let past = universe.clone().slice(SliceWindow { start: 10, end: None });
    assert!(past.is_empty());

    assert_eq!(universe.clone().slice(SliceWindow::default()), universe);
}

#[tokio::test]
async fn top_n_takes_ranked_prefix() {
    let ranking = StaticRanking::new(
        &["btc".to_string(), "eth".to_string(), "sol".to_string()],
        Market::Crypto,
    );
    let universe = top_n(&ranking, 2).await.unwrap();
    assert_eq!(tickers(&universe), vec!["BTC", "ETH"]);
}

#[tokio::test]
async fn static_ranking_pins_qualified_entries() {
    let ranking = StaticRanking::new(&["nyse:IBM".to_string(), "AAPL".to_string()], Market::America);
    let universe = top_n(&ranking, 10).await.unwrap();

    assert_eq!(universe.get(0).unwrap().exchange.as_deref(), Some("NYSE"));
    assert_eq!(universe.get(0).unwrap().ticker, "IBM");
    assert_eq!(universe.get(1).unwrap().exchange, None);
}

#[tokio::test]
async fn static_crypto_pairs_keep_their_quote() {
    let ranking = StaticRanking::new(&["eth/usdt".to_string(), "fdusd".to_string()], Market::Crypto);
    let universe = top_n(&ranking, 10).await.unwrap();

    let pair = universe.get(0).unwrap();
    assert_eq!(pair.ticker, "ETHUSDT");
    assert!(pair.paired);
    let coin = universe.get(1).unwrap();
    assert_eq!(coin.ticker, "FDUSD");
    assert!(!coin.paired);
}

#[tokio::test]
async fn load_universe_rejects_coingecko_for_equities() {
    let selection = UniverseSelection::Top {
        n: 5,
        market: Market::America,
        ranking: RankingSource::CoinGecko {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: None,
        },
    };
    let err = load_universe(&selection).await.unwrap_err();
    assert!(matches!(err, ScreenError::InvalidInput(_)));
}

#[tokio::test]
async fn load_universe_from_static_list() {
    let selection = UniverseSelection::Top {
        n: 2,
        market: Market::America,
        ranking: RankingSource::Static(vec!["MSFT".into(), "AAPL".into(), "NVDA".into()]),
    };
    let universe = load_universe(&selection).await.unwrap();
    assert_eq!(tickers(&universe), vec!["MSFT", "AAPL"]);
}
