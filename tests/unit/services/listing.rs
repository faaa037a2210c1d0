//! Unit tests for venue candidates

use std::path::PathBuf;

use ratingscreen::config::{MembershipLocation, MembershipSource};
use ratingscreen::models::{Market, Symbol};
use ratingscreen::services::candidate_listings;
use ratingscreen::universe::read_membership_from_reader;

fn qualified(symbol: &Symbol) -> Vec<String> {
    candidate_listings(symbol).iter().map(|l| l.qualified()).collect()
}

#[test]
fn crypto_pairs_follow_venue_quotes() {
    assert_eq!(
        qualified(&Symbol::new("BTC", Market::Crypto)),
        vec!["BINANCE:BTCUSDT", "BYBIT:BTCUSDT", "COINBASE:BTCUSD", "KRAKEN:BTCUSD"]
    );
}

#[test]
fn crypto_quote_is_not_appended_twice() {
    let candidates = qualified(&Symbol::new("ETHUSDT", Market::Crypto).as_pair());
    assert_eq!(candidates[0], "BINANCE:ETHUSDT");
    assert_eq!(candidates[2], "COINBASE:ETHUSDT");
}

#[test]
fn coins_ending_in_a_quote_still_get_one() {
    assert_eq!(
        qualified(&Symbol::new("FDUSD", Market::Crypto)),
        vec![
            "BINANCE:FDUSDUSDT",
            "BYBIT:FDUSDUSDT",
            "COINBASE:FDUSDUSD",
            "KRAKEN:FDUSDUSD"
        ]
    );
    assert_eq!(qualified(&Symbol::new("TUSD", Market::Crypto))[3], "KRAKEN:TUSDUSD");
}

#[test]
fn crypto_separators_are_stripped() {
    assert_eq!(qualified(&Symbol::new("btc-b", Market::Crypto))[0], "BINANCE:BTCBUSDT");
}

#[test]
fn equities_try_each_exchange() {
    assert_eq!(
        qualified(&Symbol::new("AAPL", Market::America)),
        vec!["NASDAQ:AAPL", "NYSE:AAPL", "AMEX:AAPL"]
    );
}

#[test]
fn share_classes_try_dotted_variant() {
    let candidates = qualified(&Symbol::new("BRK-B", Market::America));
    assert_eq!(candidates.len(), 6);
    assert_eq!(candidates[0], "NASDAQ:BRK-B");
    assert_eq!(candidates[3], "NASDAQ:BRK.B");
}

#[test]
fn pinned_exchange_is_exclusive() {
    let symbol = Symbol::new("IBM", Market::America).with_exchange("nyse");
    assert_eq!(qualified(&symbol), vec!["NYSE:IBM"]);

    let crypto = Symbol::new("BTCUSDT", Market::Crypto).with_exchange("BINANCE");
    assert_eq!(qualified(&crypto), vec!["BINANCE:BTCUSDT"]);
}

#[test]
fn pinned_class_share_tries_dotted_variant_on_that_exchange() {
    let source = MembershipSource {
        location: MembershipLocation::File(PathBuf::from("members.csv")),
        market: Market::America,
        symbol_column: None,
        exchange_column: Some("exchange".to_string()),
        delimiter: b',',
    };
    let universe = read_membership_from_reader("symbol,exchange\nBRK.B,NYSE\n".as_bytes(), &source).unwrap();

    assert_eq!(qualified(universe.get(0).unwrap()), vec!["NYSE:BRK-B", "NYSE:BRK.B"]);
}
