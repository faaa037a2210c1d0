//! Unit tests for membership file parsing

use std::io::Write;
use std::path::PathBuf;

use ratingscreen::config::{MembershipLocation, MembershipSource};
use ratingscreen::models::Market;
use ratingscreen::universe::{normalize_ticker, read_membership, read_membership_from_reader};
use ratingscreen::ScreenError;

fn source() -> MembershipSource {
    MembershipSource {
        location: MembershipLocation::File(PathBuf::from("members.csv")),
        market: Market::America,
        symbol_column: None,
        exchange_column: None,
        delimiter: b',',
    }
}

fn tickers(csv: &str, source: &MembershipSource) -> Vec<String> {
    read_membership_from_reader(csv.as_bytes(), source)
        .unwrap()
        .iter()
        .map(|s| s.ticker.clone())
        .collect()
}

#[test]
fn normalizes_share_class_separators() {
    assert_eq!(normalize_ticker(" brk.b "), "BRK-B");
    assert_eq!(normalize_ticker("BF/B"), "BF-B");
    assert_eq!(normalize_ticker("aapl"), "AAPL");
}

#[test]
fn finds_ticker_like_column() {
    let csv = "Company,Ticker Symbol,Weight\nApple,AAPL,7.1\nBerkshire,BRK.B,1.6\n";
    assert_eq!(tickers(csv, &source()), vec!["AAPL", "BRK-B"]);
}

#[test]
fn keeps_file_order_and_drops_duplicates() {
    let csv = "symbol\nMSFT\nAAPL\nmsft\nNVDA\n";
    assert_eq!(tickers(csv, &source()), vec!["MSFT", "AAPL", "NVDA"]);
}

#[test]
fn skips_blank_tickers() {
    let csv = "symbol,name\nAAPL,Apple\n,Cash\nMSFT,Microsoft\n";
    assert_eq!(tickers(csv, &source()), vec!["AAPL", "MSFT"]);
}

#[test]
fn missing_symbol_column_is_invalid_input() {
    let csv = "company,weight\nApple,7.1\n";
    let err = read_membership_from_reader(csv.as_bytes(), &source()).unwrap_err();
    assert!(matches!(err, ScreenError::InvalidInput(_)));
    assert!(err.is_fatal());
}

#[test]
fn configured_column_must_exist() {
    let mut src = source();
    src.symbol_column = Some("Code".to_string());
    let err = read_membership_from_reader("ticker\nAAPL\n".as_bytes(), &src).unwrap_err();
    assert!(matches!(err, ScreenError::InvalidInput(msg) if msg.contains("Code")));
}

#[test]
fn configured_column_wins_over_detection() {
    let mut src = source();
    src.symbol_column = Some("code".to_string());
    let csv = "ticker_old,Code\nOLD,NEW\n";
    assert_eq!(tickers(csv, &src), vec!["NEW"]);
}

#[test]
fn honours_custom_delimiter() {
    let mut src = source();
    src.delimiter = b';';
    let csv = "name;symbol\nApple;AAPL\nMicrosoft;MSFT\n";
    assert_eq!(tickers(csv, &src), vec!["AAPL", "MSFT"]);
}

#[test]
fn exchange_column_pins_venue() {
    let mut src = source();
    src.exchange_column = Some("exchange".to_string());
    let csv = "symbol,exchange\nAAPL,nasdaq\nIBM,\n";
    let universe = read_membership_from_reader(csv.as_bytes(), &src).unwrap();

    assert_eq!(universe.get(0).unwrap().exchange.as_deref(), Some("NASDAQ"));
    assert_eq!(universe.get(1).unwrap().exchange, None);
}

#[test]
fn reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Symbol,Security").unwrap();
    writeln!(file, "AAPL,Apple Inc.").unwrap();
    writeln!(file, "MMM,3M").unwrap();

    let universe = read_membership(file.path(), &source()).unwrap();

    assert_eq!(universe.len(), 2);
    assert_eq!(universe.get(1).unwrap().ticker, "MMM");
    assert_eq!(universe.get(1).unwrap().market, Market::America);
}

#[test]
fn unreadable_file_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_membership(&dir.path().join("missing.csv"), &source()).unwrap_err();
    assert!(matches!(err, ScreenError::InvalidInput(msg) if msg.contains("missing.csv")));
}
