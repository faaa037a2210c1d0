//! Unit tests for the screening runtime

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ratingscreen::core::ScreenRuntime;
use ratingscreen::metrics::Metrics;
use ratingscreen::models::{Interval, Listing, Recommendation};
use ratingscreen::services::{Analysis, SignalSource, StaticSignalSource};
use ratingscreen::universe::Universe;
use ratingscreen::{FailureKind, ScreenError};

use crate::common::{config, nasdaq};

const H4: Interval = Interval::FourHours;
const W1: Interval = Interval::OneWeek;

fn tickers(entries: &[ratingscreen::models::ScreenEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.symbol.ticker.as_str()).collect()
}

#[tokio::test]
async fn keeps_buy_and_strong_buy_in_universe_order() {
    let universe = nasdaq(&["AAA", "BBB", "CCC"]);
    let source = StaticSignalSource::new()
        .with_rating("NASDAQ:AAA", H4, Recommendation::Buy)
        .with_rating("NASDAQ:BBB", H4, Recommendation::Neutral)
        .with_rating("NASDAQ:CCC", H4, Recommendation::StrongBuy)
        .with_rating("NASDAQ:AAA", W1, Recommendation::Sell)
        .with_rating("NASDAQ:BBB", W1, Recommendation::StrongBuy)
        .with_rating("NASDAQ:CCC", W1, Recommendation::StrongSell);

    let runtime = ScreenRuntime::new(&config(&[H4, W1]), Arc::new(source));
    let report = runtime.run(&universe).await;

    assert_eq!(report.universe_size, 3);
    assert_eq!(report.sections.len(), 2);
    assert_eq!(tickers(&report.section(H4).unwrap().entries), vec!["AAA", "CCC"]);
    assert_eq!(tickers(&report.section(W1).unwrap().entries), vec!["BBB"]);
    assert_eq!(report.failure_count(), 0);
}

#[tokio::test]
async fn buy_neutral_failure_scenario() {
    let universe = nasdaq(&["AAA", "BBB", "CCC"]);
    let source = StaticSignalSource::new()
        .with_rating("NASDAQ:AAA", H4, Recommendation::Buy)
        .with_rating("NASDAQ:BBB", H4, Recommendation::Neutral)
        .with_error("NASDAQ:CCC", H4, ScreenError::fetch("NASDAQ:CCC", "connection reset", true));

    let report = ScreenRuntime::new(&config(&[H4]), Arc::new(source)).run(&universe).await;
    let section = report.section(H4).unwrap();

    assert_eq!(tickers(&section.entries), vec!["AAA"]);
    assert_eq!(section.failure_count(), 1);
    assert_eq!(section.failures[0].ticker, "CCC");
}

#[tokio::test]
async fn failures_are_isolated_and_counted() {
    let universe = nasdaq(&["AAA", "BAD", "GONE", "DDD"]);
    let source = StaticSignalSource::new()
        .with_rating("NASDAQ:AAA", H4, Recommendation::Buy)
        .with_error("NASDAQ:BAD", H4, ScreenError::fetch("NASDAQ:BAD", "HTTP 403", false))
        .with_rating("NASDAQ:DDD", H4, Recommendation::StrongBuy);

    let runtime = ScreenRuntime::new(&config(&[H4]), Arc::new(source));
    let report = runtime.run(&universe).await;
    let section = report.section(H4).unwrap();

    assert_eq!(section.scanned, 4);
    assert_eq!(tickers(&section.entries), vec!["AAA", "DDD"]);
    assert_eq!(section.failure_count(), 2);
    assert_eq!(section.failures[0].ticker, "BAD");
    assert_eq!(section.failures[0].kind, FailureKind::Fetch);
    assert_eq!(section.failures[1].ticker, "GONE");
    assert_eq!(section.failures[1].kind, FailureKind::UnsupportedSymbol);
}

#[tokio::test]
async fn empty_universe_gives_empty_sections() {
    let source = Arc::new(StaticSignalSource::new());
    let runtime = ScreenRuntime::new(&config(&[H4, W1]), source.clone());
    let report = runtime.run(&Universe::empty()).await;

    assert_eq!(report.sections.len(), 2);
    assert!(report.is_empty());
    assert_eq!(report.failure_count(), 0);
    assert_eq!(source.calls(), 0);
}

/// Answers BUY after a delay that shrinks with the ticker's position, so
/// later symbols finish first.
struct StaggeredSource;

#[async_trait]
impl SignalSource for StaggeredSource {
    async fn analyze(&self, listing: &Listing, _interval: Interval) -> Result<Analysis, ScreenError> {
        let delay = match listing.ticker.as_str() {
            "AAA" => 300,
            "BBB" => 200,
            "CCC" => 100,
            _ => 10,
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Analysis::from_score(0.3, &listing.qualified())
    }
}

#[tokio::test(start_paused = true)]
async fn concurrency_preserves_universe_order() {
    let universe = nasdaq(&["AAA", "BBB", "CCC", "DDD"]);
    let runtime = ScreenRuntime::new(&config(&[H4]), Arc::new(StaggeredSource)).with_concurrency(4);

    let started = tokio::time::Instant::now();
    let report = runtime.run(&universe).await;

    assert_eq!(
        tickers(&report.section(H4).unwrap().entries),
        vec!["AAA", "BBB", "CCC", "DDD"]
    );
    // All four ran at once.
    assert!(started.elapsed() < Duration::from_millis(600));
}

#[tokio::test]
async fn same_inputs_same_report() {
    let universe = nasdaq(&["AAA", "BBB", "CCC"]);
    let source = || {
        Arc::new(
            StaticSignalSource::new()
                .with_rating("NASDAQ:AAA", H4, Recommendation::StrongBuy)
                .with_rating("NASDAQ:CCC", H4, Recommendation::Buy),
        )
    };

    let first = ScreenRuntime::new(&config(&[H4]), source()).run(&universe).await;
    let second = ScreenRuntime::new(&config(&[H4]), source())
        .with_concurrency(3)
        .run(&universe)
        .await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn metrics_track_requests_and_failures() {
    let universe = nasdaq(&["AAA", "BBB", "CCC"]);
    let source = StaticSignalSource::new()
        .with_rating("NASDAQ:AAA", H4, Recommendation::Buy)
        .with_error("NASDAQ:BBB", H4, ScreenError::fetch("NASDAQ:BBB", "HTTP 403", false));
    let metrics = Arc::new(Metrics::new().unwrap());

    let runtime = ScreenRuntime::new(&config(&[H4]), Arc::new(source)).with_metrics(metrics.clone());
    runtime.run(&universe).await;

    assert_eq!(metrics.fetch_requests_total.get(), 3);
    assert_eq!(metrics.entries_passed_total.get(), 1);
    assert_eq!(metrics.universe_size.get(), 3);
    assert_eq!(metrics.fetch_failures_total.with_label_values(&["fetch"]).get(), 1);
    assert_eq!(
        metrics
            .fetch_failures_total
            .with_label_values(&["unsupported_symbol"])
            .get(),
        1
    );

    let text = metrics.export().unwrap();
    assert!(text.contains("screener_fetch_requests_total 3"));
}
