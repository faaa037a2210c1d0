//! Batch runtime: Universe → fetch → aggregate, one interval at a time.

use std::sync::Arc;

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::ScreenConfig;
use crate::error::ScreenError;
use crate::metrics::Metrics;
use crate::models::{Interval, RunSummary, ScreenReport};
use crate::services::market_data::SignalSource;
use crate::services::tradingview::{TradingViewClient, TradingViewSignalSource};
use crate::signals::aggregation::{FetchOutcome, ResultAggregator};
use crate::signals::fetcher::SignalFetcher;
use crate::signals::filter::PassRule;
use crate::universe::{load_universe, Universe};

/// Progress is logged after this many symbols per interval.
pub const PROGRESS_EVERY: usize = 25;

pub struct ScreenRuntime {
    fetcher: SignalFetcher,
    intervals: Vec<Interval>,
    rule: PassRule,
    concurrency: usize,
    metrics: Option<Arc<Metrics>>,
}

impl ScreenRuntime {
    pub fn new(config: &ScreenConfig, source: Arc<dyn SignalSource>) -> Self {
        Self {
            fetcher: SignalFetcher::new(source, &config.fetch),
            intervals: config.intervals.clone(),
            rule: config.pass_rule.clone(),
            concurrency: config.fetch.concurrency.max(1),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.fetcher = self.fetcher.with_metrics(metrics.clone());
        self.metrics = Some(metrics);
        self
    }

    /// Override the worker count (default from config).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Screen every symbol on every configured interval.
    ///
    /// Per-symbol failures are recorded in the report and never abort the
    /// run. Up to `concurrency` lookups run at once; the report is ordered by
    /// Universe position regardless of completion order.
    pub async fn run(&self, universe: &Universe) -> ScreenReport {
        if let Some(metrics) = &self.metrics {
            metrics.universe_size.set(universe.len() as i64);
        }

        let mut aggregator = ResultAggregator::new(universe, &self.intervals, self.rule.clone());
        let total = universe.len();

        for &interval in &self.intervals {
            info!(
                interval = %interval,
                symbols = total,
                concurrency = self.concurrency,
                "ScreenRuntime: scanning {} symbols on {}",
                total,
                interval
            );

            let fetcher = &self.fetcher;
            let mut outcomes = stream::iter(universe.iter().enumerate())
                .map(|(rank, symbol)| async move {
                    let result = fetcher.fetch(symbol, interval).await;
                    FetchOutcome {
                        rank,
                        symbol: symbol.clone(),
                        interval,
                        result,
                    }
                })
                .buffer_unordered(self.concurrency);

            let mut done = 0usize;
            let mut passed = 0usize;
            let mut failed = 0usize;
            while let Some(outcome) = outcomes.next().await {
                done += 1;
                match &outcome.result {
                    Ok(result) if self.rule.passes(result.recommendation) => {
                        passed += 1;
                        if let Some(metrics) = &self.metrics {
                            metrics.entries_passed_total.inc();
                        }
                    }
                    Ok(_) => {}
                    Err(error) => {
                        failed += 1;
                        if let ScreenError::UnsupportedSymbol { .. } = error {
                            debug!(
                                symbol = %outcome.symbol,
                                interval = %interval,
                                error = %error,
                                "ScreenRuntime: skipping unsupported symbol"
                            );
                        } else {
                            warn!(
                                symbol = %outcome.symbol,
                                interval = %interval,
                                error = %error,
                                "ScreenRuntime: skipping symbol after fetch failure"
                            );
                        }
                        if let (Some(metrics), Some(kind)) = (&self.metrics, error.failure_kind()) {
                            metrics.record_failure(kind);
                        }
                    }
                }

                if let Err(rejection) = aggregator.record(outcome) {
                    debug!(?rejection, "ScreenRuntime: outcome rejected by aggregator");
                }

                if done % PROGRESS_EVERY == 0 {
                    info!(
                        interval = %interval,
                        done,
                        total,
                        "ScreenRuntime: [{}] scanned {}/{}...",
                        interval,
                        done,
                        total
                    );
                }
            }

            info!(
                interval = %interval,
                scanned = done,
                passed,
                failed,
                "ScreenRuntime: {} done, {} passed {}, {} failures",
                interval,
                passed,
                self.rule.describe(),
                failed
            );
        }

        aggregator.finish()
    }
}

/// Full run against the live services named in `config`.
///
/// Configuration and universe problems return before any rating request.
pub async fn run_screen(
    config: &ScreenConfig,
    metrics: Option<Arc<Metrics>>,
) -> Result<RunSummary, ScreenError> {
    let started_at = Utc::now();

    let client = Arc::new(TradingViewClient::new(config.fetch.scanner_url.clone())?);
    let universe = load_universe(&config.universe).await?.slice(config.slice);
    if !config.slice.is_full() {
        info!(
            start = config.slice.start,
            end = ?config.slice.end,
            size = universe.len(),
            "Universe: sliced to {} symbols",
            universe.len()
        );
    }

    let source: Arc<dyn SignalSource> = Arc::new(TradingViewSignalSource::new(client));
    let mut runtime = ScreenRuntime::new(config, source);
    if let Some(metrics) = metrics {
        runtime = runtime.with_metrics(metrics);
    }

    let report = runtime.run(&universe).await;

    Ok(RunSummary {
        label: config.output.label.clone(),
        pass_rule: config.pass_rule.describe(),
        started_at,
        finished_at: Utc::now(),
        report,
    })
}
