//! Per-symbol rating lookup with pacing, timeout, retry and venue fallback.

use std::sync::Arc;
use std::time::{Duration, Instant};

use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::error::ScreenError;
use crate::metrics::Metrics;
use crate::models::{Interval, Listing, SignalResult, Symbol};
use crate::services::listing::candidate_listings;
use crate::services::market_data::{Analysis, SignalSource};
use crate::signals::pacing::Pacer;

const RETRY_MIN_DELAY: Duration = Duration::from_millis(250);
const RETRY_MAX_DELAY: Duration = Duration::from_secs(5);

pub struct SignalFetcher {
    source: Arc<dyn SignalSource>,
    pacer: Arc<Pacer>,
    timeout: Duration,
    retries: usize,
    metrics: Option<Arc<Metrics>>,
}

impl SignalFetcher {
    pub fn new(source: Arc<dyn SignalSource>, config: &FetchConfig) -> Self {
        Self {
            source,
            pacer: Arc::new(Pacer::new(config.pacing)),
            timeout: config.timeout,
            retries: config.retries,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Share a pacer with other fetchers hitting the same source.
    pub fn with_pacer(mut self, pacer: Arc<Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Rate `symbol` on `interval`.
    ///
    /// Candidate listings are tried in order until one is recognized. A
    /// fetch error ends the search for this symbol.
    pub async fn fetch(&self, symbol: &Symbol, interval: Interval) -> Result<SignalResult, ScreenError> {
        for listing in candidate_listings(symbol) {
            match self.fetch_listing(&listing, interval).await {
                Ok(analysis) => {
                    debug!(
                        symbol = %symbol,
                        listing = %listing,
                        interval = %interval,
                        recommendation = %analysis.recommendation,
                        "SignalFetcher: rated {} via {}",
                        symbol,
                        listing
                    );
                    return Ok(SignalResult {
                        symbol: symbol.clone(),
                        interval,
                        listing,
                        recommendation: analysis.recommendation,
                        indicators: analysis.indicators,
                    });
                }
                Err(ScreenError::UnsupportedSymbol { .. }) => {
                    debug!(listing = %listing, "SignalFetcher: {} not recognized, trying next venue", listing);
                }
                Err(e) => return Err(e),
            }
        }
        Err(ScreenError::unsupported(symbol.to_string()))
    }

    async fn fetch_listing(&self, listing: &Listing, interval: Interval) -> Result<Analysis, ScreenError> {
        let attempt = || async move {
            self.pacer.wait().await;
            let started = Instant::now();
            let result = match tokio::time::timeout(self.timeout, self.source.analyze(listing, interval)).await {
                Ok(result) => result,
                Err(_) => Err(ScreenError::fetch(
                    listing.qualified(),
                    format!("timed out after {}s", self.timeout.as_secs_f64()),
                    true,
                )),
            };
            if let Some(metrics) = &self.metrics {
                metrics.observe_request(started.elapsed());
            }
            result
        };

        attempt
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(RETRY_MIN_DELAY)
                    .with_max_delay(RETRY_MAX_DELAY)
                    .with_max_times(self.retries),
            )
            .when(ScreenError::is_transient)
            .notify(|err, delay| {
                warn!(
                    listing = %listing,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "SignalFetcher: transient failure for {}, retrying",
                    listing
                );
            })
            .await
    }
}
