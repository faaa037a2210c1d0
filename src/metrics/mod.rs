//! Prometheus metrics for a screening run.
//!
//! A batch run has no scrape endpoint, so the registry is exported once in
//! text format (node-exporter textfile style) when the run ends.

use std::path::Path;
use std::time::Duration;

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use tracing::{info, warn};

use crate::error::{FailureKind, ScreenError};

pub struct Metrics {
    registry: Registry,
    pub fetch_requests_total: IntCounter,
    pub fetch_failures_total: IntCounterVec,
    pub fetch_duration_seconds: Histogram,
    pub entries_passed_total: IntCounter,
    pub universe_size: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let fetch_requests_total = IntCounter::with_opts(Opts::new(
            "screener_fetch_requests_total",
            "Rating requests sent to the data source, retries included",
        ))?;
        let fetch_failures_total = IntCounterVec::new(
            Opts::new(
                "screener_fetch_failures_total",
                "Symbols skipped because their rating could not be fetched",
            ),
            &["kind"],
        )?;
        let fetch_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "screener_fetch_duration_seconds",
                "Latency of single rating requests",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;
        let entries_passed_total = IntCounter::with_opts(Opts::new(
            "screener_entries_passed_total",
            "Symbol/interval pairs that passed the rating rule",
        ))?;
        let universe_size = IntGauge::with_opts(Opts::new(
            "screener_universe_size",
            "Symbols in the screened universe",
        ))?;

        registry.register(Box::new(fetch_requests_total.clone()))?;
        registry.register(Box::new(fetch_failures_total.clone()))?;
        registry.register(Box::new(fetch_duration_seconds.clone()))?;
        registry.register(Box::new(entries_passed_total.clone()))?;
        registry.register(Box::new(universe_size.clone()))?;

        Ok(Self {
            registry,
            fetch_requests_total,
            fetch_failures_total,
            fetch_duration_seconds,
            entries_passed_total,
            universe_size,
        })
    }

    pub fn observe_request(&self, elapsed: Duration) {
        self.fetch_requests_total.inc();
        self.fetch_duration_seconds.observe(elapsed.as_secs_f64());
    }

    pub fn record_failure(&self, kind: FailureKind) {
        self.fetch_failures_total
            .with_label_values(&[kind.as_str()])
            .inc();
    }

    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ScreenError> {
        let text = self
            .export()
            .map_err(|e| ScreenError::Output(format!("failed to encode metrics: {}", e)))?;
        std::fs::write(path, text).map_err(|e| {
            ScreenError::Output(format!("failed to write metrics to {}: {}", path.display(), e))
        })
    }

    /// Write the metrics file once the report is out. Failures are logged and
    /// reported through the return value only; they never fail the run.
    pub fn persist(&self, path: &Path) -> bool {
        match self.write_to(path) {
            Ok(()) => {
                info!(path = %path.display(), "Metrics: wrote {}", path.display());
                true
            }
            Err(e) => {
                warn!(error = %e, "Metrics: metrics file not written");
                false
            }
        }
    }
}
