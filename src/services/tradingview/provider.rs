//! Scanner-backed [`SignalSource`].

use std::sync::Arc;

use async_trait::async_trait;

use super::client::TradingViewClient;
use super::messages::ScanRequest;
use crate::error::ScreenError;
use crate::models::{IndicatorSnapshot, Interval, Listing};
use crate::services::market_data::{Analysis, SignalSource};

pub struct TradingViewSignalSource {
    client: Arc<TradingViewClient>,
}

impl TradingViewSignalSource {
    pub fn new(client: Arc<TradingViewClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<TradingViewClient> {
        &self.client
    }
}

#[async_trait]
impl SignalSource for TradingViewSignalSource {
    async fn analyze(&self, listing: &Listing, interval: Interval) -> Result<Analysis, ScreenError> {
        let target = listing.qualified();
        let request = ScanRequest::rating(listing, interval);
        let response = self.client.scan(listing.market.screener(), &request).await?;

        if let Some(error) = response.error.filter(|e| !e.is_empty()) {
            return Err(ScreenError::fetch(&target, format!("scanner error: {}", error), false));
        }

        // Unknown listings come back as an empty data array.
        let row = response
            .data
            .unwrap_or_default()
            .into_iter()
            .find(|row| row.s.eq_ignore_ascii_case(&target))
            .ok_or_else(|| ScreenError::unsupported(&target))?;

        // Listings the scanner knows but cannot rate carry a null score.
        let score = row
            .value("Recommend.All")
            .ok_or_else(|| ScreenError::unsupported(&target))?;

        let mut analysis = Analysis::from_score(score, &target)?;
        analysis.indicators = IndicatorSnapshot {
            score,
            moving_averages: row.value("Recommend.MA"),
            oscillators: row.value("Recommend.Other"),
            rsi: row.value("RSI"),
            macd: row.value("MACD.macd"),
            macd_signal: row.value("MACD.signal"),
            close: row.value("close"),
            volume: row.value("volume"),
        };
        Ok(analysis)
    }
}
