//! Rating source interface.
//!
//! The fetch stage only depends on this trait, so runs can be driven by the
//! live scanner or by a deterministic in-memory source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::ScreenError;
use crate::models::{IndicatorSnapshot, Interval, Listing, Recommendation};

/// Rating returned by a source for one listing and interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub recommendation: Recommendation,
    pub indicators: IndicatorSnapshot,
}

impl Analysis {
    /// Build from an aggregate score, rejecting scores outside [-1, 1].
    pub fn from_score(score: f64, target: &str) -> Result<Self, ScreenError> {
        let recommendation = Recommendation::from_score(score).ok_or_else(|| {
            ScreenError::fetch(target, format!("rating score {} out of range", score), false)
        })?;
        Ok(Self {
            recommendation,
            indicators: IndicatorSnapshot::new(score),
        })
    }
}

#[async_trait::async_trait]
pub trait SignalSource: Send + Sync {
    /// Rate one exchange-qualified listing on one interval.
    ///
    /// Fails with `UnsupportedSymbol` when the source does not know the
    /// listing and with `Fetch` on transport or protocol problems.
    async fn analyze(&self, listing: &Listing, interval: Interval) -> Result<Analysis, ScreenError>;
}

/// In-memory source keyed by `EXCHANGE:TICKER` (or bare ticker) and interval.
///
/// Unknown listings answer `UnsupportedSymbol`; configured errors are
/// returned as-is. Counts every call.
#[derive(Default)]
pub struct StaticSignalSource {
    answers: HashMap<(String, Interval), Result<Analysis, ScreenError>>,
    calls: AtomicUsize,
}

impl StaticSignalSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rating(mut self, key: &str, interval: Interval, recommendation: Recommendation) -> Self {
        let score = match recommendation {
            Recommendation::StrongSell => -0.8,
            Recommendation::Sell => -0.3,
            Recommendation::Neutral => 0.0,
            Recommendation::Buy => 0.3,
            Recommendation::StrongBuy => 0.8,
        };
        self.answers.insert(
            (key.to_string(), interval),
            Ok(Analysis {
                recommendation,
                indicators: IndicatorSnapshot::new(score),
            }),
        );
        self
    }

    pub fn with_error(mut self, key: &str, interval: Interval, error: ScreenError) -> Self {
        self.answers.insert((key.to_string(), interval), Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SignalSource for StaticSignalSource {
    async fn analyze(&self, listing: &Listing, interval: Interval) -> Result<Analysis, ScreenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let qualified = listing.qualified();
        self.answers
            .get(&(qualified.clone(), interval))
            .or_else(|| self.answers.get(&(listing.ticker.clone(), interval)))
            .cloned()
            .unwrap_or_else(|| Err(ScreenError::unsupported(qualified)))
    }
}
