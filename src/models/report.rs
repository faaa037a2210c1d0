use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::FailureKind;
use crate::models::interval::Interval;
use crate::models::signal::{IndicatorSnapshot, Recommendation};
use crate::models::symbol::{Listing, Symbol};

/// A passing (Symbol, Interval) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenEntry {
    /// Position of the symbol in the Universe.
    pub rank: usize,
    pub symbol: Symbol,
    pub listing: Listing,
    pub recommendation: Recommendation,
    pub indicators: IndicatorSnapshot,
}

/// A symbol whose lookup failed and was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    pub rank: usize,
    pub ticker: String,
    pub kind: FailureKind,
    pub reason: String,
}

/// Results for one interval, in Universe order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalSection {
    pub interval: Interval,
    pub scanned: usize,
    pub entries: Vec<ScreenEntry>,
    pub failures: Vec<FailureRecord>,
}

impl IntervalSection {
    pub fn new(interval: Interval) -> Self {
        Self {
            interval,
            scanned: 0,
            entries: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Final screening output, grouped by interval in the configured order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenReport {
    pub universe_size: usize,
    pub sections: Vec<IntervalSection>,
}

impl ScreenReport {
    pub fn section(&self, interval: Interval) -> Option<&IntervalSection> {
        self.sections.iter().find(|s| s.interval == interval)
    }

    pub fn total_entries(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    pub fn failure_count(&self) -> usize {
        self.sections.iter().map(IntervalSection::failure_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_entries() == 0
    }
}

/// Report plus run metadata. Only this envelope carries wall-clock times.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub label: String,
    pub pass_rule: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub report: ScreenReport,
}
