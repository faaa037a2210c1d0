//! Collect per-symbol outcomes into a [`ScreenReport`].

use std::collections::HashSet;

use tracing::warn;

use crate::error::{FailureKind, ScreenError};
use crate::models::{
    FailureRecord, Interval, IntervalSection, ScreenEntry, ScreenReport, SignalResult, Symbol,
};
use crate::signals::filter::PassRule;
use crate::universe::Universe;

/// Result of one (Symbol, Interval) lookup, tagged with the symbol's
/// position in the Universe.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub rank: usize,
    pub symbol: Symbol,
    pub interval: Interval,
    pub result: Result<SignalResult, ScreenError>,
}

/// Why an outcome was not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    ForeignSymbol,
    UnknownInterval,
    Duplicate,
}

/// Builds the report. Outcomes may arrive in any order; `finish` restores
/// Universe order, so the same outcomes always give the same report.
pub struct ResultAggregator<'a> {
    universe: &'a Universe,
    rule: PassRule,
    sections: Vec<IntervalSection>,
    seen: HashSet<(usize, Interval)>,
}

impl<'a> ResultAggregator<'a> {
    pub fn new(universe: &'a Universe, intervals: &[Interval], rule: PassRule) -> Self {
        let mut sections: Vec<IntervalSection> = Vec::with_capacity(intervals.len());
        for interval in intervals {
            if !sections.iter().any(|s| s.interval == *interval) {
                sections.push(IntervalSection::new(*interval));
            }
        }
        Self {
            universe,
            rule,
            sections,
            seen: HashSet::new(),
        }
    }

    pub fn rule(&self) -> &PassRule {
        &self.rule
    }

    /// Record one outcome. Foreign symbols, unconfigured intervals and
    /// repeated (Symbol, Interval) pairs are dropped.
    pub fn record(&mut self, outcome: FetchOutcome) -> Result<(), Rejection> {
        let belongs = self
            .universe
            .get(outcome.rank)
            .map(|s| s.key() == outcome.symbol.key())
            .unwrap_or(false);
        if !belongs {
            warn!(
                symbol = %outcome.symbol,
                rank = outcome.rank,
                "Aggregator: dropping outcome for symbol outside the universe"
            );
            return Err(Rejection::ForeignSymbol);
        }

        let Some(section) = self.sections.iter_mut().find(|s| s.interval == outcome.interval) else {
            warn!(interval = %outcome.interval, "Aggregator: dropping outcome for unconfigured interval");
            return Err(Rejection::UnknownInterval);
        };

        if !self.seen.insert((outcome.rank, outcome.interval)) {
            warn!(
                symbol = %outcome.symbol,
                interval = %outcome.interval,
                "Aggregator: dropping duplicate outcome"
            );
            return Err(Rejection::Duplicate);
        }

        section.scanned += 1;
        match outcome.result {
            Ok(result) => {
                if self.rule.passes(result.recommendation) {
                    section.entries.push(ScreenEntry {
                        rank: outcome.rank,
                        symbol: result.symbol,
                        listing: result.listing,
                        recommendation: result.recommendation,
                        indicators: result.indicators,
                    });
                }
            }
            Err(error) => {
                // Fatal errors never reach the aggregator; count them as fetch failures if they do.
                let kind = error.failure_kind().unwrap_or(FailureKind::Fetch);
                section.failures.push(FailureRecord {
                    rank: outcome.rank,
                    ticker: outcome.symbol.ticker.clone(),
                    kind,
                    reason: error.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> ScreenReport {
        for section in &mut self.sections {
            section.entries.sort_by_key(|e| e.rank);
            section.failures.sort_by_key(|f| f.rank);
        }
        ScreenReport {
            universe_size: self.universe.len(),
            sections: self.sections,
        }
    }
}
