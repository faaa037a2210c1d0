//! Shared data models spanning the screening stages.

pub mod interval;
pub mod report;
pub mod signal;
pub mod symbol;

pub use interval::Interval;
pub use report::{FailureRecord, IntervalSection, RunSummary, ScreenEntry, ScreenReport};
pub use signal::{IndicatorSnapshot, Recommendation, SignalResult};
pub use symbol::{Listing, Market, Symbol};
