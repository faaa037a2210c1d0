//! Fetch, filter and aggregate rating signals.

pub mod aggregation;
pub mod fetcher;
pub mod filter;
pub mod pacing;

pub use aggregation::{FetchOutcome, Rejection, ResultAggregator};
pub use fetcher::SignalFetcher;
pub use filter::PassRule;
pub use pacing::Pacer;
