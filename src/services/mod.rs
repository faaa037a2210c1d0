//! External rating sources.

pub mod listing;
pub mod market_data;
pub mod tradingview;

pub use listing::candidate_listings;
pub use market_data::{Analysis, SignalSource, StaticSignalSource};
