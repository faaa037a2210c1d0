//! TradingView scanner rating source.

pub mod client;
pub mod messages;
pub mod provider;

pub use client::TradingViewClient;
pub use provider::TradingViewSignalSource;
