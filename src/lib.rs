//! Technical-rating universe screener.
//!
//! Pipeline: [`universe`] builds the symbol list, [`signals::SignalFetcher`]
//! rates every symbol on every interval through a [`services::SignalSource`],
//! and [`signals::ResultAggregator`] keeps the passing ones in universe order.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod output;
pub mod services;
pub mod signals;
pub mod universe;

pub use error::{FailureKind, ScreenError};
