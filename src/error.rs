//! Error taxonomy for a screening run.
//!
//! `InvalidInput` and `Universe` abort the run before any signal request is
//! made; `Output` aborts after the report is built. `Fetch` and
//! `UnsupportedSymbol` are scoped to one symbol and are recorded in the report
//! instead of propagated.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ScreenError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("universe source unavailable: {0}")]
    Universe(String),

    #[error("cannot write output: {0}")]
    Output(String),

    #[error("fetch failed for {target}: {reason}")]
    Fetch {
        target: String,
        reason: String,
        transient: bool,
    },

    #[error("{target} is not recognized by the data source")]
    UnsupportedSymbol { target: String },
}

/// Per-symbol failure category as it appears in reports and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Fetch,
    UnsupportedSymbol,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Fetch => "fetch",
            FailureKind::UnsupportedSymbol => "unsupported_symbol",
        }
    }
}

impl ScreenError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ScreenError::InvalidInput(msg.into())
    }

    pub fn fetch(target: impl Into<String>, reason: impl Into<String>, transient: bool) -> Self {
        ScreenError::Fetch {
            target: target.into(),
            reason: reason.into(),
            transient,
        }
    }

    pub fn unsupported(target: impl Into<String>) -> Self {
        ScreenError::UnsupportedSymbol {
            target: target.into(),
        }
    }

    /// Fatal errors abort the run; everything else is isolated to one symbol.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScreenError::InvalidInput(_) | ScreenError::Universe(_) | ScreenError::Output(_)
        )
    }

    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScreenError::Fetch { transient: true, .. })
    }

    /// Failure category for per-symbol errors, `None` for fatal ones.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ScreenError::Fetch { .. } => Some(FailureKind::Fetch),
            ScreenError::UnsupportedSymbol { .. } => Some(FailureKind::UnsupportedSymbol),
            _ => None,
        }
    }
}
