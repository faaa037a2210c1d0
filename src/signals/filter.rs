//! Pass/fail rule applied to each rating.

use std::collections::BTreeSet;

use crate::error::ScreenError;
use crate::models::Recommendation;

/// Set of ratings that make a symbol pass.
///
/// Every fetched score maps to exactly one label, so the rule only has to
/// decide label membership. NEUTRAL passes only if listed explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassRule {
    accepted: BTreeSet<Recommendation>,
}

impl PassRule {
    pub fn accepting(labels: impl IntoIterator<Item = Recommendation>) -> Self {
        Self {
            accepted: labels.into_iter().collect(),
        }
    }

    /// Everything at or above `min` on the bearish-to-bullish scale.
    pub fn at_least(min: Recommendation) -> Self {
        Self::accepting(
            [
                Recommendation::StrongSell,
                Recommendation::Sell,
                Recommendation::Neutral,
                Recommendation::Buy,
                Recommendation::StrongBuy,
            ]
            .into_iter()
            .filter(|r| *r >= min),
        )
    }

    /// Build from `--accept` labels or a `--min-rating` threshold; neither
    /// given means the default rule.
    pub fn from_options(accept: &[String], min_rating: Option<&str>) -> Result<Self, ScreenError> {
        if let Some(min) = min_rating {
            if !accept.is_empty() {
                return Err(ScreenError::invalid_input(
                    "--accept and --min-rating are mutually exclusive",
                ));
            }
            return Ok(Self::at_least(min.parse()?));
        }

        let labels = accept
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<Recommendation>())
            .collect::<Result<Vec<_>, _>>()?;

        if labels.is_empty() {
            Ok(Self::default())
        } else {
            Ok(Self::accepting(labels))
        }
    }

    pub fn passes(&self, recommendation: Recommendation) -> bool {
        self.accepted.contains(&recommendation)
    }

    pub fn accepted(&self) -> impl Iterator<Item = &Recommendation> {
        self.accepted.iter()
    }

    pub fn describe(&self) -> String {
        self.accepted
            .iter()
            .map(Recommendation::as_str)
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl Default for PassRule {
    /// BUY or STRONG_BUY.
    fn default() -> Self {
        Self::at_least(Recommendation::Buy)
    }
}
