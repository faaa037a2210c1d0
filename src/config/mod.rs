//! Run configuration.
//!
//! Environment lookups live here and nowhere else; the pipeline only sees the
//! validated [`ScreenConfig`] built from CLI arguments and [`Endpoints`].

pub mod args;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::ScreenError;
use crate::models::{Interval, Market};
use crate::signals::filter::PassRule;

pub use args::{Args, OutputFormat, RankingKind, UniverseMode};

pub const DEFAULT_TRADINGVIEW_URL: &str = "https://scanner.tradingview.com";
pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";
/// S&P 500 constituents, with a `Symbol` column.
pub const DEFAULT_MEMBERSHIP_URL: &str =
    "https://datahub.io/core/s-and-p-500-companies/r/constituents.csv";

/// Deployment environment (`production`, `sandbox`, ...). Defaults to sandbox.
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .or_else(|_| env::var("ENVIRONMENT"))
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_tradingview_url() -> String {
    env::var("TRADINGVIEW_SCANNER_URL").unwrap_or_else(|_| DEFAULT_TRADINGVIEW_URL.to_string())
}

pub fn get_coingecko_url() -> String {
    env::var("COINGECKO_API_URL").unwrap_or_else(|_| DEFAULT_COINGECKO_URL.to_string())
}

pub fn get_membership_url() -> String {
    env::var("MEMBERSHIP_URL").unwrap_or_else(|_| DEFAULT_MEMBERSHIP_URL.to_string())
}

pub fn get_coingecko_api_key() -> Option<String> {
    env::var("COINGECKO_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
}

/// External service locations and credentials.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub scanner_url: String,
    pub coingecko_url: String,
    pub coingecko_api_key: Option<String>,
    /// Membership list used when neither a file nor a URL is given.
    pub membership_url: String,
}

impl Endpoints {
    pub fn from_env() -> Self {
        Self {
            scanner_url: get_tradingview_url(),
            coingecko_url: get_coingecko_url(),
            coingecko_api_key: get_coingecko_api_key(),
            membership_url: get_membership_url(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            scanner_url: DEFAULT_TRADINGVIEW_URL.to_string(),
            coingecko_url: DEFAULT_COINGECKO_URL.to_string(),
            coingecko_api_key: None,
            membership_url: DEFAULT_MEMBERSHIP_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RankingSource {
    /// Configured tickers, already in rank order.
    Static(Vec<String>),
    CoinGecko {
        base_url: String,
        api_key: Option<String>,
    },
}

/// Where a membership table is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum MembershipLocation {
    File(PathBuf),
    Url(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MembershipSource {
    pub location: MembershipLocation,
    pub market: Market,
    pub symbol_column: Option<String>,
    pub exchange_column: Option<String>,
    pub delimiter: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UniverseSelection {
    Top {
        n: usize,
        market: Market,
        ranking: RankingSource,
    },
    Membership(MembershipSource),
}

/// `[start, end)` window applied to the loaded Universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliceWindow {
    pub start: usize,
    pub end: Option<usize>,
}

impl SliceWindow {
    pub fn is_full(&self) -> bool {
        self.start == 0 && self.end.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub scanner_url: String,
    pub timeout: Duration,
    pub retries: usize,
    /// Minimum gap between two request starts.
    pub pacing: Duration,
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            scanner_url: DEFAULT_TRADINGVIEW_URL.to_string(),
            timeout: Duration::from_secs(10),
            retries: 2,
            pacing: Duration::from_millis(150),
            concurrency: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub dir: Option<PathBuf>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenConfig {
    pub universe: UniverseSelection,
    pub slice: SliceWindow,
    pub intervals: Vec<Interval>,
    pub pass_rule: PassRule,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
    pub metrics_file: Option<PathBuf>,
}

impl ScreenConfig {
    /// Validate CLI arguments into a run configuration.
    ///
    /// Every setup problem surfaces here as `InvalidInput`, before any
    /// network access.
    pub fn from_args(args: Args, endpoints: Endpoints) -> Result<Self, ScreenError> {
        let market: Market = args.market.parse()?;

        let universe = match args.universe {
            UniverseMode::Top => {
                if args.top == 0 {
                    return Err(ScreenError::invalid_input("--top must be at least 1"));
                }
                let ranking = match args.ranking {
                    RankingKind::Static => {
                        let symbols: Vec<String> = args
                            .symbols
                            .iter()
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect();
                        if symbols.is_empty() {
                            return Err(ScreenError::invalid_input(
                                "--ranking static requires --symbols",
                            ));
                        }
                        RankingSource::Static(symbols)
                    }
                    RankingKind::Coingecko => {
                        if market != Market::Crypto {
                            return Err(ScreenError::invalid_input(
                                "--ranking coingecko only ranks the crypto market",
                            ));
                        }
                        RankingSource::CoinGecko {
                            base_url: endpoints.coingecko_url.clone(),
                            api_key: endpoints.coingecko_api_key.clone(),
                        }
                    }
                };
                UniverseSelection::Top {
                    n: args.top,
                    market,
                    ranking,
                }
            }
            UniverseMode::Membership => {
                let location = match (&args.membership_file, &args.membership_url) {
                    (Some(_), Some(_)) => {
                        return Err(ScreenError::invalid_input(
                            "--membership-file and --membership-url are mutually exclusive",
                        ))
                    }
                    (Some(path), None) => MembershipLocation::File(path.clone()),
                    (None, url) => {
                        let url = url.clone().unwrap_or_else(|| endpoints.membership_url.clone());
                        Url::parse(&url).map_err(|e| {
                            ScreenError::invalid_input(format!("invalid membership URL '{}': {}", url, e))
                        })?;
                        MembershipLocation::Url(url)
                    }
                };
                if !args.delimiter.is_ascii() {
                    return Err(ScreenError::invalid_input(format!(
                        "delimiter '{}' must be a single ASCII character",
                        args.delimiter
                    )));
                }
                UniverseSelection::Membership(MembershipSource {
                    location,
                    market,
                    symbol_column: args.symbol_column.clone(),
                    exchange_column: args.exchange_column.clone(),
                    delimiter: args.delimiter as u8,
                })
            }
        };

        if let Some(end) = args.end {
            if args.start > end {
                return Err(ScreenError::invalid_input(format!(
                    "--start ({}) must not exceed --end ({})",
                    args.start, end
                )));
            }
        }

        let mut intervals = Vec::new();
        for raw in &args.intervals {
            let interval: Interval = raw.parse()?;
            if !intervals.contains(&interval) {
                intervals.push(interval);
            }
        }
        if intervals.is_empty() {
            return Err(ScreenError::invalid_input("at least one interval is required"));
        }

        let pass_rule = PassRule::from_options(&args.accept, args.min_rating.as_deref())?;

        if args.concurrency == 0 {
            return Err(ScreenError::invalid_input("--concurrency must be at least 1"));
        }
        if args.timeout_secs == 0 {
            return Err(ScreenError::invalid_input("--timeout-secs must be at least 1"));
        }

        let label = match &args.label {
            Some(label) => sanitize_label(label),
            None => default_label(&universe),
        };

        Ok(Self {
            universe,
            slice: SliceWindow {
                start: args.start,
                end: args.end,
            },
            intervals,
            pass_rule,
            fetch: FetchConfig {
                scanner_url: endpoints.scanner_url,
                timeout: Duration::from_secs(args.timeout_secs),
                retries: args.retries,
                pacing: Duration::from_millis(args.sleep_ms),
                concurrency: args.concurrency,
            },
            output: OutputConfig {
                format: args.format,
                dir: args.output_dir,
                label,
            },
            metrics_file: args.metrics_file,
        })
    }
}

fn default_label(universe: &UniverseSelection) -> String {
    match universe {
        UniverseSelection::Top { n, market, .. } => format!("top{}_{}", n, market),
        UniverseSelection::Membership(source) => {
            let stem = match &source.location {
                MembershipLocation::File(path) => path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned()),
                MembershipLocation::Url(url) => Url::parse(url)
                    .ok()
                    .and_then(|u| u.path_segments().and_then(|mut s| s.next_back().map(str::to_string)))
                    .map(|last| {
                        let stem = last.rsplit_once('.').map_or(last.as_str(), |(stem, _)| stem);
                        stem.to_string()
                    }),
            };
            stem.map(|s| sanitize_label(&s))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "membership".to_string())
        }
    }
}

fn sanitize_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
