//! Command-line surface of the `screener` binary.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UniverseMode {
    /// Ranked top-N list
    Top,
    /// Rows of an index membership file
    Membership,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RankingKind {
    /// Symbols given with --symbols, in the given order
    Static,
    /// CoinGecko market-cap ranking (crypto only)
    Coingecko,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

/// Screen a symbol universe for technical BUY / STRONG_BUY ratings.
#[derive(Parser, Debug, Clone)]
#[command(name = "screener")]
#[command(version)]
#[command(about = "Screen a symbol universe for technical-analysis ratings.", long_about = None)]
pub struct Args {
    /// How the universe is selected
    #[arg(long, value_enum, default_value_t = UniverseMode::Top)]
    pub universe: UniverseMode,

    /// Number of ranked symbols in top mode
    #[arg(long, default_value_t = 500)]
    pub top: usize,

    /// Market the symbols trade in (crypto, america)
    #[arg(long, default_value = "crypto")]
    pub market: String,

    /// Where the top-N ranking comes from
    #[arg(long, value_enum, default_value_t = RankingKind::Coingecko)]
    pub ranking: RankingKind,

    /// Comma-separated tickers for --ranking static
    #[arg(long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Membership CSV on disk
    #[arg(long, conflicts_with = "membership_url")]
    pub membership_file: Option<PathBuf>,

    /// Membership CSV over HTTP (default: S&P 500 constituents, or MEMBERSHIP_URL)
    #[arg(long)]
    pub membership_url: Option<String>,

    /// Symbol column name (default: first header containing "ticker" or "symbol")
    #[arg(long)]
    pub symbol_column: Option<String>,

    /// Optional column pinning each row to an exchange
    #[arg(long)]
    pub exchange_column: Option<String>,

    /// Field delimiter of the membership file
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Timeframes to evaluate
    #[arg(long, value_delimiter = ',', default_values = ["4h", "1w"])]
    pub intervals: Vec<String>,

    /// Accepted ratings (default: BUY,STRONG_BUY)
    #[arg(long, value_delimiter = ',', conflicts_with = "min_rating")]
    pub accept: Vec<String>,

    /// Accept every rating at or above this one
    #[arg(long)]
    pub min_rating: Option<String>,

    /// Minimum milliseconds between two rating requests
    #[arg(long, env = "SCREENER_SLEEP_MS", default_value_t = 150)]
    pub sleep_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Retries for transient fetch failures
    #[arg(long, default_value_t = 2)]
    pub retries: usize,

    /// Concurrent rating requests
    #[arg(long, env = "SCREENER_CONCURRENCY", default_value_t = 1)]
    pub concurrency: usize,

    /// Start index (inclusive) into the universe, for resuming
    #[arg(long, default_value_t = 0)]
    pub start: usize,

    /// End index (exclusive) into the universe
    #[arg(long)]
    pub end: Option<usize>,

    /// Directory for per-interval CSV files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Format of the report printed to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Label used in output file names
    #[arg(long)]
    pub label: Option<String>,

    /// Write Prometheus text metrics to this file after the run
    #[arg(long)]
    pub metrics_file: Option<PathBuf>,
}
