//! Report rendering: text table, CSV and JSON.

use std::fs;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use serde::Serialize;
use tracing::info;

use crate::config::OutputFormat;
use crate::error::ScreenError;
use crate::models::{IntervalSection, RunSummary, ScreenEntry};

pub const CSV_HEADER: [&str; 7] = [
    "ticker",
    "name",
    "exchange",
    "listing",
    "rating",
    "timeframe",
    "market_cap",
];

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    ticker: &'a str,
    name: &'a str,
    exchange: &'a str,
    listing: String,
    rating: &'a str,
    timeframe: &'a str,
    market_cap: Option<f64>,
}

impl<'a> CsvRow<'a> {
    fn new(entry: &'a ScreenEntry, section: &'a IntervalSection) -> Self {
        Self {
            ticker: &entry.symbol.ticker,
            name: entry.symbol.name.as_deref().unwrap_or(""),
            exchange: &entry.listing.exchange,
            listing: entry.listing.qualified(),
            rating: entry.recommendation.as_str(),
            timeframe: section.interval.as_str(),
            market_cap: entry.symbol.market_cap,
        }
    }
}

/// Render the summary for stdout in `format`.
pub fn render(summary: &RunSummary, format: OutputFormat) -> Result<String, ScreenError> {
    match format {
        OutputFormat::Table => Ok(render_table(summary)),
        OutputFormat::Csv => render_csv(summary.report.sections.iter()),
        OutputFormat::Json => render_json(summary),
    }
}

pub fn render_table(summary: &RunSummary) -> String {
    let report = &summary.report;
    let mut out = String::new();

    out.push_str(&format!(
        "Screen '{}': {} symbols, rule {}\n",
        summary.label, report.universe_size, summary.pass_rule
    ));

    for section in &report.sections {
        out.push('\n');
        out.push_str(&format!(
            "=== {} === scanned {} | passed {} | failures {}\n",
            section.interval,
            section.scanned,
            section.entries.len(),
            section.failure_count()
        ));
        if section.entries.is_empty() {
            out.push_str("  (no symbols passed)\n");
            continue;
        }
        out.push_str(&format!(
            "  {:>4}  {:<12} {:<22} {:<12} {:>8}\n",
            "#", "TICKER", "LISTING", "RATING", "SCORE"
        ));
        for entry in &section.entries {
            out.push_str(&format!(
                "  {:>4}  {:<12} {:<22} {:<12} {:>8.3}\n",
                entry.rank + 1,
                entry.symbol.ticker,
                entry.listing.qualified(),
                entry.recommendation.as_str(),
                entry.indicators.score
            ));
        }
    }

    out.push_str(&format!(
        "\nTotal: {} passing, {} failures\n",
        report.total_entries(),
        report.failure_count()
    ));
    out
}

/// CSV of the given sections with a single header row.
pub fn render_csv<'a>(
    sections: impl IntoIterator<Item = &'a IntervalSection>,
) -> Result<String, ScreenError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    let csv_err = |e: csv::Error| ScreenError::Output(format!("CSV encoding failed: {}", e));

    writer.write_record(CSV_HEADER).map_err(csv_err)?;
    for section in sections {
        for entry in &section.entries {
            writer.serialize(CsvRow::new(entry, section)).map_err(csv_err)?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ScreenError::Output(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ScreenError::Output(e.to_string()))
}

pub fn render_json(summary: &RunSummary) -> Result<String, ScreenError> {
    serde_json::to_string_pretty(summary)
        .map_err(|e| ScreenError::Output(format!("JSON encoding failed: {}", e)))
}

/// `screen_{label}_{interval}.csv`, with the month interval spelled `1mo`.
pub fn csv_file_name(label: &str, section: &IntervalSection) -> String {
    format!("screen_{}_{}.csv", label, section.interval.file_token())
}

/// Write one CSV per interval into `dir`, creating it if needed. Files are
/// written even when no symbol passed.
pub fn write_csv_files(summary: &RunSummary, dir: &Path) -> Result<Vec<PathBuf>, ScreenError> {
    fs::create_dir_all(dir).map_err(|e| {
        ScreenError::Output(format!("cannot create output directory {}: {}", dir.display(), e))
    })?;

    let mut written = Vec::with_capacity(summary.report.sections.len());
    for section in &summary.report.sections {
        let path = dir.join(csv_file_name(&summary.label, section));
        let content = render_csv(std::iter::once(section))?;
        fs::write(&path, content)
            .map_err(|e| ScreenError::Output(format!("cannot write {}: {}", path.display(), e)))?;
        info!(
            path = %path.display(),
            entries = section.entries.len(),
            "Output: wrote {} with {} symbols",
            path.display(),
            section.entries.len()
        );
        written.push(path);
    }
    Ok(written)
}
