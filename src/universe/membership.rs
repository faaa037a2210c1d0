//! Membership tables: delimited files or downloads with a ticker column.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use super::Universe;
use crate::config::{MembershipLocation, MembershipSource};
use crate::error::ScreenError;
use crate::models::Symbol;
use crate::services::tradingview::client::BROWSER_USER_AGENT;

const REMOTE_TIMEOUT: Duration = Duration::from_secs(20);

/// Canonical ticker form: no whitespace, `.` and `/` become `-`, uppercase.
pub fn normalize_ticker(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '.' | '/' => '-',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Load a membership table from wherever `source` points.
pub async fn load_membership(source: &MembershipSource) -> Result<Universe, ScreenError> {
    match &source.location {
        MembershipLocation::File(path) => read_membership(path, source),
        MembershipLocation::Url(url) => {
            let http = reqwest::Client::builder()
                .user_agent(BROWSER_USER_AGENT)
                .timeout(REMOTE_TIMEOUT)
                .build()
                .map_err(|e| ScreenError::invalid_input(format!("failed to build HTTP client: {}", e)))?;
            fetch_membership(&http, url, source).await
        }
    }
}

pub fn read_membership(path: &Path, source: &MembershipSource) -> Result<Universe, ScreenError> {
    let file = File::open(path).map_err(|e| {
        ScreenError::invalid_input(format!(
            "cannot read membership file {}: {}",
            path.display(),
            e
        ))
    })?;
    read_membership_from_reader(file, source)
}

/// Download and parse a membership table. Any failure, including a table
/// without a symbol column, is a `Universe` error.
pub async fn fetch_membership(
    http: &reqwest::Client,
    url: &str,
    source: &MembershipSource,
) -> Result<Universe, ScreenError> {
    info!(url = %url, "Membership: downloading member list");
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| ScreenError::Universe(format!("membership download from {} failed: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScreenError::Universe(format!(
            "membership source {} returned HTTP {}",
            url, status
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ScreenError::Universe(format!("membership download from {} failed: {}", url, e)))?;

    read_membership_from_reader(body.as_bytes(), source)
        .map_err(|e| ScreenError::Universe(format!("membership list at {} is unusable: {}", url, e)))
}

pub fn read_membership_from_reader<R: Read>(
    reader: R,
    source: &MembershipSource,
) -> Result<Universe, ScreenError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(source.delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| ScreenError::invalid_input(format!("malformed membership header: {}", e)))?
        .clone();

    let symbol_idx = match &source.symbol_column {
        Some(name) => find_exact(&headers, name).ok_or_else(|| {
            ScreenError::invalid_input(format!("membership file has no '{}' column", name))
        })?,
        None => find_ticker_like(&headers).ok_or_else(|| {
            ScreenError::invalid_input("membership file must contain a 'ticker' or 'symbol' column")
        })?,
    };

    let exchange_idx = match &source.exchange_column {
        Some(name) => Some(find_exact(&headers, name).ok_or_else(|| {
            ScreenError::invalid_input(format!("membership file has no '{}' column", name))
        })?),
        None => None,
    };

    debug!(
        column = %headers.get(symbol_idx).unwrap_or_default(),
        "Membership: using symbol column"
    );

    let mut symbols = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            ScreenError::invalid_input(format!("malformed membership row {}: {}", line + 2, e))
        })?;
        let ticker = normalize_ticker(record.get(symbol_idx).unwrap_or_default());
        if ticker.is_empty() {
            continue;
        }
        let mut symbol = Symbol::new(ticker, source.market);
        if let Some(idx) = exchange_idx {
            if let Some(exchange) = record.get(idx).filter(|e| !e.is_empty()) {
                symbol = symbol.with_exchange(exchange);
            }
        }
        symbols.push(symbol);
    }

    Ok(Universe::new(symbols))
}

fn find_exact(headers: &StringRecord, name: &str) -> Option<usize> {
    let wanted = name.trim();
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(wanted))
}

fn find_ticker_like(headers: &StringRecord) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().to_ascii_lowercase();
        h.contains("ticker") || h.contains("symbol")
    })
}
