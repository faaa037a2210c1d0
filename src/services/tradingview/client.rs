//! HTTP client for the scanner endpoint.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use super::messages::{ScanRequest, ScanResponse};
use crate::error::ScreenError;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

pub struct TradingViewClient {
    base_url: String,
    http: reqwest::Client,
}

impl TradingViewClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ScreenError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ScreenError::invalid_input(format!("failed to build HTTP client: {}", e)))?;
        Self::with_client(base_url, http)
    }

    /// Use a preconfigured `reqwest::Client` (tests point this at a mock server).
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Result<Self, ScreenError> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|e| {
            ScreenError::invalid_input(format!("invalid scanner URL '{}': {}", base_url, e))
        })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a scan request to `{base}/{screener}/scan`.
    pub async fn scan(&self, screener: &str, request: &ScanRequest) -> Result<ScanResponse, ScreenError> {
        let url = format!("{}/{}/scan", self.base_url, screener);
        let target = request.symbols.tickers.join(",");
        debug!(url = %url, target = %target, "TradingViewClient: sending scan request");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let transient = e.is_timeout() || e.is_connect() || e.is_request();
                ScreenError::fetch(&target, format!("request error: {}", e), transient)
            })?;

        let status = response.status();
        if !status.is_success() {
            let transient = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            let body = response.text().await.unwrap_or_default();
            return Err(ScreenError::fetch(
                &target,
                format!("HTTP {}: {}", status, body.chars().take(200).collect::<String>()),
                transient,
            ));
        }

        response
            .json::<ScanResponse>()
            .await
            .map_err(|e| ScreenError::fetch(&target, format!("malformed response: {}", e), false))
    }
}
