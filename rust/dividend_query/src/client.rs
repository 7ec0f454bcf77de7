// src/client.rs

use crate::loader::{
    company_info, provider_message, DividendHistoryResponse, GlobalQuoteResponse,
    OverviewResponse,
};
use crate::models::{CompanyInfo, DividendError, DividendRecord};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// HTTP client for an Alpha Vantage style market-data API.
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    http: Client,
    base_url: String,
    api_key: String,
}

/// Company metadata plus whether every lookup behind it succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyLookup {
    pub info: CompanyInfo,
    pub complete: bool,
}

// Tickers are case-insensitive; only blank input is rejected
pub fn normalize_ticker(ticker: &str) -> Result<String, DividendError> {
    let symbol = ticker.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(DividendError::InvalidInput("ticker symbol is empty".to_string()));
    }
    Ok(symbol)
}

impl AlphaVantageClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, api_key)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        AlphaVantageClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn query(&self, function: &str, symbol: &str) -> Result<Value, DividendError> {
        let url = format!("{}/query", self.base_url);
        log::debug!("[{symbol}] GET {url} function={function}");

        let body: Value = self
            .http
            .get(&url)
            .query(&[
                ("function", function),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(message) = provider_message(&body) {
            log::warn!("[{symbol}] {function} rejected by provider: {message}");
            return Err(DividendError::Provider(message));
        }
        Ok(body)
    }

    async fn query_as<T: DeserializeOwned>(&self, function: &str, symbol: &str) -> Result<T, DividendError> {
        let body = self.query(function, symbol).await?;
        serde_json::from_value(body).map_err(|e| {
            DividendError::DataFormat(format!("unexpected {} payload for {}: {}", function, symbol, e))
        })
    }

    /// Fetches the full dividend history of a ticker, in provider order.
    pub async fn fetch_dividends(&self, ticker: &str) -> Result<Vec<DividendRecord>, DividendError> {
        let symbol = normalize_ticker(ticker)?;
        let response: DividendHistoryResponse = self.query_as("DIVIDENDS", &symbol).await?;
        let records = response.into_records()?;
        log::info!("[{symbol}] fetched {} dividend records", records.len());
        Ok(records)
    }

    /// Fetches display metadata. Failures only cost the display fields, so
    /// they are logged and replaced by empty values; the lookup is then
    /// marked incomplete.
    pub async fn fetch_company_info(&self, ticker: &str) -> Result<CompanyLookup, DividendError> {
        let symbol = normalize_ticker(ticker)?;

        let overview = match self.query_as::<OverviewResponse>("OVERVIEW", &symbol).await {
            Ok(overview) => Some(overview),
            Err(e) => {
                log::warn!("[{symbol}] company overview unavailable: {e}");
                None
            }
        };
        let quote = match self.query_as::<GlobalQuoteResponse>("GLOBAL_QUOTE", &symbol).await {
            Ok(quote) => Some(quote),
            Err(e) => {
                log::warn!("[{symbol}] latest quote unavailable: {e}");
                None
            }
        };

        let complete = overview.is_some() && quote.is_some();
        Ok(CompanyLookup {
            info: company_info(&symbol, overview, quote),
            complete,
        })
    }
}
