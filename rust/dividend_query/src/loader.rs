// src/loader.rs

use crate::models::{CompanyInfo, DividendError, DividendRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

// Timestamp layouts seen in provider payloads; only the calendar date is kept
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Normalizes a provider date string to a calendar date.
///
/// Accepts plain `YYYY-MM-DD` dates as well as timestamps with or without an
/// offset. The time of day is dropped; offset timestamps keep the date as seen
/// in their own offset. Missing or unrecognised dates are rejected rather than
/// coerced.
pub fn normalize_date(raw: &str) -> Result<NaiveDate, DividendError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DividendError::DataFormat("missing dividend date".to_string()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.date_naive());
    }
    if let Ok(timestamp) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(timestamp.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(timestamp.date());
        }
    }

    Err(DividendError::DataFormat(format!(
        "invalid date format encountered: {}",
        raw
    )))
}

// Converts raw (date, amount) pairs into records, failing on the first bad date
pub fn parse_records(history: &[(String, f64)]) -> Result<Vec<DividendRecord>, DividendError> {
    history
        .iter()
        .map(|(date_str, amount)| Ok(DividendRecord::new(normalize_date(date_str)?, *amount)))
        .collect()
}

// The provider answers throttled or unknown calls with HTTP 200 and a message body
pub fn provider_message(body: &Value) -> Option<String> {
    ["Error Message", "Information", "Note"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

// Custom function to convert an optional JSON string to f64, "None" and blanks included
fn string_to_optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    Ok(s.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite()))
}

// Custom function to convert an optional JSON string to a NaiveDate
fn string_to_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    Ok(s.and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()))
}

// Custom function to treat the provider's "None" placeholder as a missing string
fn string_to_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "None"))
}

// Define the Dividend History API structure
#[derive(Deserialize, Debug)]
pub struct DividendHistory {
    #[serde(default)]
    pub ex_dividend_date: String,
    #[serde(default, deserialize_with = "string_to_optional_date")]
    pub declaration_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "string_to_optional_date")]
    pub record_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "string_to_optional_date")]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub amount: String,
}

// Struct for overall API response
#[derive(Deserialize, Debug)]
pub struct DividendHistoryResponse {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub data: Vec<DividendHistory>,
}

impl DividendHistoryResponse {
    /// Converts the payload into records keyed by ex-dividend date.
    ///
    /// Dates and amounts are validated here so a malformed payload surfaces as
    /// a data format error instead of a decode failure.
    pub fn into_records(self) -> Result<Vec<DividendRecord>, DividendError> {
        self.data
            .into_iter()
            .map(|entry| {
                let date = normalize_date(&entry.ex_dividend_date)?;
                let amount = entry.amount.trim().parse::<f64>().map_err(|_| {
                    DividendError::DataFormat(format!(
                        "invalid dividend amount '{}' on {}",
                        entry.amount, date
                    ))
                })?;
                Ok(DividendRecord::new(date, amount))
            })
            .collect()
    }
}

// Define Overview API structure, trimmed to the display fields
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct OverviewResponse {
    #[serde(default)]
    pub symbol: String,
    #[serde(default, deserialize_with = "string_to_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_to_optional_string")]
    pub exchange: Option<String>,
    #[serde(default, deserialize_with = "string_to_optional_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "string_to_optional_f64")]
    pub dividend_per_share: Option<f64>,
    #[serde(default, deserialize_with = "string_to_optional_f64")]
    pub dividend_yield: Option<f64>,
    #[serde(default, deserialize_with = "string_to_optional_date")]
    pub ex_dividend_date: Option<NaiveDate>,
}

// Struct for the latest quote
#[derive(Deserialize, Debug)]
pub struct GlobalQuote {
    #[serde(rename = "01. symbol", default)]
    pub symbol: String,
    #[serde(rename = "05. price", default, deserialize_with = "string_to_optional_f64")]
    pub price: Option<f64>,
    #[serde(
        rename = "07. latest trading day",
        default,
        deserialize_with = "string_to_optional_date"
    )]
    pub latest_trading_day: Option<NaiveDate>,
}

// Struct for the overall quote response
#[derive(Deserialize, Debug)]
pub struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote", default)]
    pub global_quote: Option<GlobalQuote>,
}

// Merges the overview and quote payloads; either may be missing
pub fn company_info(
    symbol: &str,
    overview: Option<OverviewResponse>,
    quote: Option<GlobalQuoteResponse>,
) -> CompanyInfo {
    let mut info = CompanyInfo::unnamed(symbol);
    if let Some(overview) = overview {
        info.name = overview.name;
        info.exchange = overview.exchange;
        info.currency = overview.currency;
    }
    info.current_price = quote
        .and_then(|quote| quote.global_quote)
        .and_then(|quote| quote.price);
    info
}
