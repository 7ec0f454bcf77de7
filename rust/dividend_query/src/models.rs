// src/models.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use validator::Validate;

#[derive(Debug, Error)]
pub enum DividendError {
    #[error("Malformed dividend data: {0}")]
    DataFormat(String),
    #[error("No dividend data found for {0}")]
    EmptyDataset(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Data provider error: {0}")]
    Provider(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

// A single cash distribution paid per share
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendRecord {
    pub date: NaiveDate,
    pub amount: f64,
}

impl DividendRecord {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        DividendRecord { date, amount }
    }
}

/// Distribution statistics over the dividend amounts.
///
/// Every field except `count` is `None` when it cannot be computed: all of
/// them for an empty set, and `std` for fewer than two amounts (the sample
/// standard deviation divides by `n - 1`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub records: Vec<DividendRecord>,  // Filtered, ascending by date
    pub total: f64,
    pub yearly_totals: BTreeMap<i32, f64>,  // Year, Sum
    pub last_record: Option<DividendRecord>,
    pub descriptive_stats: DescriptiveStats,
    pub window: Option<(NaiveDate, NaiveDate)>,  // Clamped window, window filtering only
}

impl AggregationResult {
    // Zero when nothing was paid in the filtered range
    pub fn last_dividend_amount(&self) -> f64 {
        self.last_record.map(|record| record.amount).unwrap_or(0.0)
    }

    pub fn last_dividend_date(&self) -> Option<NaiveDate> {
        self.last_record.map(|record| record.date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectionInput {
    #[validate(range(min = 1, message = "share count must be at least 1"))]
    pub share_count: u32,
    #[validate(range(min = 0.0, message = "average cost per share must not be negative"))]
    pub avg_cost_per_share: f64,
    pub basis: f64,  // Last dividend or total dividends, per share
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub dividends_received: f64,
    pub position_value: f64,
}

// Display-only company metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub current_price: Option<f64>,
}

impl CompanyInfo {
    pub fn unnamed(symbol: &str) -> Self {
        CompanyInfo {
            symbol: symbol.to_string(),
            name: None,
            exchange: None,
            currency: None,
            current_price: None,
        }
    }
}
