// src/models.rs

use chrono::NaiveDate;
use dividend_query::models::DescriptiveStats;
use dividend_query::pipeline::{DEFAULT_AVG_COST_PER_SHARE, DEFAULT_SHARE_COUNT};
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_share_count() -> u32 {
    DEFAULT_SHARE_COUNT
}

fn default_avg_cost_per_share() -> f64 {
    DEFAULT_AVG_COST_PER_SHARE
}

// Query string of GET /dividends/{ticker}
#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct DividendQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub as_of: Option<NaiveDate>,
    #[serde(default = "default_share_count")]
    #[validate(range(min = 1, message = "share count must be at least 1"))]
    pub share_count: u32,
    #[serde(default = "default_avg_cost_per_share")]
    #[validate(range(min = 0.0, message = "average cost per share must not be negative"))]
    pub avg_cost_per_share: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RawDividend {
    pub date: String,
    pub amount: f64,
}

// Body of POST /analyze; records are supplied by the caller
#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1, message = "ticker must not be empty"))]
    pub ticker: String,
    pub name: Option<String>,
    pub current_price: Option<f64>,
    pub records: Vec<RawDividend>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub as_of: Option<NaiveDate>,
    #[serde(default = "default_share_count")]
    #[validate(range(min = 1, message = "share count must be at least 1"))]
    pub share_count: u32,
    #[serde(default = "default_avg_cost_per_share")]
    #[validate(range(min = 0.0, message = "average cost per share must not be negative"))]
    pub avg_cost_per_share: f64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorResponse {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub title: String,
    pub ticker: String,
    pub current_price: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecordRow {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LastDividendView {
    pub amount: f64,
    pub date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct YearlyBar {
    pub year: i32,
    pub total: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectionView {
    pub basis: f64,
    pub dividends_received: f64,
    pub position_value: f64,
    pub dividends_received_display: String,
    pub position_value_display: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SidebarView {
    pub share_count: u32,
    pub avg_cost_per_share: f64,
    pub from_last_dividend: ProjectionView,
    pub from_total_dividends: ProjectionView,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WindowView {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

// Everything one dashboard page shows
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub header: HeaderView,
    pub table: Vec<RecordRow>,
    pub summary: DescriptiveStats,
    pub total_dividends: f64,
    pub total_dividends_display: String,
    pub last_dividend: LastDividendView,
    pub time_series: Vec<RecordRow>,
    pub histogram: Vec<HistogramBin>,
    pub yearly_summary: Vec<YearlyBar>,
    pub sidebar: SidebarView,
    pub window: Option<WindowView>,
}
