// src/report.rs

use crate::models::{
    DashboardView, HeaderView, HistogramBin, LastDividendView, ProjectionView, RecordRow,
    SidebarView, WindowView, YearlyBar,
};
use dividend_query::models::{CompanyInfo, ProjectionResult};
use dividend_query::pipeline::DividendReport;

pub const HISTOGRAM_BINS: usize = 20;

const NAME_NOT_AVAILABLE: &str = "Name not available";
const PRICE_NOT_AVAILABLE: &str = "Price not available";
const DATE_NOT_AVAILABLE: &str = "not available";

pub fn money(value: f64) -> String {
    format!("${:.2}", value)
}

/// Renders a report into the view the dashboard displays.
pub fn render(report: &DividendReport) -> DashboardView {
    let aggregation = &report.aggregation;
    let rows: Vec<RecordRow> = aggregation
        .records
        .iter()
        .map(|record| RecordRow {
            date: record.date,
            amount: record.amount,
        })
        .collect();
    let amounts: Vec<f64> = rows.iter().map(|row| row.amount).collect();

    DashboardView {
        header: header(&report.company),
        table: rows.clone(),
        summary: aggregation.descriptive_stats.clone(),
        total_dividends: aggregation.total,
        total_dividends_display: money(aggregation.total),
        last_dividend: LastDividendView {
            amount: aggregation.last_dividend_amount(),
            date: aggregation
                .last_dividend_date()
                .map(|date| date.to_string())
                .unwrap_or_else(|| DATE_NOT_AVAILABLE.to_string()),
        },
        time_series: rows,
        histogram: histogram(&amounts, HISTOGRAM_BINS),
        yearly_summary: aggregation
            .yearly_totals
            .iter()
            .map(|(year, total)| YearlyBar {
                year: *year,
                total: *total,
            })
            .collect(),
        sidebar: SidebarView {
            share_count: report.share_count,
            avg_cost_per_share: report.avg_cost_per_share,
            from_last_dividend: projection_view(
                aggregation.last_dividend_amount(),
                &report.from_last_dividend,
            ),
            from_total_dividends: projection_view(aggregation.total, &report.from_total_dividends),
        },
        window: aggregation.window.map(|(start, end)| WindowView { start, end }),
    }
}

fn header(company: &CompanyInfo) -> HeaderView {
    let name = company.name.as_deref().unwrap_or(NAME_NOT_AVAILABLE);
    HeaderView {
        title: format!("{} ({})", name, company.symbol),
        ticker: company.symbol.clone(),
        current_price: company
            .current_price
            .map(money)
            .unwrap_or_else(|| PRICE_NOT_AVAILABLE.to_string()),
    }
}

fn projection_view(basis: f64, projection: &ProjectionResult) -> ProjectionView {
    ProjectionView {
        basis,
        dividends_received: projection.dividends_received,
        position_value: projection.position_value,
        dividends_received_display: money(projection.dividends_received),
        position_value_display: money(projection.position_value),
    }
}

/// Equal-width bins spanning the observed amounts; the last bin is closed.
pub fn histogram(amounts: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = amounts.iter().copied().filter(|a| a.is_finite()).collect();
    let (Some(min), Some(max)) = (
        finite.iter().copied().reduce(f64::min),
        finite.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }
    if max == min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for amount in &finite {
        let index = (((amount - min) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i == bins - 1 { max } else { min + width * (i + 1) as f64 },
            count,
        })
        .collect()
}
