// src/aggregator.rs

use crate::models::{AggregationResult, DescriptiveStats, DividendError, DividendRecord};
use chrono::{Datelike, NaiveDate, Utc};
use ordered_float::NotNan;
use std::collections::BTreeMap;

/// Which records take part in an aggregation.
///
/// The two filtering modes are mutually exclusive: either everything paid up
/// to a bound, or everything inside an explicit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    Unbounded,
    /// Drop records dated after the bound; `None` means today (UTC).
    UpTo(Option<NaiveDate>),
    /// Keep `start <= date <= end`, clamped to the dates present.
    Window { start: NaiveDate, end: NaiveDate },
}

impl DateFilter {
    pub fn up_to_today() -> Self {
        DateFilter::UpTo(None)
    }

    // Builds a filter from optional user bounds; a window needs both ends
    pub fn from_bounds(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        as_of: Option<NaiveDate>,
    ) -> Result<Self, DividendError> {
        match (start, end) {
            (Some(start), Some(end)) if as_of.is_none() => Ok(DateFilter::Window { start, end }),
            (Some(_), Some(_)) => Err(DividendError::InvalidInput(
                "a date window cannot be combined with an as-of date".to_string(),
            )),
            (None, None) => Ok(DateFilter::UpTo(as_of)),
            _ => Err(DividendError::InvalidInput(
                "both start and end dates are required for a date window".to_string(),
            )),
        }
    }
}

/// Aggregates dividend records into totals, per-year sums, the last payment
/// and descriptive statistics.
///
/// Records are sorted by date before filtering, so callers may pass them in
/// any order. An empty (or fully filtered out) input is not an error.
pub fn aggregate(
    records: &[DividendRecord],
    filter: DateFilter,
) -> Result<AggregationResult, DividendError> {
    for record in records {
        checked_amount(record)?;
    }

    let mut sorted = records.to_vec();
    // Ties on date are broken by amount so shuffled input aggregates identically
    sorted.sort_by(|a, b| a.date.cmp(&b.date).then(a.amount.total_cmp(&b.amount)));

    let (filtered, window) = apply_filter(sorted, filter)?;

    let amounts: Vec<f64> = filtered.iter().map(|record| record.amount).collect();
    let total = amounts.iter().sum();
    let yearly_totals = yearly_totals(&filtered);
    let last_record = filtered.last().copied();
    let descriptive_stats = describe(&amounts);

    log::debug!(
        "Aggregated {} of {} dividend records ({:?}), total {:.4}",
        filtered.len(),
        records.len(),
        filter,
        total
    );

    Ok(AggregationResult {
        records: filtered,
        total,
        yearly_totals,
        last_record,
        descriptive_stats,
        window,
    })
}

fn checked_amount(record: &DividendRecord) -> Result<NotNan<f64>, DividendError> {
    let amount = NotNan::new(record.amount).map_err(|_| {
        DividendError::DataFormat(format!("dividend amount on {} is not a number", record.date))
    })?;
    if amount.is_infinite() || *amount < 0.0 {
        return Err(DividendError::DataFormat(format!(
            "dividend amount {} on {} must be finite and non-negative",
            record.amount, record.date
        )));
    }
    Ok(amount)
}

// Expects `sorted` ascending by date
fn apply_filter(
    sorted: Vec<DividendRecord>,
    filter: DateFilter,
) -> Result<(Vec<DividendRecord>, Option<(NaiveDate, NaiveDate)>), DividendError> {
    match filter {
        DateFilter::Unbounded => Ok((sorted, None)),
        DateFilter::UpTo(bound) => {
            let bound = bound.unwrap_or_else(|| Utc::now().date_naive());
            let kept = sorted.into_iter().filter(|record| record.date <= bound).collect();
            Ok((kept, None))
        }
        DateFilter::Window { start, end } => {
            if start > end {
                return Err(DividendError::InvalidInput(format!(
                    "start date {} is after end date {}",
                    start, end
                )));
            }
            match clamp_window(&sorted, start, end) {
                Some((start, end)) => {
                    let kept = sorted
                        .into_iter()
                        .filter(|record| record.date >= start && record.date <= end)
                        .collect();
                    Ok((kept, Some((start, end))))
                }
                None => Ok((Vec::new(), None)),
            }
        }
    }
}

// None when the window misses the data entirely
fn clamp_window(
    sorted: &[DividendRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let (first, last) = (sorted.first()?, sorted.last()?);
    let start = start.max(first.date);
    let end = end.min(last.date);
    (start <= end).then_some((start, end))
}

pub fn yearly_totals(records: &[DividendRecord]) -> BTreeMap<i32, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.date.year()).or_insert(0.0) += record.amount;
    }
    totals
}

/// Count, mean, sample standard deviation, min, quartiles and max.
///
/// Quartiles use linear interpolation between closest ranks. NaN amounts are
/// ignored.
pub fn describe(amounts: &[f64]) -> DescriptiveStats {
    let mut sorted: Vec<NotNan<f64>> = amounts
        .iter()
        .filter_map(|amount| NotNan::new(*amount).ok())
        .collect();
    sorted.sort();

    let count = sorted.len();
    if count == 0 {
        return DescriptiveStats::default();
    }

    let values: Vec<f64> = sorted.into_iter().map(NotNan::into_inner).collect();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let sum_sq: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
        (sum_sq / (count - 1) as f64).sqrt()
    });

    DescriptiveStats {
        count,
        mean: Some(mean),
        std,
        min: values.first().copied(),
        p25: Some(percentile(&values, 0.25)),
        p50: Some(percentile(&values, 0.50)),
        p75: Some(percentile(&values, 0.75)),
        max: values.last().copied(),
    }
}

// `sorted` must be non-empty and ascending
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (rank - lower as f64)
}
