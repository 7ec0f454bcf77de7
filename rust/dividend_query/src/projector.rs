// src/projector.rs

use crate::models::{AggregationResult, DividendError, ProjectionInput, ProjectionResult};
use validator::Validate;

pub fn project(input: &ProjectionInput) -> Result<ProjectionResult, DividendError> {
    input
        .validate()
        .map_err(|e| DividendError::InvalidInput(e.to_string()))?;
    if !input.avg_cost_per_share.is_finite() {
        return Err(DividendError::InvalidInput(
            "average cost per share must be a finite number".to_string(),
        ));
    }
    if !input.basis.is_finite() {
        return Err(DividendError::InvalidInput(
            "dividend basis must be a finite number".to_string(),
        ));
    }

    let shares = f64::from(input.share_count);
    Ok(ProjectionResult {
        dividends_received: input.basis * shares,
        position_value: shares * input.avg_cost_per_share,
    })
}

// Estimate of the next payout at current holdings
pub fn project_from_last_dividend(
    share_count: u32,
    avg_cost_per_share: f64,
    aggregation: &AggregationResult,
) -> Result<ProjectionResult, DividendError> {
    project(&ProjectionInput {
        share_count,
        avg_cost_per_share,
        basis: aggregation.last_dividend_amount(),
    })
}

// Estimate of all-time income had the position been held throughout
pub fn project_from_total_dividends(
    share_count: u32,
    avg_cost_per_share: f64,
    aggregation: &AggregationResult,
) -> Result<ProjectionResult, DividendError> {
    project(&ProjectionInput {
        share_count,
        avg_cost_per_share,
        basis: aggregation.total,
    })
}
