// src/pipeline.rs

use crate::aggregator::{aggregate, DateFilter};
use crate::cache::FetchCache;
use crate::client::{normalize_ticker, AlphaVantageClient};
use crate::models::{AggregationResult, CompanyInfo, DividendError, DividendRecord, ProjectionResult};
use crate::projector::{project_from_last_dividend, project_from_total_dividends};
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_SHARE_COUNT: u32 = 100;
pub const DEFAULT_AVG_COST_PER_SHARE: f64 = 150.0;

// Everything the presentation layer needs for one ticker
#[derive(Debug, Clone, Serialize)]
pub struct DividendReport {
    pub company: CompanyInfo,
    pub aggregation: AggregationResult,
    pub share_count: u32,
    pub avg_cost_per_share: f64,
    pub from_last_dividend: ProjectionResult,
    pub from_total_dividends: ProjectionResult,
}

/// Aggregate then project, without touching the network.
pub fn analyze(
    company: CompanyInfo,
    records: &[DividendRecord],
    filter: DateFilter,
    share_count: u32,
    avg_cost_per_share: f64,
) -> Result<DividendReport, DividendError> {
    let aggregation = aggregate(records, filter)?;
    let from_last_dividend = project_from_last_dividend(share_count, avg_cost_per_share, &aggregation)?;
    let from_total_dividends = project_from_total_dividends(share_count, avg_cost_per_share, &aggregation)?;

    Ok(DividendReport {
        company,
        aggregation,
        share_count,
        avg_cost_per_share,
        from_last_dividend,
        from_total_dividends,
    })
}

/// `fetch -> aggregate -> project`, with fetch results memoized per ticker.
#[derive(Debug)]
pub struct DividendPipeline {
    client: AlphaVantageClient,
    dividends: FetchCache<Vec<DividendRecord>>,
    companies: FetchCache<CompanyInfo>,
}

impl DividendPipeline {
    pub fn new(client: AlphaVantageClient, cache_ttl: Duration) -> Self {
        DividendPipeline {
            client,
            dividends: FetchCache::new(cache_ttl),
            companies: FetchCache::new(cache_ttl),
        }
    }

    pub async fn fetch(&self, ticker: &str) -> Result<(CompanyInfo, Vec<DividendRecord>), DividendError> {
        let symbol = normalize_ticker(ticker)?;

        let records = match self.dividends.get(&symbol) {
            Some(records) => {
                log::debug!("[{symbol}] dividend history served from cache");
                records
            }
            None => {
                let records = self.client.fetch_dividends(&symbol).await?;
                self.dividends.insert(&symbol, records.clone());
                records
            }
        };
        if records.is_empty() {
            return Err(DividendError::EmptyDataset(symbol));
        }

        let company = match self.companies.get(&symbol) {
            Some(company) => company,
            None => {
                let lookup = self.client.fetch_company_info(&symbol).await?;
                if lookup.complete {
                    self.companies.insert(&symbol, lookup.info.clone());
                } else {
                    log::debug!("[{symbol}] partial company info not cached");
                }
                lookup.info
            }
        };

        Ok((company, records))
    }

    pub async fn run(
        &self,
        ticker: &str,
        filter: DateFilter,
        share_count: u32,
        avg_cost_per_share: f64,
    ) -> Result<DividendReport, DividendError> {
        let (company, records) = self.fetch(ticker).await?;
        analyze(company, &records, filter, share_count, avg_cost_per_share)
    }

    // Evicts cache entries from past buckets
    pub fn purge_expired(&self) -> usize {
        self.dividends.purge_expired() + self.companies.purge_expired()
    }

    pub fn invalidate(&self, ticker: &str) -> usize {
        self.dividends.invalidate(ticker) + self.companies.invalidate(ticker)
    }
}
