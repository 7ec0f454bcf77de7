// src/handlers.rs

use crate::models::{AnalyzeRequest, DividendQuery, ErrorResponse};
use crate::report::render;
use crate::AppState;
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use dividend_query::client::normalize_ticker;
use dividend_query::loader::parse_records;
use dividend_query::models::{CompanyInfo, DividendError, ProjectionInput};
use dividend_query::pipeline::analyze;
use dividend_query::{project, DateFilter};
use serde_json::json;
use validator::Validate;

// Every failure is answered, never propagated past the handler
pub fn error_response(err: &DividendError) -> HttpResponse {
    let body = ErrorResponse::new(err.to_string());
    match err {
        DividendError::InvalidInput(_) => HttpResponse::BadRequest().json(body),
        DividendError::EmptyDataset(_) => HttpResponse::NotFound().json(body),
        DividendError::DataFormat(_) => HttpResponse::UnprocessableEntity().json(body),
        DividendError::Provider(_) | DividendError::Http(_) => {
            log::error!("Upstream failure: {}", err);
            HttpResponse::BadGateway().json(body)
        }
    }
}

#[get("/dividends/{ticker}")]
pub async fn get_dividends(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<DividendQuery>,
) -> impl Responder {
    let ticker = path.into_inner();

    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(errors.to_string()));
    }
    let filter = match DateFilter::from_bounds(query.start, query.end, query.as_of) {
        Ok(filter) => filter,
        Err(err) => return error_response(&err),
    };

    let purged = state.pipeline.purge_expired();
    if purged > 0 {
        log::debug!("Purged {purged} expired cache entries");
    }

    match state
        .pipeline
        .run(&ticker, filter, query.share_count, query.avg_cost_per_share)
        .await
    {
        Ok(report) => HttpResponse::Ok().json(render(&report)),
        Err(err) => {
            log::warn!("[{ticker}] dividend report failed: {err}");
            error_response(&err)
        }
    }
}

#[post("/analyze")]
pub async fn analyze_records(request: web::Json<AnalyzeRequest>) -> impl Responder {
    if let Err(errors) = request.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(errors.to_string()));
    }

    let report = normalize_ticker(&request.ticker).and_then(|symbol| {
        let pairs: Vec<(String, f64)> = request
            .records
            .iter()
            .map(|raw| (raw.date.clone(), raw.amount))
            .collect();
        let records = parse_records(&pairs)?;
        let filter = DateFilter::from_bounds(request.start, request.end, request.as_of)?;
        let company = CompanyInfo {
            name: request.name.clone(),
            current_price: request.current_price,
            ..CompanyInfo::unnamed(&symbol)
        };
        analyze(company, &records, filter, request.share_count, request.avg_cost_per_share)
    });

    match report {
        Ok(report) => HttpResponse::Ok().json(render(&report)),
        Err(err) => error_response(&err),
    }
}

#[post("/project")]
pub async fn project_position(input: web::Json<ProjectionInput>) -> impl Responder {
    match project(&input) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(err) => error_response(&err),
    }
}

#[delete("/cache/{ticker}")]
pub async fn invalidate_cache(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let ticker = path.into_inner();
    let invalidated = state.pipeline.invalidate(&ticker);
    log::info!("[{ticker}] invalidated {invalidated} cache entries");
    HttpResponse::Ok().json(json!({ "ticker": ticker, "invalidated": invalidated }))
}

#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}
