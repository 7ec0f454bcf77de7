// src/lib.rs

pub mod config;
pub mod handlers;
pub mod models;
pub mod report;

use config::ServerConfig;
use dividend_query::client::AlphaVantageClient;
use dividend_query::pipeline::DividendPipeline;
use models::ErrorResponse;

pub struct AppState {
    pub pipeline: DividendPipeline,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Self {
        let client = AlphaVantageClient::new(config.provider_base_url.as_str(), config.api_key.as_str());
        AppState {
            pipeline: DividendPipeline::new(client, config.cache_ttl),
        }
    }
}

// Malformed bodies and query strings get the same error envelope as handler failures
fn bad_request<E>(err: E) -> actix_web::Error
where
    E: std::fmt::Display + std::fmt::Debug + 'static,
{
    use actix_web::{error::InternalError, HttpResponse};

    let message = err.to_string();
    log::debug!("Rejected request: {message}");
    InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorResponse::new(message))).into()
}

pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    use actix_web::web::{JsonConfig, QueryConfig};
    use handlers::{analyze_records, get_dividends, health_check, invalidate_cache, project_position};

    cfg.app_data(JsonConfig::default().error_handler(|err, _req| bad_request(err)))
        .app_data(QueryConfig::default().error_handler(|err, _req| bad_request(err)))
        .service(get_dividends)
        .service(analyze_records)
        .service(project_position)
        .service(invalidate_cache)
        .service(health_check);
}

pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    use actix_web::{middleware::Logger, web, App, HttpServer};

    let state = web::Data::new(AppState::from_config(&config));
    log::info!(
        "Starting dividend server at http://{} (provider {}, cache ttl {}s)",
        config.bind_addr,
        config.provider_base_url,
        config.cache_ttl.as_secs()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
