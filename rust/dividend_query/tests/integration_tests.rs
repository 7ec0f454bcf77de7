// tests/integration_tests.rs

use chrono::NaiveDate;
use dividend_query::client::AlphaVantageClient;
use dividend_query::models::DividendError;
use dividend_query::pipeline::DividendPipeline;
use dividend_query::DateFilter;
use mockito::{mock, Matcher};
use std::error::Error;
use std::time::Duration;

fn query_for(function: &str, symbol: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("function".into(), function.into()),
        Matcher::UrlEncoded("symbol".into(), symbol.into()),
        Matcher::UrlEncoded("apikey".into(), "demo".into()),
    ])
}

#[tokio::test]
async fn test_fetch_dividends() -> Result<(), Box<dyn Error>> {
    // Define Mock Server Response
    let mock_server_response = r#"
    {
        "symbol": "IBM",
        "data": [
            {
                "ex_dividend_date": "2024-02-08",
                "declaration_date": "2024-01-30",
                "record_date": "2024-02-09",
                "payment_date": "2024-03-09",
                "amount": "1.66"
            },
            {
                "ex_dividend_date": "2023-11-09",
                "declaration_date": "2023-10-31",
                "record_date": "2023-11-10",
                "payment_date": "2023-12-09",
                "amount": "1.66"
            },
            {
                "ex_dividend_date": "2023-08-09",
                "declaration_date": "None",
                "record_date": "None",
                "payment_date": "None",
                "amount": "1.66"
            }
        ]
    }"#;

    let _mock = mock("GET", "/query")
        .match_query(query_for("DIVIDENDS", "IBM"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_server_response)
        .create();

    let client = AlphaVantageClient::new(mockito::server_url(), "demo");
    let records = client.fetch_dividends("ibm").await?;

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].date, NaiveDate::parse_from_str("2024-02-08", "%Y-%m-%d")?);
    assert_eq!(records[2].date, NaiveDate::parse_from_str("2023-08-09", "%Y-%m-%d")?);
    assert_eq!(records[1].amount, 1.66);

    Ok(())
}

#[tokio::test]
async fn test_fetch_dividends_malformed_date() {
    let mock_server_response = r#"
    {
        "symbol": "MALF",
        "data": [
            { "ex_dividend_date": "08/02/2024", "amount": "0.50" }
        ]
    }"#;

    let _mock = mock("GET", "/query")
        .match_query(query_for("DIVIDENDS", "MALF"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_server_response)
        .create();

    let client = AlphaVantageClient::new(mockito::server_url(), "demo");
    let result = client.fetch_dividends("MALF").await;

    match result {
        Err(DividendError::DataFormat(message)) => assert!(message.contains("08/02/2024")),
        other => panic!("Expected DataFormat error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_dividends_provider_message() {
    let _mock = mock("GET", "/query")
        .match_query(query_for("DIVIDENDS", "LIMIT"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "Information": "Thank you for using Alpha Vantage! Please visit premium." }"#)
        .create();

    let client = AlphaVantageClient::new(mockito::server_url(), "demo");
    let result = client.fetch_dividends("LIMIT").await;

    assert!(matches!(result, Err(DividendError::Provider(message)) if message.starts_with("Thank you")));
}

#[tokio::test]
async fn test_fetch_company_info() -> Result<(), Box<dyn Error>> {
    let overview_response = r#"
    {
        "Symbol": "KO",
        "AssetType": "Common Stock",
        "Name": "Coca-Cola Company",
        "Exchange": "NYSE",
        "Currency": "USD",
        "DividendPerShare": "1.94",
        "DividendYield": "0.0305",
        "ExDividendDate": "2024-09-13"
    }"#;
    let quote_response = r#"
    {
        "Global Quote": {
            "01. symbol": "KO",
            "05. price": "63.5500",
            "07. latest trading day": "2024-09-18"
        }
    }"#;

    let _overview = mock("GET", "/query")
        .match_query(query_for("OVERVIEW", "KO"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(overview_response)
        .create();
    let _quote = mock("GET", "/query")
        .match_query(query_for("GLOBAL_QUOTE", "KO"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(quote_response)
        .create();

    let client = AlphaVantageClient::new(mockito::server_url(), "demo");
    let lookup = client.fetch_company_info("ko").await?;
    assert!(lookup.complete);
    let info = lookup.info;

    assert_eq!(info.symbol, "KO");
    assert_eq!(info.name.as_deref(), Some("Coca-Cola Company"));
    assert_eq!(info.exchange.as_deref(), Some("NYSE"));
    assert_eq!(info.current_price, Some(63.55));

    Ok(())
}

#[tokio::test]
async fn test_fetch_company_info_falls_back() -> Result<(), Box<dyn Error>> {
    let _overview = mock("GET", "/query")
        .match_query(query_for("OVERVIEW", "NONAME"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create();
    let _quote = mock("GET", "/query")
        .match_query(query_for("GLOBAL_QUOTE", "NONAME"))
        .with_status(500)
        .create();

    let client = AlphaVantageClient::new(mockito::server_url(), "demo");
    let lookup = client.fetch_company_info("NONAME").await?;
    assert!(!lookup.complete);
    let info = lookup.info;

    assert_eq!(info.symbol, "NONAME");
    assert_eq!(info.name, None);
    assert_eq!(info.current_price, None);

    Ok(())
}

#[tokio::test]
async fn test_pipeline_caches_fetches() -> Result<(), Box<dyn Error>> {
    let dividends_response = r#"
    {
        "symbol": "CACHE",
        "data": [
            { "ex_dividend_date": "2024-01-01", "amount": "0.24" },
            { "ex_dividend_date": "2023-04-01", "amount": "0.23" },
            { "ex_dividend_date": "2023-01-01", "amount": "0.22" }
        ]
    }"#;

    let dividends = mock("GET", "/query")
        .match_query(query_for("DIVIDENDS", "CACHE"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(dividends_response)
        .expect(1)
        .create();
    let _overview = mock("GET", "/query")
        .match_query(query_for("OVERVIEW", "CACHE"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "Symbol": "CACHE", "Name": "Cache Corp" }"#)
        .create();
    let _quote = mock("GET", "/query")
        .match_query(query_for("GLOBAL_QUOTE", "CACHE"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "Global Quote": {} }"#)
        .create();

    let client = AlphaVantageClient::new(mockito::server_url(), "demo");
    let pipeline = DividendPipeline::new(client, Duration::from_secs(3600));

    let as_of = NaiveDate::parse_from_str("2024-06-30", "%Y-%m-%d")?;
    let first = pipeline.run("cache", DateFilter::UpTo(Some(as_of)), 100, 150.0).await?;
    let second = pipeline.run("CACHE", DateFilter::UpTo(Some(as_of)), 100, 150.0).await?;

    dividends.assert();
    assert_eq!(first.company.name.as_deref(), Some("Cache Corp"));
    assert_eq!(first.aggregation, second.aggregation);
    assert!((first.aggregation.total - 0.69).abs() < 1e-9);
    assert!((first.from_last_dividend.dividends_received - 24.0).abs() < 1e-9);
    assert!((first.from_total_dividends.dividends_received - 69.0).abs() < 1e-9);

    Ok(())
}

#[tokio::test]
async fn test_pipeline_empty_dataset() {
    let _dividends = mock("GET", "/query")
        .match_query(query_for("DIVIDENDS", "NODIV"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "symbol": "NODIV", "data": [] }"#)
        .create();

    let client = AlphaVantageClient::new(mockito::server_url(), "demo");
    let pipeline = DividendPipeline::new(client, Duration::from_secs(3600));
    let result = pipeline.run("nodiv", DateFilter::up_to_today(), 100, 150.0).await;

    assert!(matches!(result, Err(DividendError::EmptyDataset(symbol)) if symbol == "NODIV"));
}

#[tokio::test]
async fn test_pipeline_empty_payload() {
    let _dividends = mock("GET", "/query")
        .match_query(query_for("DIVIDENDS", "UNKNOWN"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create();

    let client = AlphaVantageClient::new(mockito::server_url(), "demo");
    let pipeline = DividendPipeline::new(client, Duration::from_secs(3600));
    let result = pipeline.run("unknown", DateFilter::up_to_today(), 100, 150.0).await;

    assert!(matches!(result, Err(DividendError::EmptyDataset(symbol)) if symbol == "UNKNOWN"));
}

#[tokio::test]
async fn test_pipeline_refetches_partial_company_info() -> Result<(), Box<dyn Error>> {
    let _dividends = mock("GET", "/query")
        .match_query(query_for("DIVIDENDS", "RETRY"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "symbol": "RETRY", "data": [{ "ex_dividend_date": "2024-01-01", "amount": "0.50" }] }"#)
        .expect(1)
        .create();
    let _quote = mock("GET", "/query")
        .match_query(query_for("GLOBAL_QUOTE", "RETRY"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "Global Quote": { "01. symbol": "RETRY", "05. price": "12.3400" } }"#)
        .create();
    let throttled = mock("GET", "/query")
        .match_query(query_for("OVERVIEW", "RETRY"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "Note": "Our standard API call frequency is 5 calls per minute." }"#)
        .create();

    let client = AlphaVantageClient::new(mockito::server_url(), "demo");
    let pipeline = DividendPipeline::new(client, Duration::from_secs(3600));

    let first = pipeline.run("retry", DateFilter::Unbounded, 100, 150.0).await?;
    assert_eq!(first.company.name, None);
    assert_eq!(first.company.current_price, Some(12.34));

    drop(throttled);
    let overview = mock("GET", "/query")
        .match_query(query_for("OVERVIEW", "RETRY"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "Symbol": "RETRY", "Name": "Retry Holdings" }"#)
        .expect(1)
        .create();

    let second = pipeline.run("retry", DateFilter::Unbounded, 100, 150.0).await?;
    let third = pipeline.run("retry", DateFilter::Unbounded, 100, 150.0).await?;

    overview.assert();
    assert_eq!(second.company.name.as_deref(), Some("Retry Holdings"));
    assert_eq!(third.company.name.as_deref(), Some("Retry Holdings"));

    Ok(())
}
