// src/lib.rs

pub mod aggregator;
pub mod cache;
pub mod client;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod projector;

pub use aggregator::{aggregate, DateFilter};
pub use models::DividendError;
pub use projector::{project, project_from_last_dividend, project_from_total_dividends};
