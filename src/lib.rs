pub mod cache;
pub mod core;
pub mod http;
pub mod parser;
pub mod scrapers;
pub mod stats;
pub mod store;

pub use crate::core::{
    JobId, JobQueue, JobStatus, Orchestrator, RunSummary, ScrapeConfig, ScraperError,
    ScraperResult,
};
pub use http::{HttpRequest, HttpResponse};
pub use scrapers::Scraper;
pub use stats::StatsTracker;
