pub mod config;
pub mod discovery;
mod errors;
pub mod job;
pub mod orchestrator;
pub mod retry;

pub use config::ScrapeConfig;
pub use discovery::LinkDiscoverer;
pub use errors::{ScraperError, ScraperResult};
pub use job::{JobId, JobQueue, JobStatus};
pub use orchestrator::{Orchestrator, RunSummary};
