pub mod cached;
pub mod http_scraper;
pub mod mock_scraper;

mod scraper;
pub use cached::CachedFetcher;
pub use http_scraper::HttpScraper;
pub use mock_scraper::{MockResponse, MockScraper};
pub use scraper::Scraper;
