pub mod models;
pub mod repository;
pub mod sqlite;
pub mod writer;

pub use models::{Attributed, Author, NewAuthor, NewQuote, Quote, StoreCounts, Tag, SCRAPER_USER_ID};
pub use repository::QuoteRepository;
pub use sqlite::SqliteStore;
pub use writer::{PersistenceWriter, SkipReason, WriteOutcome};
