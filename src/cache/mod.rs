pub mod base;
pub mod memory;
pub mod sqlite;

pub use base::ResponseCache;
pub use memory::MemoryCache;
pub use sqlite::SqliteCache;
