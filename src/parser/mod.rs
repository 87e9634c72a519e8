pub mod extract;
pub mod links;

pub use extract::{extract_authors, extract_quotes, extract_tags, AuthorRecord, QuoteRecord};
pub use links::{author_links, next_page_link, AUTHOR_PATH_PREFIX};

use crate::{ScraperError, ScraperResult};
use scraper::Selector;

pub(crate) fn selector(css: &str) -> ScraperResult<Selector> {
    Selector::parse(css).map_err(|e| ScraperError::SelectorError(format!("{css}: {e:?}")))
}

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod tests;
