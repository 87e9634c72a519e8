use super::selector;
use crate::ScraperResult;
use scraper::Html;

pub const AUTHOR_PATH_PREFIX: &str = "/author";

/// Author-detail hrefs linked from quote blocks, in document order.
pub fn author_links(body: &str) -> ScraperResult<Vec<String>> {
    let document = Html::parse_document(body);
    let link_selector = selector("div.quote a[href]")?;

    Ok(document
        .select(&link_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| href.starts_with(AUTHOR_PATH_PREFIX))
        .map(str::to_string)
        .collect())
}

/// The pagination "next" href, if the page has one.
pub fn next_page_link(body: &str) -> ScraperResult<Option<String>> {
    let document = Html::parse_document(body);
    let next_selector = selector("li.next a[href]")?;

    Ok(document
        .select(&next_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(str::to_string))
}
