//! Structured records from quote-listing and author-detail pages.
//!
//! Every record is read from its own block element (`div.quote`,
//! `div.author-details`), so fields are paired by DOM proximity. A page with a
//! block missing a field, or with field elements sitting outside any block, is
//! rejected as malformed rather than guessed at.

use super::selector;
use crate::{ScraperError, ScraperResult};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub text: String,
    pub author: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub fullname: String,
    pub born_date: String,
    pub born_location: String,
    pub description: String,
}

pub fn extract_quotes(url: &str, body: &str) -> ScraperResult<Vec<QuoteRecord>> {
    let document = Html::parse_document(body);
    let block_selector = selector("div.quote")?;
    let text_selector = selector("span.text")?;
    let author_selector = selector("small.author")?;
    let tag_selector = selector("div.tags a.tag")?;

    let blocks: Vec<ElementRef<'_>> = document.select(&block_selector).collect();
    ensure_no_orphans(url, &document, &text_selector, "quote text", blocks.len())?;
    ensure_no_orphans(url, &document, &author_selector, "author name", blocks.len())?;

    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| -> ScraperResult<QuoteRecord> {
            let text = required_text(url, block, &text_selector, "quote text", index)?;
            let author = required_text(url, block, &author_selector, "author name", index)?;
            let tags = block
                .select(&tag_selector)
                .map(|tag| element_text(&tag).trim().to_string())
                .filter(|word| !word.is_empty())
                .collect();

            Ok(QuoteRecord {
                text: strip_enclosing_glyphs(&text),
                author: author.trim().to_string(),
                tags,
            })
        })
        .collect()
}

pub fn extract_authors(url: &str, body: &str) -> ScraperResult<Vec<AuthorRecord>> {
    let document = Html::parse_document(body);
    let block_selector = selector("div.author-details")?;
    let fields = [
        (selector("h3.author-title")?, "author name"),
        (selector("span.author-born-date")?, "birth date"),
        (selector("span.author-born-location")?, "birth location"),
        (selector("div.author-description")?, "description"),
    ];

    let blocks: Vec<ElementRef<'_>> = document.select(&block_selector).collect();
    for (field_selector, field) in &fields {
        ensure_no_orphans(url, &document, field_selector, field, blocks.len())?;
    }

    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| -> ScraperResult<AuthorRecord> {
            let [fullname, born_date, born_location, description] = [0, 1, 2, 3].map(|i| {
                let (field_selector, field) = &fields[i];
                required_text(url, block, field_selector, field, index)
                    .map(|text| text.trim().to_string())
            });

            Ok(AuthorRecord {
                fullname: fullname?,
                born_date: born_date?,
                born_location: born_location?,
                description: description?,
            })
        })
        .collect()
}

/// Every tag anchor on the page, including ones outside quote blocks.
pub fn extract_tags(body: &str) -> ScraperResult<Vec<String>> {
    let document = Html::parse_document(body);
    let tag_selector = selector("a.tag")?;

    Ok(document
        .select(&tag_selector)
        .map(|tag| element_text(&tag).trim().to_string())
        .filter(|word| !word.is_empty())
        .collect())
}

/// Drops exactly the first and last character (the typographic quotes the
/// site wraps every quote in). Nothing is checked: text without the glyphs
/// loses real characters.
pub fn strip_enclosing_glyphs(text: &str) -> String {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

fn required_text(
    url: &str,
    block: &ElementRef<'_>,
    field_selector: &Selector,
    field: &str,
    index: usize,
) -> ScraperResult<String> {
    block
        .select(field_selector)
        .next()
        .map(|element| element_text(&element))
        .ok_or_else(|| ScraperError::MalformedPage {
            url: url.to_string(),
            reason: format!("block {index} has no {field}"),
        })
}

fn ensure_no_orphans(
    url: &str,
    document: &Html,
    field_selector: &Selector,
    field: &str,
    blocks: usize,
) -> ScraperResult<()> {
    let found = document.select(field_selector).count();
    if found != blocks {
        return Err(ScraperError::MalformedPage {
            url: url.to_string(),
            reason: format!("found {found} {field} elements for {blocks} blocks"),
        });
    }
    Ok(())
}
