use super::extract::strip_enclosing_glyphs;
use super::fixtures::{EINSTEIN, SINGLE_PAGE};
use super::*;
use crate::ScraperError;

#[test]
fn test_extract_quotes_pairs_fields_per_block() {
    let quotes = extract_quotes("https://quotes.example/", SINGLE_PAGE).unwrap();

    assert_eq!(
        quotes,
        vec![
            QuoteRecord {
                text: "The world as we have created it is a process of our thinking.".to_string(),
                author: "Albert Einstein".to_string(),
                tags: vec!["change".to_string(), "thinking".to_string()],
            },
            QuoteRecord {
                text: "There are only two ways to live your life.".to_string(),
                author: "Albert Einstein".to_string(),
                tags: vec!["life".to_string()],
            },
        ]
    );
}

#[test]
fn test_strip_enclosing_glyphs() {
    assert_eq!(strip_enclosing_glyphs("“Be yourself.”"), "Be yourself.");
    // Unconditional: plain text loses its first and last characters.
    assert_eq!(strip_enclosing_glyphs("Be yourself."), "e yourself");
    assert_eq!(strip_enclosing_glyphs("“"), "");
    assert_eq!(strip_enclosing_glyphs(""), "");
}

#[test]
fn test_quote_block_without_author_is_malformed() {
    let body = r#"<html><body>
        <div class="quote"><span class="text">“A”</span><small class="author">Someone</small></div>
        <div class="quote"><span class="text">“B”</span></div>
    </body></html>"#;

    let error = extract_quotes("https://quotes.example/page/3/", body).unwrap_err();
    match error {
        ScraperError::MalformedPage { url, reason } => {
            assert_eq!(url, "https://quotes.example/page/3/");
            assert!(reason.contains("author name"), "reason was {reason}");
        }
        other => panic!("expected MalformedPage, got {other:?}"),
    }
}

#[test]
fn test_quote_text_outside_block_is_malformed() {
    let body = r#"<html><body>
        <span class="text">“Stray”</span>
        <div class="quote"><span class="text">“A”</span><small class="author">Someone</small></div>
    </body></html>"#;

    assert!(matches!(
        extract_quotes("https://quotes.example/", body),
        Err(ScraperError::MalformedPage { .. })
    ));
}

#[test]
fn test_page_without_quotes_yields_nothing() {
    let body = "<html><body>No quotes found!</body></html>";
    let quotes = extract_quotes("https://quotes.example/page/99/", body).unwrap();
    assert!(quotes.is_empty());
}

#[test]
fn test_extract_authors_trims_fields() {
    let authors =
        extract_authors("https://quotes.example/author/Albert-Einstein", EINSTEIN).unwrap();

    assert_eq!(
        authors,
        vec![AuthorRecord {
            fullname: "Albert Einstein".to_string(),
            born_date: "March 14, 1879".to_string(),
            born_location: "in Ulm, Germany".to_string(),
            description: "In 1879, Albert Einstein was born in Ulm, Germany.".to_string(),
        }]
    );
}

#[test]
fn test_author_without_birth_date_is_malformed() {
    let body = r#"<div class="author-details">
        <h3 class="author-title">Jane Austen</h3>
        <span class="author-born-location">in Steventon, England</span>
        <div class="author-description">Novelist.</div>
    </div>"#;

    assert!(matches!(
        extract_authors("https://quotes.example/author/Jane-Austen", body),
        Err(ScraperError::MalformedPage { .. })
    ));
}

#[test]
fn test_extract_tags_lists_every_anchor() {
    let tags = extract_tags(SINGLE_PAGE).unwrap();
    assert_eq!(tags, vec!["change", "thinking", "life"]);
}

#[test]
fn test_author_links_only_follow_author_prefix() {
    let body = r#"<div class="quote">
        <a href="/author/Albert-Einstein">(about)</a>
        <a href="/tag/change/page/1/">change</a>
    </div>
    <a href="/author/Outside-Block">(about)</a>"#;

    assert_eq!(author_links(body).unwrap(), vec!["/author/Albert-Einstein"]);
}

#[test]
fn test_next_page_link() {
    let body = r#"<ul class="pager"><li class="next"><a href="/page/2/">Next</a></li></ul>"#;
    assert_eq!(next_page_link(body).unwrap(), Some("/page/2/".to_string()));
    assert_eq!(next_page_link(SINGLE_PAGE).unwrap(), None);
}
