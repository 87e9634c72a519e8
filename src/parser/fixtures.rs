//! Pages shaped like quotes.toscrape.com, trimmed to what the parsers read.

pub const BASE: &str = "https://quotes.example/";

pub fn url(path: &str) -> String {
    format!("https://quotes.example{path}")
}

/// Two Einstein quotes, three distinct tags, no "next" link.
pub const SINGLE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<body>
<div class="container">
  <div class="row">
    <div class="col-md-8">
      <div class="quote" itemscope itemtype="http://schema.org/CreativeWork">
        <span class="text" itemprop="text">“The world as we have created it is a process of our thinking.”</span>
        <span>by <small class="author" itemprop="author">Albert Einstein</small>
        <a href="/author/Albert-Einstein">(about)</a>
        </span>
        <div class="tags">
          Tags:
          <a class="tag" href="/tag/change/page/1/">change</a>
          <a class="tag" href="/tag/thinking/page/1/">thinking</a>
        </div>
      </div>
      <div class="quote" itemscope itemtype="http://schema.org/CreativeWork">
        <span class="text" itemprop="text">“There are only two ways to live your life.”</span>
        <span>by <small class="author" itemprop="author">Albert Einstein</small>
        <a href="/author/Albert-Einstein">(about)</a>
        </span>
        <div class="tags">
          Tags:
          <a class="tag" href="/tag/life/page/1/">life</a>
        </div>
      </div>
      <nav>
        <ul class="pager">
        </ul>
      </nav>
    </div>
  </div>
</div>
</body>
</html>
"#;

pub const EINSTEIN: &str = r#"<!DOCTYPE html>
<html lang="en">
<body>
<div class="container">
  <div class="author-details">
    <h3 class="author-title">Albert Einstein
    </h3>
    <p><strong>Born:</strong> <span class="author-born-date">March 14, 1879</span> <span class="author-born-location">in Ulm, Germany</span></p>
    <p><strong>Description:</strong></p>
    <div class="author-description">
        In 1879, Albert Einstein was born in Ulm, Germany.
    </div>
  </div>
</div>
</body>
</html>
"#;

/// A listing page with one quote and a "next" link to `next`.
pub fn listing_page(quote: &str, author_slug: &str, author: &str, next: Option<&str>) -> String {
    let pager = next
        .map(|href| {
            format!(
                r#"<li class="next"><a href="{href}">Next <span aria-hidden="true">&rarr;</span></a></li>"#
            )
        })
        .unwrap_or_default();

    format!(
        r#"<html><body>
<div class="quote">
  <span class="text">“{quote}”</span>
  <span>by <small class="author">{author}</small>
  <a href="/author/{author_slug}">(about)</a></span>
  <div class="tags">Tags: <a class="tag" href="/tag/misc/page/1/">misc</a></div>
</div>
<nav><ul class="pager">{pager}</ul></nav>
</body></html>"#
    )
}

pub fn author_page(fullname: &str) -> String {
    format!(
        r#"<html><body>
<div class="author-details">
  <h3 class="author-title">{fullname}</h3>
  <p><span class="author-born-date">January 1, 1900</span> <span class="author-born-location">in Nowhere</span></p>
  <div class="author-description">{fullname} said things.</div>
</div>
</body></html>"#
    )
}
