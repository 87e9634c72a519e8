use crate::core::config::{DEFAULT_MAX_AUTHOR_DEPTH, DEFAULT_MAX_PAGES};
use crate::parser::{author_links, next_page_link};
use crate::scrapers::CachedFetcher;
use crate::ScraperResult;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

pub const ROOT_PATH: &str = "/";

/// Walks pagination and author links from a base URL.
///
/// Paths are returned as found in the markup and resolved against the base
/// with [`Url::join`]. Every fetch goes through the cache, so the pages seen
/// here are free to fetch again during extraction.
pub struct LinkDiscoverer {
    fetcher: Arc<CachedFetcher>,
    max_pages: usize,
    max_author_depth: usize,
}

impl LinkDiscoverer {
    pub fn new(fetcher: Arc<CachedFetcher>) -> Self {
        Self {
            fetcher,
            max_pages: DEFAULT_MAX_PAGES,
            max_author_depth: DEFAULT_MAX_AUTHOR_DEPTH,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_max_author_depth(mut self, depth: usize) -> Self {
        self.max_author_depth = depth;
        self
    }

    /// Listing paths from `start` to the end of pagination, in order.
    ///
    /// Errors on the start page are returned. A page-local failure further
    /// down ends the walk before that page.
    pub async fn discover_quote_pages(
        &self,
        base: &Url,
        start: &str,
    ) -> ScraperResult<Vec<String>> {
        let mut pages = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(start.to_string());

        while let Some(path) = next.take() {
            if pages.len() >= self.max_pages {
                warn!("Stopping pagination at {} pages (limit reached)", self.max_pages);
                break;
            }

            let url = base.join(&path)?;
            if !visited.insert(url.to_string()) {
                warn!("Pagination revisits {}, stopping", url);
                break;
            }

            let response = match self.fetcher.fetch(&url).await {
                Ok(response) => response,
                Err(error) if error.is_page_local() && !pages.is_empty() => {
                    warn!("Stopping pagination at {}: {}", url, error);
                    break;
                }
                Err(error) => return Err(error),
            };

            next = next_page_link(&response.body)?;
            debug!("Listing page {} links to {:?}", path, next);
            pages.push(path);
        }

        info!("Discovered {} listing pages", pages.len());
        Ok(pages)
    }

    /// [`discover_author_links`](Self::discover_author_links) starting from
    /// the site root.
    pub async fn discover_author_links_from_root(
        &self,
        base: &Url,
    ) -> ScraperResult<Vec<String>> {
        self.discover_author_links(base, &[ROOT_PATH.to_string()]).await
    }

    /// Author paths reachable from `start_paths`, deduplicated, in discovery
    /// order. The start paths themselves are not part of the result. Pass
    /// `["/"]` (or use the `_from_root` variant) to start at the site root.
    pub async fn discover_author_links(
        &self,
        base: &Url,
        start_paths: &[String],
    ) -> ScraperResult<Vec<String>> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut found = Vec::new();
        let mut frontier: Vec<String> = start_paths.to_vec();

        for path in start_paths {
            visited.insert(base.join(path)?.to_string());
        }

        let mut depth = 0;
        while !frontier.is_empty() {
            if depth >= self.max_author_depth {
                debug!(
                    "Author discovery depth limit {} reached with {} pages unvisited",
                    self.max_author_depth,
                    frontier.len()
                );
                break;
            }

            let mut next_frontier = Vec::new();
            for path in &frontier {
                let url = base.join(path)?;
                let response = match self.fetcher.fetch(&url).await {
                    Ok(response) => response,
                    Err(error) if error.is_page_local() => {
                        warn!("Skipping {} during author discovery: {}", url, error);
                        continue;
                    }
                    Err(error) => return Err(error),
                };

                for link in author_links(&response.body)? {
                    if visited.insert(base.join(&link)?.to_string()) {
                        found.push(link.clone());
                        next_frontier.push(link);
                    }
                }
            }

            frontier = next_frontier;
            depth += 1;
        }

        debug!("Discovered {} author links", found.len());
        Ok(found)
    }
}
