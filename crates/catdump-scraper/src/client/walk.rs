//! Lazy traversal of `next`-linked result pages for `CatalogClient`.

use futures::stream::{self, Stream, TryStreamExt};
use serde_json::Value;

use crate::error::ScraperError;
use crate::pagination::resolve_next_url;

use super::CatalogClient;

struct WalkState {
    next: Option<String>,
    pages: usize,
}

impl CatalogClient {
    /// Walks a paginated feed starting at `start_url`, yielding every element
    /// of each page's `results` in page order, then array order.
    ///
    /// The stream is lazy: a page is only requested once every item of the
    /// previous page has been consumed, so a consumer that persists each item
    /// as it arrives never holds more than one page in memory. It stops after
    /// the first page whose `next` is null, absent, or empty. Calling `walk`
    /// again starts over from `start_url`.
    ///
    /// Any error ends the stream after it is yielded.
    pub fn walk<'a>(
        &'a self,
        start_url: &str,
    ) -> impl Stream<Item = Result<Value, ScraperError>> + 'a {
        let state = WalkState {
            next: Some(start_url.to_owned()),
            pages: 0,
        };

        stream::try_unfold(state, move |state| self.next_page(state))
            .map_ok(|results| stream::iter(results.into_iter().map(Ok::<Value, ScraperError>)))
            .try_flatten()
    }

    async fn next_page(
        &self,
        mut state: WalkState,
    ) -> Result<Option<(Vec<Value>, WalkState)>, ScraperError> {
        let Some(url) = state.next.take() else {
            return Ok(None);
        };

        state.pages += 1;
        if state.pages > self.max_pages {
            return Err(ScraperError::PaginationLimit {
                url,
                max_pages: self.max_pages,
            });
        }

        let page = self.fetch_page(&url).await?;
        tracing::debug!(
            url = %url,
            page = state.pages,
            results = page.results.len(),
            has_next = page.next.is_some(),
            "fetched page"
        );

        state.next = match page.next.as_deref() {
            Some(next) => resolve_next_url(&url, next)?,
            None => None,
        };

        Ok(Some((page.results, state)))
    }
}
