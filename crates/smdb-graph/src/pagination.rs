//! Cursor pagination over Graph collection edges.
//!
//! Graph pages carry `paging.next`, a complete URL for the following page
//! that already embeds the original query and access token. The first URL is
//! built from the path and params; every later URL is used verbatim.

use std::collections::VecDeque;

use futures::Stream;

use crate::client::GraphClient;
use crate::error::GraphError;
use crate::types::Page;

/// Maximum number of pages walked for one edge before giving up.
/// Guards against cursors that cycle without ever running out.
pub(crate) const MAX_PAGES: usize = 200;

struct PageCursor {
    /// URL of the next page to request. `None` once the edge is exhausted.
    next: Option<Result<String, GraphError>>,
    buffer: VecDeque<serde_json::Value>,
    remaining: usize,
    context: String,
    pages: usize,
}

impl GraphClient {
    /// Lazily yields the raw items of the collection edge at `path`, at most
    /// `limit` of them.
    ///
    /// Pages are requested only when the consumer pulls past the items
    /// already buffered, so dropping the stream early (or reaching `limit`)
    /// never triggers another request. A page failure is yielded as the
    /// stream's final item; items yielded before it remain valid.
    ///
    /// An empty page whose `next` repeats its own URL ends the stream.
    /// Walking more than [`MAX_PAGES`] pages fails with
    /// [`GraphError::PaginationLimit`].
    pub fn paginate<'a>(
        &'a self,
        path: &str,
        params: &[(&str, String)],
        limit: usize,
    ) -> impl Stream<Item = Result<serde_json::Value, GraphError>> + 'a {
        let cursor = PageCursor {
            next: Some(self.build_url(path, params).map(String::from)),
            buffer: VecDeque::new(),
            remaining: limit,
            context: path.trim_start_matches('/').to_owned(),
            pages: 0,
        };
        futures::stream::try_unfold(cursor, move |cursor| self.advance(cursor))
    }

    async fn advance(
        &self,
        mut cursor: PageCursor,
    ) -> Result<Option<(serde_json::Value, PageCursor)>, GraphError> {
        loop {
            if cursor.remaining == 0 {
                return Ok(None);
            }
            if let Some(item) = cursor.buffer.pop_front() {
                cursor.remaining -= 1;
                return Ok(Some((item, cursor)));
            }
            let Some(next) = cursor.next.take() else {
                return Ok(None);
            };
            let url = next?;
            if cursor.pages >= MAX_PAGES {
                return Err(GraphError::PaginationLimit {
                    context: cursor.context.clone(),
                    max_pages: MAX_PAGES,
                });
            }

            let body = self.request_json(&url, &cursor.context).await?;
            let page: Page =
                serde_json::from_value(body).map_err(|e| GraphError::Deserialize {
                    context: cursor.context.clone(),
                    source: e,
                })?;
            cursor.pages += 1;

            let next_url = page
                .paging
                .and_then(|p| p.next)
                .filter(|n| !n.is_empty());
            tracing::debug!(
                context = %cursor.context,
                page = cursor.pages,
                items = page.data.len(),
                has_next = next_url.is_some(),
                "fetched Graph page"
            );

            // An empty page pointing back at itself would be fetched forever.
            if page.data.is_empty() && next_url.as_deref() == Some(url.as_str()) {
                return Ok(None);
            }

            cursor.next = next_url.map(Ok);
            cursor.buffer.extend(page.data);
        }
    }
}

/// Largest `limit` Graph accepts for a single page of these edges.
pub(crate) const MAX_PAGE_SIZE: usize = 100;

/// Page size to request for a run inspecting at most `limit` items.
pub(crate) fn page_size(limit: usize) -> usize {
    limit.clamp(1, MAX_PAGE_SIZE)
}
