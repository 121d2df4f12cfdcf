//! Cursor pagination.
//!
//! List endpoints name the next page in `next_cursor`; an absent or empty
//! cursor marks the last page. Pages are fetched strictly sequentially;
//! cursors are inherently serial, and burst concurrency amplifies
//! rate-limit pressure.

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::AdsClient;
use crate::error::{AdsError, AdsResult};

impl AdsClient {
    /// Aggregate every page of a cursor-paginated endpoint, preserving
    /// server order. Finite and not restartable; a server that never
    /// terminates its cursor chain trips the page ceiling instead of
    /// hanging the caller.
    #[instrument(skip(self, params))]
    pub async fn fetch_all(
        &self,
        method: Method,
        url: &str,
        params: &[(String, String)],
    ) -> AdsResult<Vec<Value>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 0..self.config.max_pages {
            let mut query = params.to_vec();
            if let Some(c) = &cursor {
                query.push(("cursor".to_string(), c.clone()));
            }

            let response = self.execute(method.clone(), url, &query, None).await?;
            let page_items = response.items();
            debug!(page, count = page_items.len(), "fetched page");
            items.extend(page_items);

            if !response.has_next_page() {
                return Ok(items);
            }
            cursor = response.next_cursor;
        }

        Err(AdsError::PaginationOverflow {
            pages: self.config.max_pages,
        })
    }
}
