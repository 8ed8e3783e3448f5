//! HTTP client for the catalog JSON API.

mod walk;

use std::time::Duration;

use catdump_core::AppConfig;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::ScraperError;
use crate::retry::{retry_with_policy, RetryPolicy};
use crate::types::{Category, Page};

/// Default ceiling on pages per walk. Guards against servers whose `next`
/// cursor cycles.
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// HTTP client for the catalog API.
///
/// Every request carries `Accept: application/json` and the configured
/// `User-Agent`. Any status other than 200 is handed to the [`RetryPolicy`];
/// everything else (transport errors, bodies that are not JSON) fails on the
/// spot.
pub struct CatalogClient {
    pub(super) client: Client,
    pub(super) retry: RetryPolicy,
    pub(super) max_pages: usize,
}

impl CatalogClient {
    /// Creates a `CatalogClient` with the given `User-Agent`, optional request
    /// timeout, and retry policy.
    ///
    /// `timeout_secs = None` leaves requests without a deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        user_agent: &str,
        timeout_secs: Option<u64>,
        retry: RetryPolicy,
    ) -> Result<Self, ScraperError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            retry,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    /// Builds a client from the application config (user agent, timeout,
    /// retry policy, page limit).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the `reqwest::Client` cannot be built.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Ok(Self::new(
            &config.user_agent,
            config.request_timeout_secs,
            RetryPolicy::from_app_config(config),
        )?
        .with_max_pages(config.max_pages))
    }

    /// Overrides the per-walk page limit.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fetches `url` and returns the parsed JSON body, re-issuing the same
    /// request while the server answers with anything other than 200.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RetryExhausted`] — bounded policy ran out of attempts.
    /// - [`ScraperError::Http`] — network or TLS failure (not retried).
    /// - [`ScraperError::Deserialize`] — the 200 body is not valid JSON.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, ScraperError> {
        retry_with_policy(&self.retry, || async move {
            tracing::debug!(url, "GET");
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await?;

            let status = response.status();
            if status != StatusCode::OK {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            // Parsed from raw bytes: a body that is not UTF-8 is not JSON.
            let body = response.bytes().await?;
            serde_json::from_slice::<Value>(&body).map_err(|e| ScraperError::Deserialize {
                context: format!("response body from {url}"),
                source: e,
            })
        })
        .await
    }

    /// Fetches one paginated response and checks its `{next, results}` shape.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::fetch_json`] errors; returns
    /// [`ScraperError::Deserialize`] when `results` is missing or not an array.
    pub async fn fetch_page(&self, url: &str) -> Result<Page, ScraperError> {
        let body = self.fetch_json(url).await?;
        serde_json::from_value::<Page>(body).map_err(|e| ScraperError::Deserialize {
            context: format!("page from {url}"),
            source: e,
        })
    }

    /// Fetches the flat (unpaginated) category list.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::fetch_json`] errors; returns
    /// [`ScraperError::Deserialize`] when the body is not an array of
    /// categories.
    pub async fn fetch_categories(&self, url: &str) -> Result<Vec<Category>, ScraperError> {
        let body = self.fetch_json(url).await?;
        serde_json::from_value::<Vec<Category>>(body).map_err(|e| ScraperError::Deserialize {
            context: format!("category list from {url}"),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
