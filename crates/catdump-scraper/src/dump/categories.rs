use std::path::PathBuf;

use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Url;
use serde_json::Value;

use crate::client::CatalogClient;
use crate::error::ScraperError;
use crate::types::{Category, CategoryRecord};

use super::{ensure_output_dir, validate_file_stem, write_json, DumpReport};

/// Default `records_per_page` sent with each category query.
pub const DEFAULT_RECORDS_PER_PAGE: u32 = 20;

/// Category mode: one `category_<code>.json` per entry of the category list,
/// holding every product the feed returns for that category.
///
/// Unlike [`super::ProductDumper`], a category's products are buffered in
/// memory until its feed is drained, because they are written as a single
/// document. Products listed under several categories appear in each file.
pub struct CategoryDumper<'a> {
    client: &'a CatalogClient,
    categories_url: String,
    products_url: String,
    output_dir: PathBuf,
    records_per_page: u32,
    max_concurrent: usize,
}

impl<'a> CategoryDumper<'a> {
    #[must_use]
    pub fn new(
        client: &'a CatalogClient,
        categories_url: impl Into<String>,
        products_url: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            categories_url: categories_url.into(),
            products_url: products_url.into(),
            output_dir: output_dir.into(),
            records_per_page: DEFAULT_RECORDS_PER_PAGE,
            max_concurrent: 1,
        }
    }

    #[must_use]
    pub fn with_records_per_page(mut self, records_per_page: u32) -> Self {
        self.records_per_page = records_per_page.max(1);
        self
    }

    /// Number of categories fetched at the same time. `1` (the default)
    /// processes them strictly in list order.
    ///
    /// Files are always written in list order, so when two entries share a
    /// code the later one is left on disk whatever the concurrency.
    #[must_use]
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Fetches the category list, then dumps each category in turn.
    ///
    /// The first failing category aborts the run; categories already written
    /// stay on disk.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`CatalogClient::fetch_categories`] and
    /// [`CatalogClient::walk`], [`ScraperError::InvalidFileStem`] for codes
    /// that cannot name a file, and [`ScraperError::Io`] on write failures.
    pub async fn parse_by_categories(&self) -> Result<DumpReport, ScraperError> {
        ensure_output_dir(&self.output_dir).await?;

        let categories = self.client.fetch_categories(&self.categories_url).await?;
        tracing::info!(
            categories = categories.len(),
            output_dir = %self.output_dir.display(),
            "dumping products by category"
        );

        let counts: Vec<usize> = stream::iter(categories)
            .map(|category| self.fetch_category(category))
            .buffered(self.max_concurrent)
            .and_then(|(path, record)| async move {
                let count = record.products.len();
                write_json(&path, &record).await?;
                Ok::<_, ScraperError>(count)
            })
            .try_collect()
            .await?;

        let report = DumpReport {
            files_written: counts.len(),
            items: counts.iter().sum(),
        };
        tracing::info!(
            files = report.files_written,
            items = report.items,
            "category dump complete"
        );
        Ok(report)
    }

    /// Drains one category's feed. Writing is left to the caller so that
    /// files land in list order.
    async fn fetch_category(
        &self,
        category: Category,
    ) -> Result<(PathBuf, CategoryRecord), ScraperError> {
        let code = category.parent_group_code.as_str();
        validate_file_stem(code)?;
        let path = self.output_dir.join(format!("category_{code}.json"));
        let url = category_query_url(&self.products_url, self.records_per_page, code)?;

        let products: Vec<Value> = self.client.walk(&url).try_collect().await?;
        let count = products.len();
        tracing::info!(
            code,
            name = %category.parent_group_name,
            products = count,
            "category fetched"
        );

        Ok((path, CategoryRecord::new(category, products)))
    }
}

/// Builds the first-page product query for one category.
///
/// A fresh URL is built per call, so no parameter state is shared between
/// categories. Any query string already on `products_url` is kept.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `products_url` is not an absolute
/// URL.
pub fn category_query_url(
    products_url: &str,
    records_per_page: u32,
    code: &str,
) -> Result<String, ScraperError> {
    let mut url = Url::parse(products_url).map_err(|e| ScraperError::InvalidUrl {
        url: products_url.to_owned(),
        reason: e.to_string(),
    })?;

    url.query_pairs_mut()
        .append_pair("records_per_page", &records_per_page.to_string())
        .append_pair("page", "1")
        .append_pair("categories", code);

    Ok(url.to_string())
}
