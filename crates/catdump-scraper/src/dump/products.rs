use std::path::PathBuf;

use futures::TryStreamExt;

use crate::client::CatalogClient;
use crate::error::ScraperError;

use super::{ensure_output_dir, product_file_stem, write_json, DumpReport};

/// Flat mode: writes every product of a paginated feed to `<id>.json`.
pub struct ProductDumper<'a> {
    client: &'a CatalogClient,
    start_url: String,
    output_dir: PathBuf,
}

impl<'a> ProductDumper<'a> {
    #[must_use]
    pub fn new(
        client: &'a CatalogClient,
        start_url: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            start_url: start_url.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Walks the feed once, writing each product as soon as it is yielded.
    ///
    /// Files written before a failure are left in place; nothing from the
    /// failing page is written.
    ///
    /// # Errors
    ///
    /// Propagates fetch and pagination errors from [`CatalogClient::walk`],
    /// naming errors from [`super::product_file_stem`], and
    /// [`ScraperError::Io`] on write failures.
    pub async fn run(&self) -> Result<DumpReport, ScraperError> {
        ensure_output_dir(&self.output_dir).await?;
        tracing::info!(
            url = %self.start_url,
            output_dir = %self.output_dir.display(),
            "dumping products"
        );

        let mut report = DumpReport::default();
        let mut items = std::pin::pin!(self.client.walk(&self.start_url));

        while let Some(item) = items.try_next().await? {
            report.items += 1;
            let stem = product_file_stem(&item)?;
            let path = self.output_dir.join(format!("{stem}.json"));
            write_json(&path, &item).await?;
            report.files_written += 1;
            tracing::debug!(path = %path.display(), "wrote product");
        }

        tracing::info!(
            files = report.files_written,
            items = report.items,
            "product dump complete"
        );
        Ok(report)
    }
}
