//! Command handlers that wire configuration into the dumpers.
//!
//! Any failure aborts the run; files written before the failure stay on
//! disk and are overwritten by the next run.

use anyhow::Context;
use catdump_core::AppConfig;
use catdump_scraper::{CatalogClient, CategoryDumper, ProductDumper};

pub(crate) fn build_catalog_client(config: &AppConfig) -> anyhow::Result<CatalogClient> {
    CatalogClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build catalog client: {e}"))
}

/// Flat mode: one `<id>.json` per product.
pub(crate) async fn run_products(config: &AppConfig) -> anyhow::Result<()> {
    let client = build_catalog_client(config)?;
    ProductDumper::new(&client, &config.products_url, &config.output_dir)
        .run()
        .await
        .with_context(|| format!("product dump from {} failed", config.products_url))?;
    Ok(())
}

/// Category mode: one `category_<code>.json` per category.
pub(crate) async fn run_categories(config: &AppConfig) -> anyhow::Result<()> {
    let client = build_catalog_client(config)?;
    CategoryDumper::new(
        &client,
        &config.categories_url,
        &config.products_url,
        &config.output_dir,
    )
    .with_records_per_page(config.records_per_page)
    .with_max_concurrent(config.max_concurrent_categories)
    .parse_by_categories()
    .await
    .with_context(|| format!("category dump from {} failed", config.categories_url))?;
    Ok(())
}
