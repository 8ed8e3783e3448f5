use std::path::PathBuf;
use std::time::Duration;

use catdump_core::BackoffKind;

use super::*;

fn app_config() -> AppConfig {
    AppConfig {
        products_url: "http://localhost/products/".to_owned(),
        categories_url: "http://localhost/categories/".to_owned(),
        output_dir: PathBuf::from("out"),
        log_level: "info".to_owned(),
        user_agent: "catdump-test/0.1".to_owned(),
        request_timeout_secs: None,
        retry_max_attempts: Some(7),
        retry_delay_ms: 250,
        retry_backoff: BackoffKind::Exponential,
        retry_max_delay_ms: 4_000,
        records_per_page: 20,
        max_pages: 12,
        max_concurrent_categories: 1,
    }
}

#[test]
fn new_client_uses_default_page_limit() {
    let client = CatalogClient::new("ua", None, RetryPolicy::default()).unwrap();
    assert_eq!(client.max_pages, DEFAULT_MAX_PAGES);
    assert_eq!(client.retry_policy(), &RetryPolicy::default());
}

#[test]
fn with_max_pages_never_drops_to_zero() {
    let client = CatalogClient::new("ua", Some(1), RetryPolicy::default())
        .unwrap()
        .with_max_pages(0);
    assert_eq!(client.max_pages, 1);
}

#[test]
fn from_app_config_carries_retry_and_page_settings() {
    let client = CatalogClient::from_app_config(&app_config()).unwrap();
    assert_eq!(client.max_pages, 12);

    let retry = client.retry_policy();
    assert_eq!(retry.max_attempts, Some(7));
    assert_eq!(retry.delay, Duration::from_millis(250));
    assert_eq!(retry.backoff, BackoffKind::Exponential);
    assert_eq!(retry.max_delay, Duration::from_secs(4));
}
