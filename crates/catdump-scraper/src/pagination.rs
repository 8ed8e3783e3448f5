//! Cursor handling for `next`-linked result pages.
//!
//! Each page carries the URL of the following page in its `next` field:
//!
//! ```text
//! { "next": "https://shop.example/api/v2/special_offers/?page=2", "results": [...] }
//! ```
//!
//! The last page has `"next": null`. Servers usually send absolute URLs, but a
//! relative cursor is resolved against the URL of the page that carried it.

use reqwest::Url;

use crate::error::ScraperError;

/// Resolves a page's `next` cursor into the URL of the following page.
///
/// Returns `Ok(None)` for an empty cursor (end of feed).
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `current` is not an absolute URL or
/// `next` cannot be joined onto it.
pub fn resolve_next_url(current: &str, next: &str) -> Result<Option<String>, ScraperError> {
    let next = next.trim();
    if next.is_empty() {
        return Ok(None);
    }

    let base = Url::parse(current).map_err(|e| ScraperError::InvalidUrl {
        url: current.to_owned(),
        reason: e.to_string(),
    })?;
    let resolved = base.join(next).map_err(|e| ScraperError::InvalidUrl {
        url: next.to_owned(),
        reason: e.to_string(),
    })?;

    Ok(Some(resolved.to_string()))
}
