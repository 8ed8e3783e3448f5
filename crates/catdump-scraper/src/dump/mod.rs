//! Writers that persist catalog records as one JSON file per entity.
//!
//! - [`ProductDumper`] (flat mode) streams: every product is written to
//!   `<id>.json` before the next page is requested.
//! - [`CategoryDumper`] (category mode) buffers: all products of one category
//!   are collected, then written together to `category_<code>.json`.
//!
//! Re-running either dumper overwrites existing files in place. Output is
//! deterministic, so an unchanged feed produces byte-identical files.

mod categories;
mod products;

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::ScraperError;

pub use categories::{category_query_url, CategoryDumper, DEFAULT_RECORDS_PER_PAGE};
pub use products::ProductDumper;

/// Totals for one dumper run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpReport {
    pub files_written: usize,
    pub items: usize,
}

/// Returns the file-name stem for a product: its `id` as text.
///
/// # Errors
///
/// [`ScraperError::MissingId`] if `id` is absent or not a string or number;
/// [`ScraperError::InvalidFileStem`] if it cannot name a file inside the
/// output directory.
pub fn product_file_stem(item: &Value) -> Result<String, ScraperError> {
    let stem = match item.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(ScraperError::MissingId {
                context: excerpt(item),
            })
        }
    };
    validate_file_stem(&stem)?;
    Ok(stem)
}

/// Rejects stems that are empty or would resolve outside the output
/// directory.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidFileStem`] for `""`, `"."`, `".."`, or any
/// stem containing a path separator or NUL.
pub fn validate_file_stem(stem: &str) -> Result<(), ScraperError> {
    let bad = stem.is_empty()
        || stem == "."
        || stem == ".."
        || stem.contains(['/', '\\', '\0']);
    if bad {
        return Err(ScraperError::InvalidFileStem {
            stem: stem.to_owned(),
        });
    }
    Ok(())
}

/// Creates the output directory and any missing parents.
pub(crate) async fn ensure_output_dir(dir: &Path) -> Result<(), ScraperError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| ScraperError::Io {
            path: dir.to_path_buf(),
            source,
        })
}

/// Serializes `value` as compact UTF-8 JSON and writes it to `path`,
/// replacing any existing file. Non-ASCII text is written literally.
pub(crate) async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ScraperError> {
    let bytes = serde_json::to_vec(value).map_err(|source| ScraperError::Encode {
        context: path.display().to_string(),
        source,
    })?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| ScraperError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn excerpt(item: &Value) -> String {
    const MAX_CHARS: usize = 120;
    let text = item.to_string();
    if text.chars().count() <= MAX_CHARS {
        text
    } else {
        let cut: String = text.chars().take(MAX_CHARS).collect();
        format!("{cut}...")
    }
}
