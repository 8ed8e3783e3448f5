//! Response and output shapes for the catalog API.
//!
//! ### Products
//! Treated as opaque JSON objects. The only field the dumper reads is `id`,
//! which may be a string or a number. Server key order is kept when a product
//! is written back out.
//!
//! ### Pages
//! `{"next": "<url>" | null, "results": [...]}`. `next` may also be absent on
//! the last page.
//!
//! ### Categories
//! The category endpoint returns a bare array of
//! `{"parent_group_code": "...", "parent_group_name": "..."}` objects, possibly
//! with extra fields that are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One response from a paginated endpoint.
#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<Value>,
}

/// One entry of the category list.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub parent_group_code: String,
    pub parent_group_name: String,
}

/// What gets written to `category_<code>.json`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CategoryRecord {
    pub code: String,
    pub name: String,
    pub products: Vec<Value>,
}

impl CategoryRecord {
    #[must_use]
    pub fn new(category: Category, products: Vec<Value>) -> Self {
        Self {
            code: category.parent_group_code,
            name: category.parent_group_name,
            products,
        }
    }
}
