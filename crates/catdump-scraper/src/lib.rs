pub mod client;
pub mod dump;
pub mod error;
pub mod pagination;
pub mod retry;
pub mod types;

pub use client::{CatalogClient, DEFAULT_MAX_PAGES};
pub use dump::{CategoryDumper, DumpReport, ProductDumper};
pub use error::ScraperError;
pub use retry::RetryPolicy;
pub use types::{Category, CategoryRecord, Page};
