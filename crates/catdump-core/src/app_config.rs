use std::path::PathBuf;

/// How the delay between retry attempts evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffKind {
    /// Same delay before every retry.
    Fixed,
    /// Delay doubles after each retry, up to a cap.
    Exponential,
}

impl std::fmt::Display for BackoffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackoffKind::Fixed => write!(f, "fixed"),
            BackoffKind::Exponential => write!(f, "exponential"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub products_url: String,
    pub categories_url: String,
    pub output_dir: PathBuf,
    pub log_level: String,
    pub user_agent: String,
    /// `None` means requests never time out.
    pub request_timeout_secs: Option<u64>,
    /// Total attempts per request; `None` retries until the server answers 200.
    pub retry_max_attempts: Option<u32>,
    pub retry_delay_ms: u64,
    pub retry_backoff: BackoffKind,
    pub retry_max_delay_ms: u64,
    pub records_per_page: u32,
    pub max_pages: usize,
    pub max_concurrent_categories: usize,
}
